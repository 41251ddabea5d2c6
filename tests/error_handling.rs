//! Error handling integration tests.
//!
//! These tests verify that meaningful errors are returned for various
//! failure conditions.

use std::path::PathBuf;

use clipgif::{ClipGifError, EncoderBackend, FfmpegLogLevel, Optimization, PresetName};

#[test]
fn error_messages_name_the_file() {
    let error = ClipGifError::ZeroDuration(PathBuf::from("Input/Clips/still.mp4"));
    assert_eq!(
        error.to_string(),
        "Video has zero duration: Input/Clips/still.mp4"
    );

    let error = ClipGifError::EmptyClip(PathBuf::from("broken.mkv"));
    assert!(error.to_string().contains("broken.mkv"));

    let error = ClipGifError::FileOpen {
        path: PathBuf::from("x.mov"),
        reason: "Invalid data found when processing input".to_string(),
    };
    let message = error.to_string();
    assert!(
        message.contains("Failed to open video file") && message.contains("x.mov"),
        "Error message should mention file open failure: {message}",
    );
}

#[test]
fn io_errors_convert() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let error: ClipGifError = io.into();
    assert!(matches!(error, ClipGifError::IoError(_)));
    assert!(error.to_string().contains("read-only"));
}

#[test]
fn ffmpeg_errors_convert() {
    let error: ClipGifError = ffmpeg_next::Error::Eof.into();
    assert!(matches!(error, ClipGifError::FfmpegError(_)));
}

#[test]
fn frame_too_large_reports_dimensions() {
    let error = ClipGifError::FrameTooLarge {
        width: 80_000,
        height: 45_000,
    };
    assert!(error.to_string().contains("80000x45000"));
}

#[test]
fn unknown_names_are_invalid_options() {
    let errors = [
        "fastest".parse::<PresetName>().err(),
        "mpeg".parse::<EncoderBackend>().err(),
        "squash".parse::<Optimization>().err(),
        "shout".parse::<FfmpegLogLevel>().err(),
    ];
    for error in errors {
        let error = error.expect("parse should fail");
        assert!(matches!(error, ClipGifError::InvalidOption(_)));
    }
}
