//! Error types for the `clipgif` crate.
//!
//! [`ClipGifError`] is returned by every fallible operation. Per-file
//! failures inside a batch are not propagated; they are captured in a
//! [`JobOutcome::Failed`](crate::JobOutcome::Failed) so the batch can keep
//! going.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use thiserror::Error;

/// The unified error type for all `clipgif` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClipGifError {
    /// The video file could not be opened by the decoder.
    #[error("Failed to open video file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to the backend.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The input file disappeared between the directory scan and the job.
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// The decoded clip reports a duration of zero.
    #[error("Video has zero duration: {0}")]
    ZeroDuration(PathBuf),

    /// Decoding finished without producing a single frame.
    #[error("No frames could be decoded from {0}")]
    EmptyClip(PathBuf),

    /// A video frame could not be decoded or converted.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// GIF encoding failed.
    #[error("GIF encoding error: {0}")]
    GifEncodeError(String),

    /// The scaled frame does not fit in a GIF logical screen.
    #[error("Frame size {width}x{height} exceeds the GIF limit of 65535x65535")]
    FrameTooLarge {
        /// Output width in pixels.
        width: u32,
        /// Output height in pixels.
        height: u32,
    },

    /// A preset, backend, or optimisation name was not recognised, or a
    /// parameter was out of range.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),
}

impl From<FfmpegError> for ClipGifError {
    fn from(error: FfmpegError) -> Self {
        ClipGifError::FfmpegError(error.to_string())
    }
}
