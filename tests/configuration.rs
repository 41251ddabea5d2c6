//! ConverterOptions and EncodePreset tests.

use std::path::{Path, PathBuf};

use clipgif::{
    ConverterOptions, DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR, EncodePreset, EncoderBackend,
    Optimization, PresetName,
};

// ── ConverterOptions builder ─────────────────────────────────────

#[test]
fn options_defaults() {
    let options = ConverterOptions::new();
    assert_eq!(options.input_dir(), Path::new(DEFAULT_INPUT_DIR));
    assert_eq!(options.output_dir(), Path::new(DEFAULT_OUTPUT_DIR));
    assert_eq!(options.extensions(), [".mp4", ".avi", ".mov", ".mkv"]);
    assert_eq!(options.preset(), &EncodePreset::named(PresetName::Default));
}

#[test]
fn options_debug_omits_callback() {
    let debug = format!("{:?}", ConverterOptions::new());
    assert!(debug.contains("ConverterOptions"));
    assert!(debug.contains("Input/Clips"));
    assert!(!debug.contains("progress"));
}

#[test]
fn options_with_directories() {
    let options = ConverterOptions::new()
        .with_input_dir("footage")
        .with_output_dir(PathBuf::from("public").join("gifs"));
    assert_eq!(options.input_dir(), Path::new("footage"));
    assert_eq!(options.output_dir(), Path::new("public/gifs"));
}

#[test]
fn options_extensions_gain_a_dot() {
    let options = ConverterOptions::new().with_extensions(["webm", ".gifv"]);
    assert_eq!(options.extensions(), [".webm", ".gifv"]);
}

#[test]
fn options_empty_extension_list_keeps_defaults() {
    let options = ConverterOptions::new().with_extensions(Vec::<String>::new());
    assert_eq!(options.extensions().len(), 4);
}

#[test]
fn video_file_names_match_case_sensitively() {
    let options = ConverterOptions::new();
    assert!(options.is_video_file_name("clip1.mp4"));
    assert!(options.is_video_file_name("a.b.mkv"));
    assert!(!options.is_video_file_name("CLIP.MP4"));
    assert!(!options.is_video_file_name("notes.txt"));
    assert!(!options.is_video_file_name("mp4"));
}

#[test]
fn suffix_match_does_not_require_a_stem_separator() {
    let options = ConverterOptions::new().with_extensions(["mov"]);
    // Suffix matching, as with a plain `ends_with` check.
    assert!(options.is_video_file_name("imovie.mov"));
    assert!(!options.is_video_file_name("movie"));
}

#[test]
fn output_path_replaces_only_the_last_extension() {
    let options = ConverterOptions::new().with_output_dir("out");
    assert_eq!(
        options.output_path_for(Path::new("Input/Clips/clip1.mp4")),
        Path::new("out/clip1.gif")
    );
    assert_eq!(
        options.output_path_for(Path::new("in/my.clip.mkv")),
        Path::new("out/my.clip.gif")
    );
}

// ── EncodePreset ─────────────────────────────────────────────────

#[test]
fn default_preset_keeps_source_geometry() {
    let preset = EncodePreset::named(PresetName::Default);
    assert_eq!(preset.target_width, None);
    assert_eq!(preset.frame_rate_cap, None);
    assert_eq!(preset.backend, EncoderBackend::Ffmpeg);
    assert!(preset.reject_zero_duration);
    assert_eq!(preset.output_frame_rate(23.976), Some(23.976));
}

#[test]
fn sized_optimized_preset_values() {
    let preset = EncodePreset::named(PresetName::SizedOptimized);
    assert_eq!(preset.target_width, Some(1080));
    assert_eq!(preset.frame_rate_cap, Some(60.0));
    assert_eq!(preset.backend, EncoderBackend::Native);
    assert_eq!(preset.optimization, Optimization::TransparencyCrop);
    assert_eq!(preset.fuzz, 10);
    assert!(!preset.reject_zero_duration);
}

#[test]
fn preset_overrides() {
    let preset = EncodePreset::named(PresetName::SizedOptimized)
        .with_width(480)
        .with_frame_rate_cap(15.0)
        .with_fuzz(250)
        .with_quantizer_speed(0)
        .with_optimization(Optimization::Transparency)
        .with_backend(EncoderBackend::Ffmpeg);

    assert_eq!(preset.target_width, Some(480));
    assert_eq!(preset.output_frame_rate(30.0), Some(15.0));
    assert_eq!(preset.fuzz, 100);
    assert_eq!(preset.quantizer_speed, 1);
    assert_eq!(preset.optimization, Optimization::Transparency);
    assert_eq!(preset.backend, EncoderBackend::Ffmpeg);
}

#[test]
fn non_positive_cap_removes_the_cap() {
    let preset = EncodePreset::named(PresetName::SizedOptimized).with_frame_rate_cap(0.0);
    assert_eq!(preset.frame_rate_cap, None);
    assert_eq!(preset.output_frame_rate(90.0), Some(90.0));
}

#[test]
fn unknown_source_rate_falls_back_to_cap() {
    let capped = EncodePreset::named(PresetName::SizedOptimized);
    assert_eq!(capped.output_frame_rate(0.0), Some(60.0));

    let uncapped = EncodePreset::named(PresetName::Default);
    assert_eq!(uncapped.output_frame_rate(0.0), None);
}

#[test]
fn write_options_carry_preset_values() {
    let preset = EncodePreset::named(PresetName::SizedOptimized);
    let options = preset.write_options(120.0);
    assert_eq!(options.frames_per_second, Some(60.0));
    assert_eq!(options.backend, EncoderBackend::Native);
    assert_eq!(options.optimization, Optimization::TransparencyCrop);
    assert_eq!(options.fuzz, 10);
}

#[test]
fn names_parse_and_display() {
    assert_eq!("sized_optimized".parse::<PresetName>().unwrap(), PresetName::SizedOptimized);
    assert_eq!(PresetName::SizedOptimized.to_string(), "sized-optimized");
    assert_eq!("optimizeplus".parse::<Optimization>().unwrap(), Optimization::TransparencyCrop);
    assert_eq!("FFMPEG".parse::<EncoderBackend>().unwrap(), EncoderBackend::Ffmpeg);
    assert!("turbo".parse::<PresetName>().is_err());
}
