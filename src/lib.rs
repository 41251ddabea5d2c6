//! # clipgif
//!
//! Batch-convert video clips into animated GIFs.
//!
//! `clipgif` scans a directory for videos (`.mp4`, `.avi`, `.mov`, `.mkv`),
//! decodes each one with FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate, and writes a
//! GIF with the same base name into an output directory. Videos that already
//! have a GIF are skipped, so re-running a batch only converts new clips.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clipgif::{BatchConverter, ConverterOptions};
//!
//! // Input/Clips/*.mp4 → assets/Clips/*.gif
//! let report = BatchConverter::new(ConverterOptions::new()).run()?;
//! for job in &report.jobs {
//!     println!("{}: {}", job.input.display(), job.outcome.label());
//! }
//! # Ok::<(), clipgif::ClipGifError>(())
//! ```
//!
//! ### Presets
//!
//! ```no_run
//! use clipgif::{BatchConverter, ConverterOptions, EncodePreset, PresetName};
//!
//! // 1080 px wide, at most 60 fps, transparency-optimised with fuzz 10.
//! let options = ConverterOptions::new()
//!     .with_preset(EncodePreset::named(PresetName::SizedOptimized));
//! BatchConverter::new(options).run()?;
//! # Ok::<(), clipgif::ClipGifError>(())
//! ```
//!
//! ## Features
//!
//! - **Idempotent batches**: existing GIFs are never overwritten
//! - **Per-job results**: converted / skipped / failed, aggregated in a
//!   [`BatchReport`]; one broken file never stops the batch
//! - **Named presets**: library defaults or sized-and-optimised output
//! - **Two encoders**: the `gif` crate with NeuQuant quantisation and
//!   inter-frame transparency, or FFmpeg's own GIF encoder
//! - **Pluggable decoding**: [`VideoBackend`] lets the batch run against
//!   any video source
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod backend;
pub mod clip;
pub mod configuration;
mod conversion;
pub mod converter;
mod encode;
pub mod error;
pub mod ffmpeg;
pub mod gif;
pub mod metadata;
pub mod preset;
pub mod progress;
pub mod report;
mod sampling;

pub use backend::{DecodedClip, VideoBackend};
pub use clip::{FfmpegBackend, VideoClip};
pub use configuration::{
    ConverterOptions, DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR, DEFAULT_VIDEO_EXTENSIONS,
};
pub use converter::BatchConverter;
pub use error::ClipGifError;
pub use ffmpeg::{FfmpegLogLevel, get_ffmpeg_log_level, set_ffmpeg_log_level};
pub use crate::gif::NativeGifWriter;
pub use metadata::ClipMetadata;
pub use preset::{EncodePreset, EncoderBackend, GifWriteOptions, Optimization, PresetName};
pub use progress::{ProgressCallback, ProgressInfo};
pub use report::{BatchReport, JobOutcome, JobResult, RunStatus};
