//! Converter configuration.
//!
//! [`ConverterOptions`] is a builder that carries the input and output
//! directories, the accepted extensions, the [`EncodePreset`], and an
//! optional progress callback into a [`BatchConverter`](crate::BatchConverter).
//!
//! # Example
//!
//! ```no_run
//! use clipgif::{BatchConverter, ConverterOptions, EncodePreset, PresetName};
//!
//! let options = ConverterOptions::new()
//!     .with_input_dir("footage")
//!     .with_output_dir("public/gifs")
//!     .with_preset(EncodePreset::named(PresetName::SizedOptimized));
//!
//! let report = BatchConverter::new(options).run()?;
//! println!("{} converted", report.converted_count());
//! # Ok::<(), clipgif::ClipGifError>(())
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::preset::EncodePreset;
use crate::progress::{NoOpProgress, ProgressCallback};

/// Directory scanned for videos when none is configured.
pub const DEFAULT_INPUT_DIR: &str = "Input/Clips";

/// Directory GIFs are written to when none is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "assets/Clips";

/// File name suffixes recognised as videos when none are configured.
pub const DEFAULT_VIDEO_EXTENSIONS: [&str; 4] = [".mp4", ".avi", ".mov", ".mkv"];

/// Extension given to every output file.
pub const OUTPUT_EXTENSION: &str = "gif";

/// Configuration for a batch run.
#[derive(Clone)]
pub struct ConverterOptions {
    pub(crate) input_dir: PathBuf,
    pub(crate) output_dir: PathBuf,
    /// Case-sensitive suffixes, dot included.
    pub(crate) extensions: Vec<String>,
    pub(crate) preset: EncodePreset,
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

impl Debug for ConverterOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ConverterOptions")
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("extensions", &self.extensions)
            .field("preset", &self.preset)
            .finish_non_exhaustive()
    }
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterOptions {
    /// Defaults: `Input/Clips` → `assets/Clips`, `.mp4 .avi .mov .mkv`, the
    /// `default` preset, no progress callback.
    pub fn new() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            extensions: DEFAULT_VIDEO_EXTENSIONS
                .iter()
                .map(|extension| extension.to_string())
                .collect(),
            preset: EncodePreset::default(),
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Set the directory scanned for videos.
    #[must_use]
    pub fn with_input_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.input_dir = path.into();
        self
    }

    /// Set the directory GIFs are written to.
    #[must_use]
    pub fn with_output_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_dir = path.into();
        self
    }

    /// Replace the accepted suffixes.
    ///
    /// A leading dot is added when missing. Matching stays case-sensitive.
    /// An empty list restores the defaults.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized: Vec<String> = extensions
            .into_iter()
            .map(|extension| {
                let extension = extension.as_ref();
                if extension.starts_with('.') {
                    extension.to_string()
                } else {
                    format!(".{extension}")
                }
            })
            .collect();

        if !normalized.is_empty() {
            self.extensions = normalized;
        }
        self
    }

    /// Set the encode preset.
    #[must_use]
    pub fn with_preset(mut self, preset: EncodePreset) -> Self {
        self.preset = preset;
        self
    }

    /// Attach a progress callback, invoked once per job.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Directory scanned for videos.
    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Directory GIFs are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Accepted suffixes.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Encode preset applied to every job.
    pub fn preset(&self) -> &EncodePreset {
        &self.preset
    }

    /// `true` if `file_name` ends with one of the accepted suffixes.
    pub fn is_video_file_name(&self, file_name: &str) -> bool {
        self.extensions
            .iter()
            .any(|extension| file_name.ends_with(extension.as_str()))
    }

    /// Output path for an input file: `<output_dir>/<stem>.gif`.
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let mut file_name = input
            .file_stem()
            .unwrap_or(input.as_os_str())
            .to_os_string();
        file_name.push(".");
        file_name.push(OUTPUT_EXTENSION);
        self.output_dir.join(file_name)
    }
}
