//! The batch converter.
//!
//! [`BatchConverter`] scans the input directory, converts every recognised
//! video that does not have a GIF yet, and returns a [`BatchReport`].
//! A failing file never stops the batch: its error is logged and recorded
//! in the report, and the next file is processed.
//!
//! # Example
//!
//! ```no_run
//! use clipgif::{BatchConverter, ConverterOptions, RunStatus};
//!
//! let report = BatchConverter::new(ConverterOptions::new()).run()?;
//! if report.status == RunStatus::Completed {
//!     println!(
//!         "{} converted, {} skipped, {} failed",
//!         report.converted_count(),
//!         report.skipped_count(),
//!         report.failed_count(),
//!     );
//! }
//! # Ok::<(), clipgif::ClipGifError>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::backend::{DecodedClip, VideoBackend};
use crate::clip::FfmpegBackend;
use crate::configuration::ConverterOptions;
use crate::error::ClipGifError;
use crate::progress::ProgressInfo;
use crate::report::{BatchReport, JobOutcome, JobResult, RunStatus};

/// Converts a directory of videos into GIFs.
#[derive(Debug)]
pub struct BatchConverter<B: VideoBackend = FfmpegBackend> {
    options: ConverterOptions,
    backend: B,
}

impl BatchConverter<FfmpegBackend> {
    /// Converter that decodes with FFmpeg.
    pub fn new(options: ConverterOptions) -> Self {
        Self::with_backend(options, FfmpegBackend::new())
    }
}

impl<B: VideoBackend> BatchConverter<B> {
    /// Converter that opens clips through `backend`.
    pub fn with_backend(options: ConverterOptions, backend: B) -> Self {
        Self { options, backend }
    }

    /// The configuration this converter runs with.
    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    /// List the recognised video files in the input directory.
    ///
    /// Entries are returned in directory-listing order. Only names ending
    /// with one of the configured suffixes (case-sensitive) are kept;
    /// sub-directories are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ClipGifError::IoError`] if the directory cannot be read.
    pub fn scan(&self) -> Result<Vec<PathBuf>, ClipGifError> {
        let mut videos = Vec::new();
        for entry in fs::read_dir(&self.options.input_dir)? {
            let entry = entry?;
            if entry.file_type().map(|kind| kind.is_dir()).unwrap_or(false) {
                continue;
            }
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                log::debug!("Ignoring non UTF-8 file name: {:?}", file_name);
                continue;
            };
            if self.options.is_video_file_name(name) {
                videos.push(entry.path());
            }
        }
        log::debug!(
            "Found {} video file(s) in {}",
            videos.len(),
            self.options.input_dir.display()
        );
        Ok(videos)
    }

    /// Convert one input video.
    ///
    /// Never fails: every error is logged and returned as
    /// [`JobOutcome::Failed`].
    pub fn convert_one(&self, input: &Path) -> JobOutcome {
        let output = self.options.output_path_for(input);
        let name = display_name(input);

        if !input.exists() {
            log::error!("Input file not found: {}", input.display());
            return JobOutcome::Failed {
                reason: ClipGifError::InputNotFound(input.to_path_buf()),
            };
        }

        if output.exists() {
            log::info!(
                "Skipping {}: {} already exists",
                name,
                output.display()
            );
            return JobOutcome::Skipped { output };
        }

        log::info!("Converting {} to GIF...", name);
        log::info!("Input path: {}", input.display());

        match self.encode(input, &output) {
            Ok(frames) => {
                log::info!("Saved GIF for {} to {}", name, output.display());
                JobOutcome::Converted { output, frames }
            }
            Err(reason) => {
                log::error!("Error converting {}: {}", name, reason);
                JobOutcome::Failed { reason }
            }
        }
    }

    /// Open, check, resize and write one clip.
    ///
    /// The clip is dropped on every path out of this function, which
    /// releases its decoder.
    fn encode(&self, input: &Path, output: &Path) -> Result<u64, ClipGifError> {
        let preset = &self.options.preset;
        let mut clip: Box<dyn DecodedClip> = self.backend.open(input)?;

        let metadata = clip.metadata().clone();
        log::info!(
            "Original video stats - FPS: {:.2}, duration: {:.2}s, size: {}x{}, ~{} frames",
            metadata.frames_per_second,
            metadata.duration.as_secs_f64(),
            metadata.width,
            metadata.height,
            metadata.estimated_frame_count(),
        );

        if preset.reject_zero_duration && metadata.duration.is_zero() {
            return Err(ClipGifError::ZeroDuration(input.to_path_buf()));
        }

        if let Some(width) = preset.target_width {
            clip.resize(width);
        }

        let write_options = preset.write_options(metadata.frames_per_second);
        match write_options.frames_per_second {
            Some(frames_per_second) => {
                log::info!("Writing GIF with FPS: {:.2}", frames_per_second)
            }
            None => log::info!("Writing GIF with default frame timing"),
        }

        clip.write_gif(output, &write_options)
    }

    /// Run the whole batch.
    ///
    /// - Missing input directory: it is created, guidance is logged, and the
    ///   report has status [`RunStatus::InputDirectoryCreated`].
    /// - No recognised videos: an error is logged and the report has status
    ///   [`RunStatus::NoVideoFiles`].
    /// - Otherwise the output directory is created if needed and every video
    ///   is converted; per-file failures are recorded, not returned.
    ///
    /// # Errors
    ///
    /// Returns [`ClipGifError::IoError`] only when a directory cannot be
    /// created or listed.
    pub fn run(&self) -> Result<BatchReport, ClipGifError> {
        let started = Instant::now();
        let input_dir = &self.options.input_dir;
        let output_dir = &self.options.output_dir;

        if !input_dir.exists() {
            log::error!("Input directory not found: {}", input_dir.display());
            log::info!("Creating input directory: {}", input_dir.display());
            fs::create_dir_all(input_dir)?;
            log::info!(
                "Please place your video files in: {}",
                absolute_display(input_dir).display()
            );
            return Ok(BatchReport::halted(
                RunStatus::InputDirectoryCreated,
                input_dir,
                output_dir,
            ));
        }

        let videos = self.scan()?;
        if videos.is_empty() {
            log::error!("No video files found in {}", input_dir.display());
            log::info!(
                "Please add video files to: {}",
                absolute_display(input_dir).display()
            );
            return Ok(BatchReport::halted(
                RunStatus::NoVideoFiles,
                input_dir,
                output_dir,
            ));
        }

        if !output_dir.exists() {
            log::info!("Creating output directory: {}", output_dir.display());
            fs::create_dir_all(output_dir)?;
        }

        let total = videos.len();
        let mut jobs = Vec::with_capacity(total);
        for (index, input) in videos.into_iter().enumerate() {
            self.options.progress.on_progress(&ProgressInfo {
                current: index + 1,
                total,
                input: input.clone(),
                elapsed: started.elapsed(),
            });

            let job_started = Instant::now();
            let outcome = self.convert_one(&input);
            let result = JobResult {
                input,
                outcome,
                elapsed: job_started.elapsed(),
            };
            self.options.progress.on_job_finished(&result);
            jobs.push(result);
        }

        let report = BatchReport {
            status: RunStatus::Completed,
            input_dir: input_dir.clone(),
            output_dir: output_dir.clone(),
            jobs,
            elapsed: started.elapsed(),
        };

        log::info!(
            "Finished: {} converted, {} skipped, {} failed in {:.1}s",
            report.converted_count(),
            report.skipped_count(),
            report.failed_count(),
            report.elapsed.as_secs_f64(),
        );

        Ok(report)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Absolute form of `path` for guidance messages; falls back to `path`.
fn absolute_display(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
