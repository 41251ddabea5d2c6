//! Per-job results and the batch summary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ClipGifError;

/// What happened to a single conversion job.
#[derive(Debug)]
#[must_use]
pub enum JobOutcome {
    /// A GIF was written.
    Converted {
        /// Path of the new GIF.
        output: PathBuf,
        /// Number of frames in the GIF.
        frames: u64,
    },
    /// The GIF already existed; nothing was written.
    Skipped {
        /// Path of the existing GIF.
        output: PathBuf,
    },
    /// The job failed; no GIF was written.
    Failed {
        /// Why the job failed.
        reason: ClipGifError,
    },
}

impl JobOutcome {
    /// `true` for [`JobOutcome::Converted`].
    pub fn is_converted(&self) -> bool {
        matches!(self, JobOutcome::Converted { .. })
    }

    /// `true` for [`JobOutcome::Skipped`].
    pub fn is_skipped(&self) -> bool {
        matches!(self, JobOutcome::Skipped { .. })
    }

    /// `true` for [`JobOutcome::Failed`].
    pub fn is_failed(&self) -> bool {
        matches!(self, JobOutcome::Failed { .. })
    }

    /// Short lowercase label: `converted`, `skipped` or `failed`.
    pub fn label(&self) -> &'static str {
        match self {
            JobOutcome::Converted { .. } => "converted",
            JobOutcome::Skipped { .. } => "skipped",
            JobOutcome::Failed { .. } => "failed",
        }
    }

    /// Output path for converted and skipped jobs.
    pub fn output(&self) -> Option<&Path> {
        match self {
            JobOutcome::Converted { output, .. } | JobOutcome::Skipped { output } => Some(output),
            JobOutcome::Failed { .. } => None,
        }
    }

    /// Failure reason for failed jobs.
    pub fn error(&self) -> Option<&ClipGifError> {
        match self {
            JobOutcome::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

/// One input file and what happened to it.
#[derive(Debug)]
pub struct JobResult {
    /// Input video.
    pub input: PathBuf,
    /// Outcome of the job.
    pub outcome: JobOutcome,
    /// Time spent on the job.
    pub elapsed: Duration,
}

/// How far a batch run got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The input directory did not exist; it was created and nothing else ran.
    InputDirectoryCreated,
    /// The input directory held no recognised video files.
    NoVideoFiles,
    /// Every discovered file was processed.
    Completed,
}

/// Aggregated results of a batch run.
#[derive(Debug)]
pub struct BatchReport {
    /// How far the run got.
    pub status: RunStatus,
    /// Input directory that was scanned.
    pub input_dir: PathBuf,
    /// Output directory GIFs were written to.
    pub output_dir: PathBuf,
    /// One entry per discovered video, in scan order.
    pub jobs: Vec<JobResult>,
    /// Wall-clock time of the whole run.
    pub elapsed: Duration,
}

impl BatchReport {
    pub(crate) fn halted(status: RunStatus, input_dir: &Path, output_dir: &Path) -> Self {
        Self {
            status,
            input_dir: input_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            jobs: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Number of GIFs written.
    pub fn converted_count(&self) -> usize {
        self.jobs.iter().filter(|job| job.outcome.is_converted()).count()
    }

    /// Number of jobs skipped because the GIF already existed.
    pub fn skipped_count(&self) -> usize {
        self.jobs.iter().filter(|job| job.outcome.is_skipped()).count()
    }

    /// Number of failed jobs.
    pub fn failed_count(&self) -> usize {
        self.jobs.iter().filter(|job| job.outcome.is_failed()).count()
    }

    /// `true` when no job failed.
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// Iterate over failed jobs.
    pub fn failures(&self) -> impl Iterator<Item = &JobResult> {
        self.jobs.iter().filter(|job| job.outcome.is_failed())
    }
}
