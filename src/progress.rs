//! Per-job progress reporting.
//!
//! A [`ProgressCallback`] attached through
//! [`ConverterOptions::with_progress`](crate::ConverterOptions::with_progress)
//! is told when each job starts and when it finishes.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use clipgif::{BatchConverter, ConverterOptions, ProgressCallback, ProgressInfo};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("[{}/{}] {}", info.current, info.total, info.input.display());
//!     }
//! }
//!
//! let options = ConverterOptions::new().with_progress(Arc::new(PrintProgress));
//! BatchConverter::new(options).run()?;
//! # Ok::<(), clipgif::ClipGifError>(())
//! ```

use std::path::PathBuf;
use std::time::Duration;

use crate::report::JobResult;

/// A snapshot taken when a job starts.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// One-based index of the job about to run.
    pub current: usize,
    /// Number of jobs in the batch.
    pub total: usize,
    /// Input file of the job about to run.
    pub input: PathBuf,
    /// Wall-clock time since the batch started.
    pub elapsed: Duration,
}

impl ProgressInfo {
    /// Completion percentage (0.0 to 100.0) counting finished jobs only.
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            return 100.0;
        }
        (self.current.saturating_sub(1) as f32 / self.total as f32) * 100.0
    }
}

/// Receives progress updates during a batch run.
///
/// Callbacks observe the batch; they cannot halt it.
pub trait ProgressCallback: Send + Sync {
    /// Called before each job starts.
    fn on_progress(&self, info: &ProgressInfo);

    /// Called after each job finishes, whatever its outcome.
    fn on_job_finished(&self, _result: &JobResult) {}
}

/// Discards all notifications. The default when no callback is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}
