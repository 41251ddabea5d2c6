//! Shared helpers for integration tests: a scripted [`VideoBackend`] and
//! scratch directory layout.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use clipgif::{ClipGifError, ClipMetadata, DecodedClip, GifWriteOptions, VideoBackend};

/// How a scripted clip behaves.
#[derive(Debug, Clone)]
pub struct ClipScript {
    pub duration: Duration,
    pub frames_per_second: f64,
    pub width: u32,
    pub height: u32,
    pub open_error: Option<String>,
    pub write_error: Option<String>,
}

impl ClipScript {
    pub fn seconds(seconds: f64, frames_per_second: f64) -> Self {
        Self {
            duration: Duration::from_secs_f64(seconds),
            frames_per_second,
            width: 1920,
            height: 1080,
            open_error: None,
            write_error: None,
        }
    }

    pub fn failing_open(reason: &str) -> Self {
        Self {
            open_error: Some(reason.to_string()),
            ..Self::seconds(3.0, 30.0)
        }
    }

    pub fn failing_write(reason: &str) -> Self {
        Self {
            write_error: Some(reason.to_string()),
            ..Self::seconds(3.0, 30.0)
        }
    }
}

/// One recorded write call.
#[derive(Debug, Clone)]
pub struct WriteCall {
    pub output: PathBuf,
    pub options: GifWriteOptions,
    pub width: Option<u32>,
}

/// Counters shared between a [`ScriptedBackend`] and its clips.
#[derive(Debug, Default)]
pub struct BackendLog {
    pub opened: AtomicUsize,
    pub released: AtomicUsize,
    pub writes: Mutex<Vec<WriteCall>>,
}

impl BackendLog {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> Vec<WriteCall> {
        self.writes.lock().unwrap().clone()
    }
}

/// A backend whose clips behave according to per-file-name scripts.
/// Unscripted files behave like a 3 s, 30 fps 1080p clip.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    scripts: HashMap<String, ClipScript>,
    pub log: Arc<BackendLog>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clip(mut self, file_name: &str, script: ClipScript) -> Self {
        self.scripts.insert(file_name.to_string(), script);
        self
    }
}

impl VideoBackend for ScriptedBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn DecodedClip>, ClipGifError> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let script = self
            .scripts
            .get(&name)
            .cloned()
            .unwrap_or_else(|| ClipScript::seconds(3.0, 30.0));

        if let Some(reason) = &script.open_error {
            return Err(ClipGifError::FileOpen {
                path: path.to_path_buf(),
                reason: reason.clone(),
            });
        }

        self.log.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedClip {
            metadata: ClipMetadata {
                duration: script.duration,
                frames_per_second: script.frames_per_second,
                width: script.width,
                height: script.height,
                codec: "h264".to_string(),
                format: "mov,mp4,m4a,3gp,3g2,mj2".to_string(),
            },
            script,
            path: path.to_path_buf(),
            width: None,
            log: Arc::clone(&self.log),
        }))
    }
}

struct ScriptedClip {
    metadata: ClipMetadata,
    script: ClipScript,
    path: PathBuf,
    width: Option<u32>,
    log: Arc<BackendLog>,
}

impl DecodedClip for ScriptedClip {
    fn metadata(&self) -> &ClipMetadata {
        &self.metadata
    }

    fn resize(&mut self, width: u32) {
        self.width = Some(width);
    }

    fn write_gif(&mut self, output: &Path, options: &GifWriteOptions) -> Result<u64, ClipGifError> {
        self.log.writes.lock().unwrap().push(WriteCall {
            output: output.to_path_buf(),
            options: options.clone(),
            width: self.width,
        });

        if let Some(reason) = &self.script.write_error {
            return Err(ClipGifError::GifEncodeError(reason.clone()));
        }

        let rate = options
            .frames_per_second
            .unwrap_or(self.metadata.frames_per_second);
        let frames = (self.metadata.duration.as_secs_f64() * rate).round() as u64;
        if frames == 0 {
            return Err(ClipGifError::EmptyClip(self.path.clone()));
        }

        fs::write(output, b"GIF89a")?;
        Ok(frames)
    }
}

impl Drop for ScriptedClip {
    fn drop(&mut self) {
        self.log.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// `<root>/Input/Clips` and `<root>/assets/Clips` inside a fresh temp dir.
pub struct Workspace {
    pub root: tempfile::TempDir,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Workspace {
    /// Layout without creating the input directory.
    pub fn empty() -> Self {
        let root = tempfile::tempdir().expect("Failed to create temp dir");
        let input_dir = root.path().join("Input").join("Clips");
        let output_dir = root.path().join("assets").join("Clips");
        Self {
            root,
            input_dir,
            output_dir,
        }
    }

    /// Layout with the input directory holding `files`.
    pub fn with_inputs(files: &[&str]) -> Self {
        let workspace = Self::empty();
        fs::create_dir_all(&workspace.input_dir).expect("Failed to create input dir");
        for file in files {
            fs::write(workspace.input_dir.join(file), b"not really a video")
                .expect("Failed to write input file");
        }
        workspace
    }

    pub fn options(&self) -> clipgif::ConverterOptions {
        clipgif::ConverterOptions::new()
            .with_input_dir(&self.input_dir)
            .with_output_dir(&self.output_dir)
    }

    /// Sorted file names in the output directory (empty if it is missing).
    pub fn outputs(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.output_dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
