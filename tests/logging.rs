//! Log output of a batch run, captured through a test logger.

mod common;

use std::sync::Mutex;

use clipgif::BatchConverter;
use log::{Level, LevelFilter, Log, Metadata, Record};

use common::{ClipScript, ScriptedBackend, Workspace};

static RECORDS: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if record.target().starts_with("clipgif") {
            RECORDS
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

fn install_logger() {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(LevelFilter::Debug);
}

/// Captured lines that mention `needle`.
fn lines_mentioning(needle: &str) -> Vec<(Level, String)> {
    RECORDS
        .lock()
        .unwrap()
        .iter()
        .filter(|(_, message)| message.contains(needle))
        .cloned()
        .collect()
}

#[test]
fn successful_conversion_logs_one_success_line() {
    install_logger();
    let workspace = Workspace::with_inputs(&["clip1.mp4", "notes.txt"]);
    let backend = ScriptedBackend::new().with_clip("clip1.mp4", ClipScript::seconds(3.0, 30.0));

    BatchConverter::with_backend(workspace.options(), backend)
        .run()
        .unwrap();

    let lines = lines_mentioning("clip1.mp4");
    let successes: Vec<_> = lines
        .iter()
        .filter(|(_, message)| message.starts_with("Saved GIF"))
        .collect();
    assert_eq!(successes.len(), 1);
    assert_eq!(successes[0].0, Level::Info);
    assert!(successes[0].1.contains("clip1.gif"));
    assert!(lines.iter().any(|(_, message)| message == "Converting clip1.mp4 to GIF..."));
    assert!(lines_mentioning("notes.txt").is_empty());
}

#[test]
fn failed_conversion_logs_one_error_line() {
    install_logger();
    let workspace = Workspace::with_inputs(&["still_frame.mp4"]);
    let backend =
        ScriptedBackend::new().with_clip("still_frame.mp4", ClipScript::seconds(0.0, 30.0));

    BatchConverter::with_backend(workspace.options(), backend)
        .run()
        .unwrap();

    let errors: Vec<_> = lines_mentioning("still_frame")
        .into_iter()
        .filter(|(level, _)| *level == Level::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].1.starts_with("Error converting still_frame.mp4:"));
    assert!(
        lines_mentioning("still_frame")
            .iter()
            .all(|(_, message)| !message.starts_with("Saved GIF"))
    );
}

#[test]
fn stats_and_frame_rate_are_logged() {
    install_logger();
    let workspace = Workspace::with_inputs(&["stats_probe.mp4"]);
    let backend =
        ScriptedBackend::new().with_clip("stats_probe.mp4", ClipScript::seconds(2.0, 25.0));

    BatchConverter::with_backend(workspace.options(), backend)
        .run()
        .unwrap();

    let records = RECORDS.lock().unwrap();
    assert!(
        records
            .iter()
            .any(|(_, message)| message.starts_with("Original video stats - FPS: 25.00")
                && message.ends_with("~50 frames"))
    );
    assert!(
        records
            .iter()
            .any(|(_, message)| message == "Writing GIF with FPS: 25.00")
    );
}
