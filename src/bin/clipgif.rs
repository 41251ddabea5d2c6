use std::{io::Write, path::PathBuf, sync::Arc};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use clipgif::{
    BatchConverter, BatchReport, ConverterOptions, EncodePreset, FfmpegBackend, FfmpegLogLevel,
    JobOutcome, JobResult, PresetName, ProgressCallback, ProgressInfo, RunStatus,
};
use colored::Colorize;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  clipgif\n  clipgif convert --input footage --output public/gifs --preset sized-optimized\n  clipgif convert --width 480 --fps-cap 15 --backend native --json\n  clipgif presets\n  clipgif completions zsh > _clipgif";

#[derive(Debug, Parser)]
#[command(
    name = "clipgif",
    version,
    about = "Convert a directory of video clips into animated GIFs",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    /// Defaults to `convert` with default settings.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Args, Clone, Default)]
struct GlobalOptions {
    /// Show debug logging output.
    #[arg(long, global = true)]
    verbose: bool,

    /// FFmpeg console log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long, global = true, default_value = "error")]
    ffmpeg_log_level: String,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert every video in the input directory (the default command).
    #[command(
        after_help = "Examples:\n  clipgif convert --preset sized-optimized\n  clipgif convert --input clips --output gifs --extension webm --extension mp4"
    )]
    Convert(ConvertArgs),

    /// List the built-in encode presets.
    Presets,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Args, Clone, Default)]
struct ConvertArgs {
    /// Directory scanned for videos [default: Input/Clips].
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory GIFs are written to [default: assets/Clips].
    #[arg(long)]
    output: Option<PathBuf>,

    /// Encode preset: default | sized-optimized.
    #[arg(long)]
    preset: Option<String>,

    /// Override the preset's output width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Override the preset's frame-rate cap (0 removes the cap).
    #[arg(long)]
    fps_cap: Option<f64>,

    /// Override the encoder backend: native | ffmpeg.
    #[arg(long)]
    backend: Option<String>,

    /// Override the optimisation: none | optimize | optimizeplus.
    #[arg(long)]
    optimization: Option<String>,

    /// Override the colour fuzz percentage (0-100).
    #[arg(long)]
    fuzz: Option<u8>,

    /// Accepted file suffix; repeat to accept several [default: .mp4 .avi .mov .mkv].
    #[arg(long = "extension")]
    extensions: Vec<String>,

    /// Print the batch summary as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Show a progress bar (lowers logging to warnings unless --verbose).
    #[arg(long)]
    progress: bool,

    /// Exit with status 1 if any conversion failed.
    #[arg(long)]
    strict: bool,
}

fn build_preset(args: &ConvertArgs) -> Result<EncodePreset, Box<dyn std::error::Error>> {
    let name = match &args.preset {
        Some(name) => name.parse::<PresetName>()?,
        None => PresetName::Default,
    };
    let mut preset = EncodePreset::named(name);

    if let Some(width) = args.width {
        if width == 0 {
            return Err("--width must be greater than 0".into());
        }
        preset = preset.with_width(width);
    }
    if let Some(cap) = args.fps_cap {
        preset = preset.with_frame_rate_cap(cap);
    }
    if let Some(backend) = &args.backend {
        preset = preset.with_backend(backend.parse()?);
    }
    if let Some(optimization) = &args.optimization {
        preset = preset.with_optimization(optimization.parse()?);
    }
    if let Some(fuzz) = args.fuzz {
        if fuzz > 100 {
            return Err("--fuzz must be between 0 and 100".into());
        }
        preset = preset.with_fuzz(fuzz);
    }

    Ok(preset)
}

fn build_options(args: &ConvertArgs) -> Result<ConverterOptions, Box<dyn std::error::Error>> {
    let mut options = ConverterOptions::new().with_preset(build_preset(args)?);
    if let Some(input) = &args.input {
        options = options.with_input_dir(input);
    }
    if let Some(output) = &args.output {
        options = options.with_output_dir(output);
    }
    if !args.extensions.is_empty() {
        options = options.with_extensions(&args.extensions);
    }
    Ok(options)
}

fn init_logging(verbose: bool, progress: bool) {
    let default_filter = if verbose {
        "debug"
    } else if progress {
        "warn"
    } else {
        "info"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        })
        .init();
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Self {
        let style = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        let bar = ProgressBar::new(0);
        bar.set_style(style);
        Self { bar }
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.bar.set_length(info.total as u64);
        let name = info
            .input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.bar
            .set_message(format!("{name} ({:.0}% done)", info.percentage()));
    }

    fn on_job_finished(&self, _result: &JobResult) {
        self.bar.inc(1);
    }
}

fn job_json(job: &JobResult) -> serde_json::Value {
    let (output, frames) = match &job.outcome {
        JobOutcome::Converted { output, frames } => {
            (Some(output.display().to_string()), Some(*frames))
        }
        JobOutcome::Skipped { output } => (Some(output.display().to_string()), None),
        JobOutcome::Failed { .. } => (None, None),
    };
    json!({
        "input": job.input.display().to_string(),
        "outcome": job.outcome.label(),
        "output": output,
        "frames": frames,
        "error": job.outcome.error().map(|error| error.to_string()),
        "elapsed_seconds": job.elapsed.as_secs_f64(),
    })
}

fn status_label(status: RunStatus) -> &'static str {
    match status {
        RunStatus::InputDirectoryCreated => "input_directory_created",
        RunStatus::NoVideoFiles => "no_video_files",
        RunStatus::Completed => "completed",
    }
}

fn report_json(report: &BatchReport) -> serde_json::Value {
    json!({
        "status": status_label(report.status),
        "input_dir": report.input_dir.display().to_string(),
        "output_dir": report.output_dir.display().to_string(),
        "converted": report.converted_count(),
        "skipped": report.skipped_count(),
        "failed": report.failed_count(),
        "elapsed_seconds": report.elapsed.as_secs_f64(),
        "jobs": report.jobs.iter().map(job_json).collect::<Vec<_>>(),
    })
}

fn print_summary(report: &BatchReport) {
    for job in &report.jobs {
        let name = job.input.display().to_string();
        match &job.outcome {
            JobOutcome::Converted { output, frames } => println!(
                "{} {} -> {} ({} frames)",
                "converted".green().bold(),
                name,
                output.display(),
                frames
            ),
            JobOutcome::Skipped { output } => println!(
                "{} {} ({} exists)",
                "skipped".yellow().bold(),
                name,
                output.display()
            ),
            JobOutcome::Failed { reason } => {
                println!("{} {}: {}", "failed".red().bold(), name, reason)
            }
        }
    }

    if report.status == RunStatus::Completed {
        println!(
            "{} {} converted, {} skipped, {} failed",
            "done".cyan().bold(),
            report.converted_count(),
            report.skipped_count(),
            report.failed_count(),
        );
    }
}

fn print_presets() {
    for name in [PresetName::Default, PresetName::SizedOptimized] {
        let preset = EncodePreset::named(name);
        println!("{}", name.to_string().bold());
        println!(
            "  width: {}",
            preset
                .target_width
                .map(|width| width.to_string())
                .unwrap_or_else(|| "source".to_string())
        );
        println!(
            "  fps cap: {}",
            preset
                .frame_rate_cap
                .map(|cap| cap.to_string())
                .unwrap_or_else(|| "none".to_string())
        );
        println!("  backend: {}", preset.backend);
        println!("  optimization: {}", preset.optimization);
        println!("  fuzz: {}", preset.fuzz);
        println!("  zero-duration check: {}", preset.reject_zero_duration);
    }
}

fn convert(global: &GlobalOptions, args: &ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ffmpeg_level = global
        .ffmpeg_log_level
        .parse::<FfmpegLogLevel>()
        .map_err(|_| format!("unsupported --ffmpeg-log-level: {}", global.ffmpeg_log_level))?;

    let mut options = build_options(args)?;
    let progress = args.progress.then(|| Arc::new(TerminalProgress::new()));
    if let Some(progress) = &progress {
        options = options.with_progress(progress.clone());
    }

    let converter =
        BatchConverter::with_backend(options, FfmpegBackend::with_log_level(ffmpeg_level));
    let report = converter.run()?;

    if let Some(progress) = &progress {
        progress.bar.finish_and_clear();
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report_json(&report))?);
    } else {
        print_summary(&report);
    }

    if args.strict && !report.is_success() {
        return Err(format!("{} conversion(s) failed", report.failed_count()).into());
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Convert(ConvertArgs::default()));

    match command {
        Commands::Convert(args) => {
            init_logging(cli.global.verbose, args.progress);
            convert(&cli.global, &args)?;
        }
        Commands::Presets => print_presets(),
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "clipgif", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
