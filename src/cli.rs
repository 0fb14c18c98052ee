use crate::{
    config::Config,
    format::DocFormat,
    mirror::Mirror,
    tools::{SystemTools, Tools},
    util::ensure_dir,
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "docuspark")]
#[command(about = "Batch document-to-Markdown converter (Pandoc + Tesseract + tree mirroring)")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./docuspark.toml if present,
    /// otherwise built-in defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Probe the external toolchain (pandoc, pdftotext, pdfimages, tesseract).
    Doctor {},
    /// Show how one file would be dispatched and where its output would land.
    Inspect {
        #[arg(long)]
        input: PathBuf,
    },
    /// Convert the input tree into a mirrored Markdown tree.
    Run {
        /// Input root; defaults to paths.input_dir from config.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output root; defaults to paths.output_dir from config.
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = resolve_config(args.config.as_deref())?;

    match &args.cmd {
        Command::Doctor {} => {
            let _guard = init_logging(&args, &cfg, None)?;
            doctor(&cfg)
        }
        Command::Inspect { input } => {
            let _guard = init_logging(&args, &cfg, None)?;
            inspect(&cfg, input)
        }
        Command::Run { input, out_dir } => run(&args, &cfg, input.as_deref(), out_dir.as_deref()),
    }
}

fn resolve_config(user: Option<&Path>) -> Result<Config> {
    if let Some(p) = user {
        return Config::load(p);
    }
    let default = PathBuf::from("docuspark.toml");
    if default.exists() {
        Config::load(&default)
    } else {
        Ok(Config::default())
    }
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stdout_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn doctor(cfg: &Config) -> Result<()> {
    let tools = SystemTools::new(cfg);
    let diag = tools.doctor()?;
    println!("{}", serde_json::to_string_pretty(&diag)?);
    Ok(())
}

fn inspect(cfg: &Config, input: &Path) -> Result<()> {
    let format = DocFormat::from_path(input)?;

    // Layout relative to the input root when the file lives under it; a
    // bare file name otherwise.
    let relative = input
        .strip_prefix(Path::new(&cfg.paths.input_dir))
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| {
            input
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| input.to_path_buf())
        });
    let markdown = relative.with_extension("md");
    let images_dir = match relative.parent() {
        Some(parent) if parent != Path::new("") => parent.join("images"),
        _ => PathBuf::from("images"),
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "input": input,
            "format": format,
            "markdown_output": markdown,
            "images_dir": images_dir,
            "extracts_images": !format.is_text_only(),
        }))?
    );
    Ok(())
}

fn run(
    args: &Args,
    cfg: &Config,
    input_override: Option<&Path>,
    out_override: Option<&Path>,
) -> Result<()> {
    let input_root = input_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&cfg.paths.input_dir));
    let output_root = out_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&cfg.paths.output_dir));

    let log_path = resolve_log_path(cfg, &output_root);
    let _guard = init_logging(args, cfg, log_path.as_deref())?;

    info!(
        "run input={} output={}",
        input_root.display(),
        output_root.display()
    );

    if cfg.debug.dump_effective_config {
        ensure_dir(&output_root)?;
        let raw = toml::to_string(cfg).unwrap_or_default();
        std::fs::write(output_root.join("effective-config.toml"), raw)?;
    }

    let tools = SystemTools::new(cfg);
    let mirror = Mirror::new(cfg, tools)?;
    let summary = mirror.process(&input_root, &output_root)?;

    if cfg.output.write_report_json {
        std::fs::write(
            output_root.join(&cfg.output.report_filename),
            serde_json::to_string_pretty(&summary)?,
        )?;
    }

    if cfg.global.print_summary {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "converted": summary.converted,
                "skipped_unsupported": summary.skipped_unsupported,
                "failed": summary.failed,
                "output_root": output_root,
            }))?
        );
    }

    // Per-document failures are reported above but do not fail the batch;
    // only fatal conditions bubble up as Err.
    Ok(())
}

fn resolve_log_path(cfg: &Config, output_root: &Path) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }

    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }

    Some(output_root.join("docuspark.log"))
}
