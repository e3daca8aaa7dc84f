//! Lumen CLI
//!
//! Lists the built-in lessons, plays them frame by frame as text, and runs
//! headless scenario files against them.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use lumen_app::headless_runner::run_scenario;
use lumen_app::prelude::*;
use lumen_app::{describe, TextRenderer, CONFIG_FILE};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(about = "Declarative view state and transition lessons")]
#[command(version)]
struct Cli {
    /// Directory containing lumen.toml, or the file itself
    #[arg(short, long, global = true, default_value = ".")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the built-in lessons
    Lessons,

    /// Play a lesson, printing every presented frame
    Run {
        /// Lesson name
        lesson: String,

        /// Tap the named node, then let the animation settle (repeatable)
        #[arg(short, long = "tap", value_name = "ID")]
        taps: Vec<String>,

        /// Extra frames to step after the last tap
        #[arg(short, long, default_value = "0")]
        frames: u32,

        /// Print only the final frame
        #[arg(long)]
        last: bool,
    },

    /// Run a headless scenario file and print its JSON report
    Scenario {
        /// Lesson name
        lesson: String,

        /// Scenario JSON file
        file: PathBuf,

        /// Also write the report to this relative path
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Print the resolved configuration
    Config {
        /// Write it to lumen.toml in the current directory
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = LumenConfig::load_from_dir(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    match cli.command {
        Commands::Lessons => cmd_lessons(),
        Commands::Run {
            lesson,
            taps,
            frames,
            last,
        } => cmd_run(config, &lesson, &taps, frames, last),
        Commands::Scenario {
            lesson,
            file,
            report,
        } => cmd_scenario(config, &lesson, &file, report.as_deref()),
        Commands::Config { init } => cmd_config(&config, init),
    }
}

fn cmd_lessons() -> Result<()> {
    let mut out = io::stdout().lock();
    let width = lessons::LESSONS
        .iter()
        .map(|lesson| lesson.name.len())
        .max()
        .unwrap_or(0);
    for lesson in lessons::LESSONS {
        writeln!(out, "{:width$}  {}", lesson.name, lesson.title)?;
        writeln!(out, "{:width$}  {}", "", lesson.description)?;
    }
    Ok(())
}

fn cmd_run(config: LumenConfig, lesson: &str, taps: &[String], frames: u32, last: bool) -> Result<()> {
    let interval = config.animation.frame_interval_ms;
    let mut runtime = lessons::launch(lesson, config)?;
    tracing::info!(lesson, taps = taps.len(), "playing lesson");

    if last {
        let mut sink = SnapshotRenderer::new();
        for id in taps {
            tap(&mut runtime, id)?;
            runtime.settle(&mut sink);
        }
        for _ in 0..frames {
            runtime.advance(interval);
        }
        let frame = runtime.frame();
        print!("t={:.1}ms\n{}", frame.time_ms, describe(&frame.tree));
        return Ok(());
    }

    let mut renderer = TextRenderer::new(io::stdout());
    runtime.render(&mut renderer);
    for id in taps {
        tap(&mut runtime, id)?;
        runtime.settle(&mut renderer);
    }
    for _ in 0..frames {
        renderer.render(&runtime.advance(interval));
    }
    renderer.into_inner().flush()?;
    Ok(())
}

fn tap(runtime: &mut Runtime, id: &str) -> Result<()> {
    if !runtime.dispatch(InputEvent::tap(id))? {
        bail!("no node named '{id}' in lesson '{}'", runtime.view_name());
    }
    Ok(())
}

fn cmd_scenario(config: LumenConfig, lesson: &str, file: &Path, report: Option<&Path>) -> Result<()> {
    let input = std::fs::read_to_string(file)
        .with_context(|| format!("reading scenario {}", file.display()))?;

    let mut sink = SnapshotRenderer::new();
    let outcome = run_scenario(&input, Some(lesson), config, &mut sink)?;

    outcome.report().write_to_writer(&mut io::stdout().lock())?;
    if let Some(path) = report {
        outcome.report().write_to_path(path)?;
        tracing::info!(path = %path.display(), "report written");
    }

    if outcome.is_failed() {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_config(config: &LumenConfig, init: bool) -> Result<()> {
    let content = config.to_toml()?;
    if !init {
        print!("{content}");
        return Ok(());
    }

    let path = Path::new(CONFIG_FILE);
    if path.exists() {
        bail!("{CONFIG_FILE} already exists");
    }
    std::fs::write(path, content).with_context(|| format!("writing {CONFIG_FILE}"))?;
    println!("Created {CONFIG_FILE}");
    Ok(())
}
