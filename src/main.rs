//! djset command-line front end.

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use djset::analysis::{self, AudioAnalyzer, WavAnalyzer};
use djset::config::EngineConfig;
use djset::dsl::Program;
use djset::engine::{Context, Engine};

#[derive(Parser, Debug)]
#[command(name = "djset", version, about = "Run DJ set programs and analyze tracks")]
struct Cli {
    /// Config file (defaults to ~/.djset/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a program file
    Run {
        /// YAML program
        program: PathBuf,
    },
    /// Detect the tempo of a WAV file
    Bpm {
        file: PathBuf,
    },
    /// Suggest mix-in and mix-out points for a WAV file
    Mix {
        file: PathBuf,
        /// Skip detection and cut segments at this tempo
        #[arg(long)]
        bpm: Option<f64>,
        /// Segment length in bars
        #[arg(long)]
        bars: Option<u32>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("DJSET_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::load_default()?,
    };
    Ok(config)
}

fn run_program(path: &Path, config: &EngineConfig) -> Result<()> {
    let program =
        Program::load(path).with_context(|| format!("cannot load program {}", path.display()))?;
    info!(path = %path.display(), commands = program.len(), "program loaded");

    let analyzer = WavAnalyzer::new(config.analysis.clone());
    let mut engine = Engine::new(Box::new(analyzer), io::stdout().lock())
        .with_default_bars(config.analysis.default_bars);
    let mut ctx = Context::new();
    let result = engine.run(&program, &mut ctx);
    engine.into_output().flush()?;
    result.with_context(|| format!("program {} aborted", path.display()))
}

fn detect_bpm(path: &Path, config: &EngineConfig) -> Result<()> {
    let analyzer = WavAnalyzer::new(config.analysis.clone());
    let bpm = analyzer
        .estimate_bpm(path)
        .with_context(|| format!("cannot detect BPM of {}", path.display()))?;
    println!("{bpm:.2}");
    Ok(())
}

fn mix_points(
    path: &Path,
    bpm: Option<f64>,
    bars: Option<u32>,
    config: &EngineConfig,
) -> Result<()> {
    let analyzer = WavAnalyzer::new(config.analysis.clone());
    let bars = bars.unwrap_or(config.analysis.default_bars);
    if !analyzer.audio_exists(path) {
        anyhow::bail!("audio file does not exist: {}", path.display());
    }
    let report = analysis::analyze_mix(&analyzer, path, bpm, bars)
        .with_context(|| format!("cannot analyze {}", path.display()))?;
    println!("Using BPM: {:.2}", report.bpm);
    println!(
        "Mix points: segment {}, mix-in at {}, mix-out at {}",
        report.points.segment_index, report.points.mix_in_time, report.points.mix_out_time
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Run { program } => run_program(program, &config),
        Commands::Bpm { file } => detect_bpm(file, &config),
        Commands::Mix { file, bpm, bars } => mix_points(file, *bpm, *bars, &config),
    }
}
