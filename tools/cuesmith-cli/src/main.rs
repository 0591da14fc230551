//! Cuesmith CLI: transcribe audio and edit timed cue files.
//!
//! Usage:
//!   cuesmith transcribe <AUDIO>      Transcribe with the hosted service and export cues
//!   cuesmith segment <TRANSCRIPT>    Segment an existing transcript into cues
//!   cuesmith show <CUES>             List cues, optionally marking the active one
//!   cuesmith nudge <CUES>            Shift one cue bound by a single step
//!   cuesmith retime <CUES>           Type a new start or end time for a cue
//!   cuesmith preview <CUES>          Simulated playback printing each active cue
//!   cuesmith config [--init]         Print (or write) the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use cuesmith_common::config::AppConfig;
use cuesmith_cue_model::cue::TimeBound;

mod commands;

#[derive(Parser)]
#[command(
    name = "cuesmith",
    about = "Transcribe audio and hand-tune the resulting subtitle cues",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/cuesmith/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Bound {
    Start,
    End,
}

impl From<Bound> for TimeBound {
    fn from(b: Bound) -> Self {
        match b {
            Bound::Start => TimeBound::Start,
            Bound::End => TimeBound::End,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Direction {
    Earlier,
    Later,
}

#[derive(Subcommand)]
enum Commands {
    /// Transcribe an audio file and export its cues
    Transcribe {
        /// Audio file to upload
        audio: PathBuf,

        /// Audio duration in seconds
        #[arg(short, long)]
        duration: f64,

        /// Language hint (defaults to the configured language)
        #[arg(short, long)]
        lang: Option<String>,

        /// Output directory for the cue file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Segment a plain-text transcript into cues
    Segment {
        /// Transcript text file
        transcript: PathBuf,

        /// Audio duration in seconds
        #[arg(short, long)]
        duration: f64,

        /// Output cue file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the cues in a file
    Show {
        /// Cue file
        path: PathBuf,

        /// Mark the cue active at this position (seconds)
        #[arg(long)]
        at: Option<f64>,

        /// Print the editor state as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Shift one bound of a cue by a single nudge step
    Nudge {
        /// Cue file, rewritten in place
        path: PathBuf,

        /// Cue number as listed by `show` (1-based, in start order)
        #[arg(long)]
        cue: u64,

        #[arg(long, value_enum)]
        bound: Bound,

        #[arg(long, value_enum)]
        direction: Direction,

        /// Audio duration in seconds (defaults to the last cue's end)
        #[arg(long)]
        duration: Option<f64>,
    },

    /// Set a cue bound from a typed MM:SS.mmm value
    Retime {
        /// Cue file, rewritten in place
        path: PathBuf,

        /// Cue number as listed by `show` (1-based, in start order)
        #[arg(long)]
        cue: u64,

        #[arg(long, value_enum)]
        bound: Bound,

        /// New time, e.g. 01:02.500
        #[arg(long)]
        time: String,

        /// Audio duration in seconds (defaults to the last cue's end)
        #[arg(long)]
        duration: Option<f64>,
    },

    /// Play a cue file against a simulated clock
    Preview {
        /// Cue file
        path: PathBuf,

        /// Playback speed multiplier
        #[arg(long, default_value = "1.0")]
        speed: f64,
    },

    /// Print the effective configuration as JSON
    Config {
        /// Write the effective configuration to the standard location
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?,
        None => AppConfig::load(),
    };

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    cuesmith_common::logging::init_logging(&logging);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "cuesmith starting");

    match cli.command {
        Commands::Transcribe {
            audio,
            duration,
            lang,
            output,
        } => commands::transcribe::run(&config, audio, duration, lang, output).await,
        Commands::Segment {
            transcript,
            duration,
            output,
        } => commands::segment::run(&config, transcript, duration, output),
        Commands::Show { path, at, json } => commands::show::run(&config, path, at, json),
        Commands::Nudge {
            path,
            cue,
            bound,
            direction,
            duration,
        } => commands::nudge::run(
            &config,
            path,
            cue,
            bound.into(),
            matches!(direction, Direction::Later),
            duration,
        ),
        Commands::Retime {
            path,
            cue,
            bound,
            time,
            duration,
        } => commands::retime::run(&config, path, cue, bound.into(), time, duration),
        Commands::Preview { path, speed } => commands::preview::run(&config, path, speed).await,
        Commands::Config { init } => commands::config::run(&config, init),
    }
}
