use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

use mixwise::{
    config::Config,
    features::{CamelotKey, EnergyDirection},
    library::{InMemoryLibrary, LibraryStore},
    recommend::{CandidateRanker, RecommendationRequest},
    scoring::{BpmRange, CompatibilityScorer, HarmonicRelation},
};

#[derive(Parser)]
#[command(
    name = "mixwise",
    version,
    about = "Next-track recommendations for DJ sets",
    long_about = "Mixwise ranks the tracks of a library as candidates to play after the current one, scoring tempo, harmonic key, energy flow and audio similarity."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (raises RUST_LOG filters to at least debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Rank library tracks to play after a source track
    Recommend(RecommendArgs),

    /// Score a single transition between two tracks
    Score {
        /// Library snapshot (JSON array of track records)
        #[arg(short, long)]
        library: PathBuf,

        /// Currently playing track id
        #[arg(long)]
        from: String,

        /// Candidate track id
        #[arg(long)]
        to: String,

        /// Desired energy change (build, maintain, drop)
        #[arg(short, long, default_value = "maintain")]
        direction: EnergyDirection,
    },

    /// List the keys that mix harmonically with a key
    Keys {
        /// Key in Camelot, Open Key or standard notation
        key: String,
    },

    /// Suggest tempo ranges to mix into from a BPM
    BpmRange {
        bpm: f64,

        /// Tolerance in percent (defaults to the configured value)
        #[arg(short, long, allow_negative_numbers = true)]
        tolerance: Option<f64>,
    },

    /// Write the default configuration as TOML
    InitConfig {
        path: PathBuf,
    },
}

#[derive(Args)]
struct RecommendArgs {
    /// Library snapshot (JSON array of track records)
    #[arg(short, long)]
    library: PathBuf,

    /// Currently playing track id
    #[arg(short, long)]
    track: String,

    /// Number of recommendations
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Desired energy change (build, maintain, drop)
    #[arg(short, long, default_value = "maintain")]
    direction: EnergyDirection,

    /// BPM tolerance in percent for this request
    #[arg(long)]
    bpm_tolerance: Option<f64>,

    /// Only tracks in exactly the same key
    #[arg(long, conflicts_with = "harmonic")]
    same_key: bool,

    /// Only tracks within one harmonic step
    #[arg(long)]
    harmonic: bool,

    /// Only tracks inside the BPM tolerance window
    #[arg(long)]
    bpm_window: bool,

    /// Track ids to leave out, e.g. already played
    #[arg(short, long, num_args = 1..)]
    exclude: Vec<String>,
}

#[derive(Serialize)]
struct HarmonicKey {
    key: CamelotKey,
    relation: HarmonicRelation,
    score: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for JSON output
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(env.as_deref(), cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    debug!("Starting mixwise v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Recommend(args) => recommend(&config, args),
        Command::Score { library, from, to, direction } => {
            let library = InMemoryLibrary::from_json_file(&library)?;
            let scorer = CompatibilityScorer::new(config.scoring.clone())?;

            let source = find_track(&library, &from)?;
            let candidate = find_track(&library, &to)?;
            print_json(&scorer.score(&source, &candidate, direction))
        }
        Command::Keys { key } => {
            let key = CamelotKey::parse(&key)
                .ok_or_else(|| anyhow::anyhow!("Unrecognized key: {}", key))?;

            let keys: Vec<HarmonicKey> = key
                .harmonic_keys()
                .into_iter()
                .map(|other| {
                    let relation = HarmonicRelation::between(&key, &other);
                    HarmonicKey {
                        key: other,
                        relation,
                        score: relation.score(),
                    }
                })
                .collect();
            print_json(&keys)
        }
        Command::BpmRange { bpm, tolerance } => {
            let tolerance = tolerance.unwrap_or(config.scoring.bpm_tolerance_percent);
            let range = BpmRange::checked(bpm, tolerance).map_err(|e| anyhow::anyhow!(e.user_message()))?;
            print_json(&range)
        }
        Command::InitConfig { path } => {
            config.save_to_file(&path)?;
            info!("Configuration written to {:?}", path);
            Ok(())
        }
    }
}

/// `RUST_LOG` directives when set, `info` otherwise; `--verbose` adds a debug floor either way
fn log_filter(env: Option<&str>, verbose: bool) -> EnvFilter {
    let filter = env
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    let below_debug = filter.max_level_hint().map_or(true, |level| level < LevelFilter::DEBUG);
    if verbose && below_debug {
        filter.add_directive(LevelFilter::DEBUG.into())
    } else {
        filter
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Ok(Config::from_file(config_path)?)
        }
        None => {
            debug!("Using default configuration");
            Ok(Config::default())
        }
    }
}

fn recommend(config: &Config, args: RecommendArgs) -> Result<()> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.ranking.scoring_threads)
        .build_global()
        .context("Failed to size the scoring thread pool")?;

    let library = InMemoryLibrary::from_json_file(&args.library)?;
    let ranker = CandidateRanker::new(library, config)?;

    let mut request = RecommendationRequest::new(args.track)
        .with_direction(args.direction)
        .excluding(args.exclude);
    request.limit = args.limit;
    request.bpm_tolerance_percent = args.bpm_tolerance;
    request.same_key_only = args.same_key;
    request.harmonic_only = args.harmonic;
    request.bpm_window_only = args.bpm_window;

    let response = ranker
        .recommend(&request)
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    info!(
        "{} recommendations from {} candidates{}",
        response.recommendations.len(),
        response.pool_size,
        if response.degraded { " (degraded)" } else { "" }
    );
    print_json(&response)
}

fn find_track(library: &InMemoryLibrary, id: &str) -> Result<mixwise::TrackFeatures> {
    library
        .get_track_features(id)?
        .ok_or_else(|| anyhow::anyhow!("Track '{}' is not in the library", id))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
