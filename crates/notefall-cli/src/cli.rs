use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use notefall::{DEFAULT_SONG_ID, Difficulty};

#[derive(Parser)]
#[command(name = "notefall")]
#[command(version, about = "Lane rhythm game judgement core")]
pub struct Cli {
    /// Directory for the profile, history and last result
    #[arg(long, global = true, env = "NOTEFALL_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Game tuning file (TOML)
    #[arg(short, long, global = true, env = "NOTEFALL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Leaderboard service base URL
    #[arg(long, global = true, env = "NOTEFALL_API_ENDPOINT")]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Play a generated chart
    Play(PlayArgs),

    /// Query rankings
    Leaderboard {
        #[command(subcommand)]
        query: LeaderboardQuery,
    },

    /// Submit the last result, queueing it if the service is unreachable
    Submit,

    /// Submit queued scores
    Sync,

    /// Show or change the local profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Export play history
    Export {
        #[arg(short, long, value_enum, default_value = "tsv")]
        format: ExportKind,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct PlayArgs {
    #[arg(short, long, default_value = "normal")]
    pub difficulty: Difficulty,

    #[arg(short, long, default_value = DEFAULT_SONG_ID)]
    pub song: String,

    /// Chart seed (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Note speed multiplier (profile setting if omitted)
    #[arg(long)]
    pub speed: Option<f64>,

    /// Autoplay timing offset in milliseconds (positive is late)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub offset_ms: f64,

    /// Autoplay random timing spread in milliseconds
    #[arg(long, default_value_t = 0.0)]
    pub jitter_ms: f64,

    /// Share of notes the autoplay bot skips
    #[arg(long, default_value_t = 0.0)]
    pub miss_rate: f64,

    /// Run at wall-clock speed instead of simulating
    #[arg(long)]
    pub realtime: bool,

    /// Play lanes with D F J K instead of the bot (implies --realtime)
    #[arg(long)]
    pub manual: bool,

    /// Submit the result when the play finishes
    #[arg(long)]
    pub submit: bool,
}

#[derive(Subcommand)]
pub enum LeaderboardQuery {
    /// Ranking of one difficulty
    Difficulty {
        difficulty: Difficulty,
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Rankings of every difficulty
    All {
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Ranking of one song
    Song {
        song_id: String,
        #[arg(short, long)]
        difficulty: Option<Difficulty>,
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// All-time and monthly best of a chart
    Top {
        song_id: String,
        difficulty: Difficulty,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    Show,
    SetUsername { name: String },
    SetSpeed { speed: f64 },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportKind {
    Tsv,
    Json,
}
