use anyhow::{Context, Result};
use clap::Parser;
use songplay_etl::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_DB_PATH, DEFAULT_LOG_DATA_DIR, DEFAULT_SONG_DATA_DIR,
};
use songplay_etl::etl::run_pipeline;
use songplay_etl::warehouse::SqliteWarehouse;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir().context("Error resolving current directory")?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
#[command(name = "songplay-etl")]
#[command(about = "Load song metadata and listening logs into a SQLite star schema")]
struct CliArgs {
    /// Path to the SQLite warehouse database file.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Directory tree holding the song metadata files.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_SONG_DATA_DIR)]
    pub song_data: PathBuf,

    /// Directory tree holding the event log files.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_LOG_DATA_DIR)]
    pub log_data: PathBuf,

    /// Drop and recreate every warehouse table before loading.
    #[clap(long, default_value_t = false)]
    pub reset_schema: bool,

    /// Path to a TOML config file. Its values override the CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let cli_config = CliConfig {
        db_path: cli_args.db_path,
        song_data_dir: cli_args.song_data,
        log_data_dir: cli_args.log_data,
        reset_schema: cli_args.reset_schema,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Opening warehouse database at {:?}...", config.db_path);
    let mut warehouse = if config.reset_schema {
        warn!("Recreating warehouse schema, existing rows will be dropped");
        SqliteWarehouse::recreate(&config.db_path)?
    } else {
        SqliteWarehouse::open(&config.db_path)?
    };

    let report = run_pipeline(&mut warehouse, &config.song_data_dir, &config.log_data_dir)?;

    info!("");
    info!("Load Summary");
    info!("============");
    info!(
        "Song files: {}/{} ({} artists, {} songs written)",
        report.songs.files_processed,
        report.songs.files_found,
        report.songs.stats.artists,
        report.songs.stats.songs
    );
    let log_stats = &report.logs.stats;
    info!(
        "Log files: {}/{} ({} song plays, {} unmatched, {} non-play events)",
        report.logs.files_processed,
        report.logs.files_found,
        log_stats.songplays,
        log_stats.lookup_misses,
        log_stats.events_skipped
    );
    if log_stats.user_failures > 0 || log_stats.plays_without_user > 0 {
        warn!(
            "User rows failed: {}, matched plays without user: {}",
            log_stats.user_failures, log_stats.plays_without_user
        );
    }

    let counts = warehouse.get_counts()?;
    info!("");
    info!("Database contains:");
    info!("  {} songplays", counts.songplays);
    info!("  {} users", counts.users);
    info!("  {} songs", counts.songs);
    info!("  {} artists", counts.artists);
    info!("  {} time marks", counts.time);

    Ok(())
}
