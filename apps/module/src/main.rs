use anyhow::Context;
use clap::Parser;
use modkit_logger::{LevelFilter, Logger, parse_level};
use modkit_module::{Module, ModuleConfig};
use std::path::PathBuf;

/// Sensor module process, launched and driven by the host.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Unix socket path assigned by the host.
    socket: Option<PathBuf>,

    /// Log verbosity: error, warn, info, debug or trace.
    #[arg(long = "log-level")]
    log_level: Option<String>,

    /// Optional settings file (toml, json or yaml).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[modkit_runtime::main(module)]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = ModuleConfig::load(cli.config.as_deref())
        .context("Critical: Configuration is malformed")?;

    let level =
        cli.log_level.as_deref().or(cfg.log_level.as_deref()).map_or(LevelFilter::INFO, parse_level);
    let logger = Logger::builder().name(env!("CARGO_BIN_NAME")).level(level);
    let _log = match &cfg.log_dir {
        Some(dir) if cfg.json_logs => logger.path(dir).json().init()?,
        Some(dir) => logger.path(dir).init()?,
        None => logger.init()?,
    };

    let mut builder = Module::builder();
    if let Some(socket) = cli.socket {
        builder = builder.socket(socket);
    }

    let closed = builder.config(&cfg).build().context("Failed to start module")?.run().await?;
    tracing::info!(closed, "Module exited");
    Ok(())
}
