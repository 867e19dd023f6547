use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use release_radar::config::{self, UpdaterConfig};
use release_radar::logging::{self, LogTarget};
use release_radar::provider::Provider;
use release_radar::provider::sources::{
    BukkitProvider, GitHubProvider, PolymartProvider, SpigetProvider, SpigotProvider,
};
use release_radar::schedule::{ExecutionMode, Updater};
use release_radar::version::Version;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "release-radar")]
#[command(version, about = "Resolve the latest release of an artifact across release hosts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check for a newer release once, or on the configured interval with --watch
    Check(CheckArgs),
}

/// Providers are registered in flag order: GitHub, Spigot, Spiget, Polymart, Bukkit.
/// Earlier providers win ties between equal versions.
#[derive(Args)]
struct CheckArgs {
    /// Version currently installed
    #[arg(long)]
    current: String,

    /// Application name used in notifications
    #[arg(long, default_value = "application")]
    name: String,

    #[arg(long, value_name = "OWNER/REPO")]
    github: Vec<String>,

    #[arg(long, value_name = "RESOURCE_ID")]
    spigot: Vec<u32>,

    #[arg(long, value_name = "RESOURCE_ID")]
    spiget: Vec<u32>,

    #[arg(long, value_name = "RESOURCE_ID")]
    polymart: Vec<u32>,

    #[arg(long, value_name = "PROJECT_ID")]
    bukkit: Vec<u32>,

    /// CurseForge API key sent with Bukkit requests
    #[arg(long)]
    bukkit_api_key: Option<String>,

    /// JSON updater configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Accept alpha, beta, rc and snapshot releases
    #[arg(long)]
    unstable: bool,

    /// Never download release artifacts
    #[arg(long)]
    no_download: bool,

    /// Keep checking on the configured interval until Ctrl-C
    #[arg(long)]
    watch: bool,

    /// Write JSON logs to this file instead of stderr (default: data directory)
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Check(args) => tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?
            .block_on(check(args)),
    }
}

async fn check(args: CheckArgs) -> anyhow::Result<()> {
    let _guard = logging::init(
        args.log_file
            .clone()
            .map(|path| LogTarget::File(path.unwrap_or_else(config::log_path)))
            .unwrap_or(LogTarget::Stderr),
    );

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => UpdaterConfig::default(),
    };
    config.unstable |= args.unstable;
    config.attempt_downloads &= !args.no_download;

    let updater = Updater::builder(&args.name, Version::parse(&args.current))
        .config(config)
        .providers(providers(&args))
        .build()
        .context("Invalid updater configuration")?;

    if !args.watch {
        let result = updater.run_once(ExecutionMode::Sync).await;
        println!("{}", result);
        return Ok(());
    }

    let Some(handle) = updater
        .run_periodic(ExecutionMode::Async, CancellationToken::new())
        .await
    else {
        println!("{}", updater.result().await);
        return Ok(());
    };

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    handle.stop().await;

    Ok(())
}

fn providers(args: &CheckArgs) -> Vec<Arc<dyn Provider>> {
    let mut providers: Vec<Arc<dyn Provider>> = Vec::new();

    for repo in &args.github {
        providers.push(Arc::new(GitHubProvider::new(repo)));
    }
    for id in &args.spigot {
        providers.push(Arc::new(SpigotProvider::new(*id)));
    }
    for id in &args.spiget {
        providers.push(Arc::new(SpigetProvider::new(*id)));
    }
    for id in &args.polymart {
        providers.push(Arc::new(PolymartProvider::new(*id)));
    }
    for id in &args.bukkit {
        let mut provider = BukkitProvider::new(*id);
        if let Some(key) = &args.bukkit_api_key {
            provider = provider.with_api_key(key.as_str());
        }
        providers.push(Arc::new(provider));
    }

    providers
}

fn load_config(path: &Path) -> anyhow::Result<UpdaterConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Invalid config file {}", path.display()))
}
