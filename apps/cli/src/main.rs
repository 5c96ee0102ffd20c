//! Command-line front end for the modpack installer library

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use modpack::{
    ByteEvent, InstallConfig, InstallOptions, ModPack, NullRuntimeInstaller, PackLocation,
    Progress, StepEvent,
};

#[derive(Parser)]
#[command(name = "modpack", about = "Inspect and install modpacks", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a pack and print its normalized manifest
    Inspect {
        /// Local path or http(s) URL of the pack archive
        pack: String,
    },
    /// Materialize a pack into a directory
    ///
    /// The base runtime and loader are expected to be managed by the
    /// launcher; this command applies the pack contents (overrides and mod
    /// assets) and prints the resolved version identifier.
    Install {
        /// Local path or http(s) URL of the pack archive
        pack: String,
        /// Install target directory
        #[arg(long)]
        dir: PathBuf,
        /// Maximum concurrent downloads
        #[arg(long, default_value_t = 8)]
        jobs: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Command::Inspect { pack } => inspect(&pack).await,
        Command::Install { pack, dir, jobs } => install(&pack, dir, jobs).await,
    }
}

async fn inspect(location: &str) -> anyhow::Result<()> {
    let mut pack = ModPack::new(PackLocation::parse(location))?;
    let result = pack.load().await.context("failed to load pack");
    if let Some(manifest) = pack.manifest() {
        println!("provider:      {}", manifest.provider);
        println!("name:          {}", manifest.name);
        println!("version:       {}", manifest.version);
        println!("game version:  {}", manifest.game_version);
        println!("memory (MB):   {}", manifest.recommended_ram_mb);
        println!("overrides dir: {}", manifest.overrides_dir);
        println!(
            "assets:        {} ({} required)",
            manifest.assets.len(),
            manifest.assets.iter().filter(|a| a.required).count(),
        );
    }
    pack.dispose().await;
    result
}

async fn install(location: &str, dir: PathBuf, jobs: usize) -> anyhow::Result<()> {
    let config = InstallConfig {
        max_concurrent_downloads: jobs,
        ..InstallConfig::default()
    };
    let mut pack = ModPack::with_config(PackLocation::parse(location), config)?;

    let progress = Progress::none()
        .with_steps(Arc::new(|event: StepEvent| match event {
            StepEvent::StageStarted { stage, total } => {
                println!("[{stage}] starting ({total} items)");
            }
            StepEvent::StepCompleted {
                stage,
                name,
                index,
                total,
            } => {
                println!("[{stage}] {}/{total} {name}", index + 1);
            }
            StepEvent::StageFinished { stage } => println!("[{stage}] done"),
            StepEvent::Warning { stage, message } => eprintln!("[{stage}] warning: {message}"),
        }))
        .with_bytes(Arc::new(|event: ByteEvent| {
            if let Some(ratio) = event.ratio() {
                println!("{:.0}%", ratio * 100.0);
            }
        }));

    let result = run_install(&mut pack, dir, progress).await;
    pack.dispose().await;
    result
}

async fn run_install(
    pack: &mut ModPack,
    dir: PathBuf,
    progress: Progress,
) -> anyhow::Result<()> {
    pack.load_with(&progress, &Default::default())
        .await
        .context("failed to load pack")?;

    let options = InstallOptions::new(dir).with_progress(progress);
    let report = pack
        .install(&NullRuntimeInstaller, &options)
        .await
        .context("install failed")?;

    println!("installed version: {}", report.installed_version);
    println!(
        "{} overrides copied, {} assets downloaded, {} already present",
        report.overrides_copied, report.assets_downloaded, report.assets_skipped,
    );
    for warning in &report.warnings {
        eprintln!("warning: {}: {}", warning.destination, warning.reason);
    }
    Ok(())
}
