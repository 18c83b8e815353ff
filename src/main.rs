use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    ffnodemap::logging::init().context("init logging")?;

    let cli = ffnodemap::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        ffnodemap::cli::Command::Sync(args) => {
            ffnodemap::sync::run(args).await.context("sync")?;
        }
        ffnodemap::cli::Command::Convert(args) => {
            ffnodemap::convert::run(args).context("convert")?;
        }
    }

    Ok(())
}
