//
//  build-center-cli
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use build_center_cli::cli::{Cli, Commands};
use build_center_cli::exit_codes;
use build_center_cli::output::OutputWriter;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logging(cli.global.log.as_deref());

    match run(cli).await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            OutputWriter::new().write_error(&format!("{e:#}"));
            std::process::exit(exit_codes::for_error(&e));
        }
    }
}

/// Initialize logging from `--log` / `BC_LOG`, defaulting to warnings only
fn init_logging(directives: Option<&str>) {
    let filter = directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Main command dispatcher
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Apps(cmd) => cmd.run(&cli.global).await,
        Commands::Releases(cmd) => cmd.run(&cli.global).await,
        Commands::Assets(cmd) => cmd.run(&cli.global).await,
        Commands::Tokens(cmd) => cmd.run(&cli.global).await,
        Commands::Webhooks(cmd) => cmd.run(&cli.global).await,
        Commands::Config(cmd) => cmd.run(&cli.global).await,
        Commands::Setup(cmd) => cmd.run(&cli.global).await,
        Commands::Test(cmd) => cmd.run(&cli.global).await,
        Commands::Completion(cmd) => cmd.run(&cli.global).await,
        Commands::Version => {
            println!("bc version {}", build_center_cli::VERSION);
            Ok(())
        }
    }
}
