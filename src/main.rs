use anyhow::{Context, Result};
use clap::Parser;

use llmsexport::ExportConfig;

mod cli_bin;

use cli_bin::args::{Cli, Commands};
use cli_bin::commands;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(&cli);

    let config = ExportConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Commands::Build(args) => commands::build_command(config, args).context("build failed")?,
        Commands::Clean(args) => commands::clean_command(config, args).context("clean failed")?,
        Commands::Order(args) => commands::order_command(config, args)?,
        Commands::Video(args) => commands::video_command(config, args)?,
    }
    Ok(())
}

// RUST_LOG takes precedence over -v/-q.
fn init_logger(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}
