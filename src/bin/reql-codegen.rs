//! Lua driver source generator.
//!
//! Regenerates `lua/rethinkdb.lua` from `lua/rethinkdb.pre.lua` and the ReQL
//! protocol definition.
//!
//! # Examples
//!
//! ```bash
//! # Regenerate with the defaults
//! reql-codegen
//!
//! # Use a different checkout layout
//! reql-codegen --config driver.toml
//! ```

use anyhow::Context;
use clap::Parser;
use reql_codegen::{Driver, GeneratorConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Generate the Lua ReQL driver from the protocol definition
#[derive(Parser, Debug)]
#[command(name = "reql-codegen")]
#[command(version = reql_codegen::VERSION)]
#[command(about = "Generate the Lua ReQL driver from the protocol definition", long_about = None)]
struct Cli {
    /// Configuration file layered over the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(&cli)?;

    println!("building source");

    let config = GeneratorConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let driver = Driver::new(config).context("Failed to generate AST fragments")?;
    for path in driver.run().context("Failed to build templates")? {
        info!(path = %path.display(), "Built");
    }

    println!("building successful");
    Ok(())
}

/// Setup logging on stderr, keeping stdout for the status lines
fn setup_logging(cli: &Cli) -> anyhow::Result<()> {
    let log_level = cli
        .log_level
        .parse::<tracing::Level>()
        .with_context(|| format!("Invalid log level '{}'", cli.log_level))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(!cli.no_color)
                .with_target(false),
        )
        .with(EnvFilter::default().add_directive(log_level.into()))
        .init();

    Ok(())
}
