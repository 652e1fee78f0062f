//! Release Deprecation - CLI Entry Point

use anyhow::Result;
use clap::{Parser, ValueEnum};
use release_deprecation::{DeprecationConfig, DeprecationNotice, Release};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "release-deprecation",
    about = "Validate and render release-scheduled deprecation notices",
    version
)]
struct Args {
    /// Path to the deprecation manifest
    #[arg(short, long, default_value = "deprecations.yaml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, default_value = "info")]
    log_level: Level,

    /// Print a sample manifest and exit
    #[arg(long)]
    print_config: bool,

    /// Validate the manifest and exit
    #[arg(long)]
    validate: bool,

    /// Resolve a release name or code and exit
    #[arg(long, value_name = "TEXT")]
    resolve: Option<String>,

    /// List known releases in order and exit
    #[arg(long)]
    releases: bool,

    /// Output format for notices
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if args.print_config {
        let default_config = include_str!("../demos/default-config.yaml");
        println!("{}", default_config);
        return Ok(());
    }

    if args.releases {
        for release in Release::iter() {
            println!("{:>2} {} {}", release.index(), release.code(), release.name());
        }
        return Ok(());
    }

    if let Some(text) = &args.resolve {
        let release: Release = text.parse()?;
        println!("{} ({})", release.name(), release.code());
        return Ok(());
    }

    // Load configuration
    let config = if args.config.exists() {
        info!(path = ?args.config, "Loading manifest");
        DeprecationConfig::from_file(&args.config)?
    } else if args.validate {
        anyhow::bail!("Manifest not found: {:?}", args.config);
    } else {
        info!("No manifest found, nothing to report");
        DeprecationConfig::default()
    };

    if args.validate {
        config.validate()?;
        println!("Manifest is valid");
        return Ok(());
    }

    let notices = config.notices()?;
    info!(count = notices.len(), "Rendered deprecation notices");
    print_notices(&notices, args.format)?;

    Ok(())
}

fn print_notices(notices: &[DeprecationNotice], format: Format) -> Result<()> {
    match format {
        Format::Text => {
            for notice in notices {
                println!("{}", notice);
            }
        }
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(notices)?);
        }
    }
    Ok(())
}
