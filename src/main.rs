mod cli;

use vidcursor::{
    config,
    probe::{self, ProbeOptions},
};
use vidcursor_io::VideoReader;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "vidcursor=trace,vidcursor_io=trace".to_string()
        } else {
            "vidcursor=info,vidcursor_io=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Head { location, bytes } => {
            let config = load(cli.config.as_deref(), cli.max_buffer_length)?;
            head(&location, bytes, &config)
        }
        Commands::Probe {
            location,
            scan_limit,
            json,
        } => {
            let config = load(cli.config.as_deref(), cli.max_buffer_length)?;
            probe_location(&location, scan_limit, json, &config)
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("vidcursor {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn load(config_path: Option<&Path>, max_buffer_length: Option<usize>) -> Result<config::Config> {
    let mut config = config::load_config_or_default(config_path)?;
    if let Some(len) = max_buffer_length {
        config.reader.max_buffer_length = len;
        config::validate_config(&config)?;
    }
    Ok(config)
}

fn head(location: &str, bytes: usize, config: &config::Config) -> Result<()> {
    let mut reader = VideoReader::open(location, &config.reader_options())
        .with_context(|| format!("Failed to open {}", location))?;

    let data = reader.read(bytes)?;
    reader.close()?;

    for (i, line) in data.chunks(16).enumerate() {
        let hex: Vec<String> = line.iter().map(|b| format!("{:02x}", b)).collect();
        println!("{:08x}  {}", i * 16, hex.join(" "));
    }

    Ok(())
}

fn probe_location(
    location: &str,
    scan_limit: u64,
    json: bool,
    config: &config::Config,
) -> Result<()> {
    let options = ProbeOptions {
        reader: config.reader_options(),
        scan_limit,
    };

    tracing::info!("Probing {}", location);
    let report = probe::probe_location(location, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Location: {}", report.location);
    match report.total_size {
        Some(size) => println!("Size: {} bytes", size),
        None => println!("Size: unknown"),
    }
    println!("Extension: {}", report.extension.unwrap_or("none"));
    match report.container {
        Some(container) => println!("Container: {}", container),
        None => println!("Container: unknown"),
    }

    if let Some(ref mvhd) = report.movie_header {
        println!("\nMovie Header (version {})", mvhd.version);
        println!("  Timescale: {}", mvhd.timescale);
        match mvhd.duration_secs() {
            Some(secs) => println!("  Duration: {} ({:.3}s)", mvhd.duration, secs),
            None => println!("  Duration: {}", mvhd.duration),
        }
        println!("  Rate: {}", mvhd.rate);
        println!("  Volume: {}", mvhd.volume);
    }

    if report.buffer_overflowed {
        println!("\nNote: metadata pass exceeded the read buffer");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!("  Max buffer length: {}", config.reader.max_buffer_length);
    println!("  Remote timeout: {}s", config.remote.timeout_secs);
    if let Some(ref ua) = config.remote.user_agent {
        println!("  User-Agent: {}", ua);
    }

    Ok(())
}
