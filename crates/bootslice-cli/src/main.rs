mod commands;

use bootslice_core::Engine;
use clap::{Parser, Subcommand};
use commands::{exit_code_for, EXIT_FAILURE};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(
    name = "bootslice",
    version,
    about = "Slice Spring Boot applications into image layers"
)]
struct Cli {
    /// Root of the unpacked application.
    #[arg(long, default_value = ".", global = true)]
    app: PathBuf,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check whether the application is a Spring Boot application.
    Detect,
    /// Partition the application into ordered slices.
    Slice,
    /// Fingerprint the library jars embedded in the application.
    Dependencies,
    /// Write layer metadata, launch processes, slices, and the build plan.
    Build {
        /// Directory that receives the layer output.
        #[arg(long)]
        layers: PathBuf,
    },
    /// Show application metadata and the launch classpath.
    Inspect,
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("BOOTSLICE_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    debug!("application root {}", cli.app.display());
    let engine = match Engine::new(&cli.app) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    let json_output = cli.json;

    let result = match cli.command {
        Commands::Detect => commands::detect::run(&engine, json_output),
        Commands::Slice => commands::slice::run(&engine, json_output),
        Commands::Dependencies => commands::dependencies::run(&engine, json_output),
        Commands::Build { layers } => commands::build::run(&engine, &layers, json_output),
        Commands::Inspect => commands::inspect::run(&engine, json_output),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(exit_code_for(&msg))
        }
    }
}
