//! buildconf CLI
//!
//! Entry point for the `buildconf` command-line tool.

use buildconf::config::{ConfigResolver, GlobSearcher, ResolveOptions, ResolvedConfig};
use buildconf::runtime::{EsbuildCompiler, NodeEngine};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "buildconf")]
#[command(about = "Resolve a project's build configuration", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and print the merged configuration
    Show {
        #[command(flatten)]
        resolve: ResolveArgs,
    },

    /// Resolve and print provenance for the configuration
    Verify {
        #[command(flatten)]
        resolve: ResolveArgs,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct ResolveArgs {
    /// Project root directory
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Explicit config file path (relative to the root)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Mode name selecting an override set
    #[arg(long, short = 'm', default_value = "")]
    mode: String,

    /// Module engine executable
    #[arg(long, env = "BUILDCONF_NODE", default_value = "node")]
    node_bin: String,

    /// Script compiler executable
    #[arg(long, env = "BUILDCONF_ESBUILD", default_value = "esbuild")]
    esbuild_bin: String,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Show { resolve } => run_show(resolve),
        Commands::Verify { resolve, json } => run_verify(resolve, json),
    }
}

/// Resolve the configuration, or log the failure and terminate
fn resolve_config(args: &ResolveArgs) -> ResolvedConfig {
    let mut resolver = ConfigResolver::new(
        GlobSearcher,
        EsbuildCompiler::new(args.esbuild_bin.clone()),
        NodeEngine::new(args.node_bin.clone()),
    );

    let options = ResolveOptions {
        root: args.root.clone(),
        config_path: args.config.clone(),
        mode: args.mode.clone(),
    };

    match resolver.resolve(&options) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            if let Some(diagnostic) = e.diagnostic() {
                eprintln!("{}", diagnostic);
            }
            process::exit(1);
        }
    }
}

fn run_show(args: ResolveArgs) {
    let resolved = resolve_config(&args);

    match serde_json::to_string_pretty(&resolved.config) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn run_verify(args: ResolveArgs, json_output: bool) {
    let resolved = resolve_config(&args);

    if json_output {
        match serde_json::to_string_pretty(&resolved) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    match resolved.source {
        Some(ref source) => {
            println!("Configuration loaded: {}", source.path.display());
            println!();
            println!("  Format: {}", source.format);
            println!("  Digest: sha256:{}", source.digest);
        }
        None => {
            println!("No configuration file found; defaults in effect.");
            println!();
        }
    }

    if let Some(ref mode) = resolved.mode {
        println!("  Mode: {}", mode);
    }

    let plugin_count = resolved
        .config
        .get("plugins")
        .and_then(|p| p.as_array())
        .map(|p| p.len())
        .unwrap_or(0);
    println!("  Plugins: {}", plugin_count);
}
