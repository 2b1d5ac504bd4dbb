//! waymark: command-line interface for the warp store.
//!
//! # Usage
//!
//! ```bash
//! waymark --data-dir ./data add spawn 120 -48 --world overworld
//! waymark list --world overworld
//! ```
//!
//! Environment variables can also be used:
//! - `WAYMARK_DATA_DIR`: Data directory for SQLite
//! - `WAYMARK_WORLD`: Default world for world-scoped commands
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use waymark::config::Config;
use waymark::manager::WarpManager;
use waymark::observability::tracing::init_tracing;
use waymark::storage::schema::ensure_schema;
use waymark::storage::sqlite::SqliteBackend;
use waymark::storage::{Backend, WarpStore};
use waymark::warp::Warp;

/// Command-line interface for the Waymark warp store.
#[derive(Parser)]
#[command(name = "waymark")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    config: Config,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Verify the warps schema exists and exit
    Init,
    /// Create a warp
    Add {
        /// Warp name
        name: String,
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
        /// World the warp belongs to
        #[arg(short, long, env = "WAYMARK_WORLD")]
        world: String,
    },
    /// Delete a warp
    Remove {
        /// Warp name
        name: String,
        #[arg(short, long, env = "WAYMARK_WORLD")]
        world: String,
    },
    /// Show a warp
    Find {
        /// Warp name
        name: String,
        #[arg(short, long, env = "WAYMARK_WORLD")]
        world: String,
    },
    /// List public warps in a world
    List {
        #[arg(short, long, env = "WAYMARK_WORLD")]
        world: String,
    },
    /// Move a warp
    Move {
        /// Warp name
        name: String,
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
        #[arg(short, long, env = "WAYMARK_WORLD")]
        world: String,
    },
    /// Hide a warp from public listings (or reveal it again)
    Hide {
        /// Warp name
        name: String,
        /// Make the warp public again
        #[arg(long)]
        reveal: bool,
        #[arg(short, long, env = "WAYMARK_WORLD")]
        world: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.config.log_level);

    // Ensure data directory exists
    fs::create_dir_all(&cli.config.data_dir).context("failed to create data directory")?;

    let backend = open_backend(&cli.config)?;

    // Schema failure is fatal: nothing works without the backing table
    ensure_schema(backend.as_ref()).context("failed to initialize warps schema")?;

    let manager = WarpManager::new(WarpStore::new(backend));

    match cli.command {
        Commands::Init => {
            println!("Schema verified.");
        }
        Commands::Add { name, x, y, world } => {
            manager.add_warp(x, y, &name, &world)?;
            report(cli.output, "added", &name, &world);
        }
        Commands::Remove { name, world } => {
            manager.remove_warp(&name, &world)?;
            report(cli.output, "removed", &name, &world);
        }
        Commands::Find { name, world } => {
            print_warp(cli.output, &name, &world, manager.find_warp(&name, &world)?);
        }
        Commands::List { world } => {
            print_listing(cli.output, &world, manager.list_public_warps(&world)?);
        }
        Commands::Move { name, x, y, world } => {
            manager.position_warp(&name, &world, x, y)?;
            report(cli.output, "moved", &name, &world);
        }
        Commands::Hide {
            name,
            reveal,
            world,
        } => {
            manager.hide_warp(&name, &world, !reveal)?;
            report(cli.output, if reveal { "revealed" } else { "hidden" }, &name, &world);
        }
    }

    Ok(())
}

fn open_backend(config: &Config) -> Result<Arc<dyn Backend>> {
    #[cfg(feature = "postgres")]
    if let Some(url) = &config.postgres_url {
        let backend = waymark::storage::postgres::PostgresBackend::connect(url, config.pool_size)
            .context("failed to connect to PostgreSQL")?;
        return Ok(Arc::new(backend));
    }

    let backend = SqliteBackend::open(config.db_path(), config.pool_size)
        .context("failed to open SQLite database")?;
    Ok(Arc::new(backend))
}

#[derive(Serialize)]
struct OpOutput<'a> {
    status: &'a str,
    name: &'a str,
    world_id: &'a str,
}

fn report(format: OutputFormat, status: &str, name: &str, world_id: &str) {
    match format {
        OutputFormat::Text => println!("Warp {name:?} {status} in world {world_id:?}."),
        OutputFormat::Json => {
            let out = OpOutput {
                status,
                name,
                world_id,
            };
            println!("{}", serde_json::to_string(&out).expect("serializable output"));
        }
    }
}

fn print_warp(format: OutputFormat, name: &str, world_id: &str, warp: Option<Warp>) {
    match format {
        OutputFormat::Text => match warp {
            Some(w) => {
                let visibility = if w.hidden { "hidden" } else { "public" };
                println!("{} ({}, {}) [{}]", w.name, w.x, w.y, visibility);
            }
            None => println!("No warp named {name:?} in world {world_id:?}."),
        },
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&warp).expect("serializable output"));
        }
    }
}

#[derive(Serialize)]
struct ListOutput<'a> {
    world_id: &'a str,
    warps: Vec<String>,
    total: usize,
}

fn print_listing(format: OutputFormat, world_id: &str, names: Vec<String>) {
    match format {
        OutputFormat::Text => {
            if names.is_empty() {
                println!("No public warps in world {world_id:?}.");
            } else {
                for name in &names {
                    println!("{name}");
                }
                println!();
                println!("Total: {} warp(s)", names.len());
            }
        }
        OutputFormat::Json => {
            let out = ListOutput {
                world_id,
                total: names.len(),
                warps: names,
            };
            println!("{}", serde_json::to_string_pretty(&out).expect("serializable output"));
        }
    }
}
