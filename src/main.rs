//! Pasag Family Tree CLI
//!
//! Command-line helper around the page pipeline:
//! - Inspect the family dataset (stats, member files)
//! - Print contact templates
//! - Render the synchronised page without a browser
//! - Generate a default config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pasag_tree::config::{generate_default_config, Config, LoggingConfig};
use pasag_tree::content::{ContactAction, ContactMessage};
use pasag_tree::dataset::{
    self, current_year, display_name, normalize_name, DatasetSnapshot, NativeSource,
};
use pasag_tree::session::{LoadOutcome, PageSession};
use pasag_tree::view::MemoryDocument;

#[derive(Parser)]
#[command(name = "pasag-tree")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pasag family tree site tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: user config dir, then ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Dataset path or URL, overriding the config
    #[arg(short, long, global = true)]
    pub dataset: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the dataset and show derived stats
    Stats {
        /// Count new members against this year (default: current year)
        #[arg(long)]
        year: Option<i32>,
    },

    /// List member documents
    Members,

    /// Print a contact email template
    Contact {
        /// Action (suggest, add, remove)
        action: String,
    },

    /// Run the page pipeline and print the synchronised page as HTML
    Render {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let lookup = Config::resolve(cli.config.as_deref())?;
    init_logging(&lookup.config.logging);
    lookup.log();

    let mut config = lookup.config;
    if let Some(dataset) = cli.dataset {
        config.site.settings.dataset = dataset;
    }

    let json = cli.format.eq_ignore_ascii_case("json");
    let source = NativeSource::new(".");

    match cli.command {
        Commands::Stats { year } => {
            let snapshot = load_snapshot(&config, &source, year).await?;
            let stats = snapshot.stats;

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Family Members:             {}", stats.total_members);
                println!("Generations:                {}", stats.generations);
                println!("New Members This Year ({}): {}", snapshot.year, stats.new_members);
                println!("Member documents:           {}", snapshot.member_files.len());
            }
        }

        Commands::Members => {
            let snapshot = load_snapshot(&config, &source, None).await?;

            if json {
                let members: Vec<_> = snapshot
                    .member_files
                    .iter()
                    .map(|file| {
                        serde_json::json!({
                            "file": file,
                            "name": display_name(file),
                            "key": normalize_name(&display_name(file)),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&members)?);
            } else {
                println!("{:<32} {:<32} FILE", "NAME", "KEY");
                println!("{}", "-".repeat(90));
                for file in &snapshot.member_files {
                    let name = display_name(file);
                    println!("{:<32} {:<32} {}", name, normalize_name(&name), file);
                }
                println!("\n{} member documents", snapshot.member_files.len());
            }
        }

        Commands::Contact { action } => {
            let action: ContactAction = action.parse().map_err(anyhow::Error::msg)?;
            let message = ContactMessage::for_action(Some(action));

            if json {
                println!("{}", serde_json::to_string_pretty(&message)?);
            } else {
                for line in message.header.iter().chain(&message.body) {
                    println!("{}", line);
                }
            }
        }

        Commands::Render { output } => {
            let content = config.site_content()?;
            let session = PageSession::new(content, config.site.settings.clone());
            let mut page = MemoryDocument::page();

            session.render_static(&mut page);
            if let LoadOutcome::Failed(e) = session.start(&source, &mut page).await {
                eprintln!("Warning: dataset not loaded ({}), rendering without it", e);
            }

            let html = page.render_html();
            match output {
                Some(path) => {
                    std::fs::write(&path, &html)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Page written to {:?}", path);
                }
                None => println!("{}", html),
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("pasag_tree={}", logging.level).into());
    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn load_snapshot(
    config: &Config,
    source: &NativeSource,
    year: Option<i32>,
) -> anyhow::Result<DatasetSnapshot> {
    let settings = &config.site.settings;
    let entries = dataset::load(source, &settings.dataset)
        .await
        .with_context(|| format!("Failed to load dataset {}", settings.dataset))?;

    let year = year.unwrap_or_else(current_year);
    Ok(DatasetSnapshot::new(entries, settings.generations, year))
}
