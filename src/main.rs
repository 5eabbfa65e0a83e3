use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use swipedeck::speech::Speaker;
use swipedeck::{App, Config, ContentPool, DeckBuilder, Filter};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "swipedeck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON content file to build decks from instead of the built-in set
    #[arg(long, global = true)]
    content: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start straight into a practice session
    Practice {
        /// all, consonants, vowels or words
        #[arg(short, long)]
        filter: Option<Filter>,
    },
    /// Print a freshly shuffled deck
    List {
        /// all, consonants, vowels or words
        #[arg(short, long)]
        filter: Option<Filter>,
    },
    /// Pronounce some text once and report how it went
    Say {
        text: String,
    },
}

/// Log to a file in the data directory; the TUI owns the terminal
fn init_logging() {
    let writer = Config::log_path()
        .and_then(|path| {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            Ok(BoxMakeWriter::new(Mutex::new(file)))
        })
        .unwrap_or_else(|_| BoxMakeWriter::new(std::io::sink));

    let filter = EnvFilter::try_from_env("SWIPEDECK_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| "swipedeck=info".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_ansi(false).with_writer(writer))
        .init();
}

fn load_pool(path: Option<&PathBuf>) -> Result<ContentPool> {
    match path {
        Some(path) => ContentPool::load(path)
            .with_context(|| format!("Failed to load content from {:?}", path)),
        None => Ok(ContentPool::builtin()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;
    let pool = load_pool(cli.content.as_ref())?;

    match cli.command {
        Some(Commands::List { filter }) => {
            let filter = filter.unwrap_or(config.default_filter);
            let deck = DeckBuilder::new(&pool).build_deck(filter);
            if deck.is_empty() {
                println!("No cards for filter '{}'", filter);
            }
            for (i, item) in deck.iter().enumerate() {
                println!(
                    "{:>3}. {:<10} {:<9} {} {}",
                    i + 1,
                    item.front,
                    item.category.label(),
                    item.back,
                    item.romanization
                );
            }
        }
        Some(Commands::Say { text }) => {
            let speaker = Speaker::from_config(&config.audio)?;
            let outcome = speaker.play(&text).await;
            println!("{:?}", outcome);
            if !outcome.is_success() {
                anyhow::bail!("could not pronounce '{}'", text);
            }
        }
        Some(Commands::Practice { filter }) => {
            let filter = filter.unwrap_or(config.default_filter);
            let mut app = App::new(config, pool)?;
            app.start_practice(filter);
            app.run().await?;
        }
        None => {
            // Launch TUI
            let mut app = App::new(config, pool)?;
            app.run().await?;
        }
    }

    Ok(())
}
