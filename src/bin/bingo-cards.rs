//! Offline bingo sheet generator.
//!
//! Writes `count` freshly shuffled cards into one printable HTML file and
//! optionally screenshots the last card.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::seq::SliceRandom;

use bingo_bot::cards::{BingoCard, DEFAULT_FREE_SPACE, card_document, sheet_document, terms};
use bingo_bot::config::RenderConfig;
use bingo_bot::render::{CardRenderer, ChromeRenderer};

#[derive(Parser)]
#[command(name = "bingo-cards", version, about = "Generate printable bingo cards")]
struct Cli {
    /// File with one term per line.
    terms: PathBuf,

    /// Output HTML file.
    output: PathBuf,

    /// Number of cards to generate.
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    count: u32,

    /// Label of the center cell.
    #[arg(long, default_value = DEFAULT_FREE_SPACE)]
    free_space: String,

    /// Also screenshot the last card to this PNG file.
    #[arg(long)]
    png: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut pool = terms::read_file(&cli.terms)?;
    let mut rng = rand::thread_rng();

    // Shuffle the whole pool per card so every card draws from all terms.
    let mut cards = Vec::with_capacity(cli.count as usize);
    for _ in 0..cli.count {
        pool.shuffle(&mut rng);
        cards.push(BingoCard::generate(&pool, &cli.free_space, &mut rng)?);
    }

    let html = sheet_document(&cards);
    std::fs::write(&cli.output, &html)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    tracing::info!(count = cards.len(), path = %cli.output.display(), "Wrote bingo sheet");

    if let (Some(png_path), Some(last)) = (cli.png, cards.last()) {
        let renderer = ChromeRenderer::new(RenderConfig::from_env()?);
        let png = renderer.render_png(&card_document(last)).await?;
        std::fs::write(&png_path, png)
            .with_context(|| format!("writing {}", png_path.display()))?;
        tracing::info!(path = %png_path.display(), "Wrote card screenshot");
    }

    Ok(())
}
