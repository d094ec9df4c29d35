use std::sync::Arc;

use bingo_bot::config::BotConfig;
use bingo_bot::pipeline::MessageProcessor;
use bingo_bot::routes::bot_routes;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = BotConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export API_KEY=... BOT_ID=...");
        std::process::exit(1);
    });

    eprintln!("🎲 Bingo Bot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Call phrase: {}", config.triggers.call_phrase);
    eprintln!(
        "   Link: user {} on {} ({})",
        config.triggers.link_user_id, config.triggers.link_weekday, config.triggers.timezone
    );
    match &config.triggers.keeper_call_phrase {
        Some(phrase) => eprintln!("   Keepers: {phrase}"),
        None => eprintln!("   Keepers: disabled"),
    }
    eprintln!("   Browser: {}", config.render.chrome_bin.display());

    let processor = Arc::new(MessageProcessor::from_config(&config)?);
    let app = bot_routes(processor);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "Bingo bot listening");
    axum::serve(listener, app).await?;

    Ok(())
}
