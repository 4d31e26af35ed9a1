//! Herald daemon - group-chat assistant core.
//!
//! Opens the knowledge store, reschedules pending reminders, and waits for
//! the dispatch layer. Without a chat transport attached, outbound
//! notifications go to the log.

use anyhow::Result;
use herald_common::{HeraldConfig, KnowledgeStore};
use heraldd::nlp::{EntityRecognizer, HeuristicNlp, SentenceSegmenter};
use heraldd::notify::TracingNotifier;
use heraldd::Assistant;
use std::sync::Arc;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("heraldd v{} starting", env!("CARGO_PKG_VERSION"));

    let config = HeraldConfig::load()?;
    let db_path = config.storage.resolve_db_path();
    let store = Arc::new(KnowledgeStore::open(&db_path)?);
    info!("Knowledge store open at {}", db_path.display());

    let recognizer: Arc<dyn EntityRecognizer> = Arc::new(HeuristicNlp);
    let segmenter: Arc<dyn SentenceSegmenter> = Arc::new(HeuristicNlp);
    let assistant = Assistant::new(
        store,
        &config,
        recognizer,
        segmenter,
        Arc::new(TracingNotifier),
    );

    let rescheduled = assistant.rehydrate().await?;
    info!("heraldd ready ({rescheduled} pending reminder(s) rescheduled)");

    tokio::signal::ctrl_c().await?;
    info!("Shutting down gracefully");

    Ok(())
}
