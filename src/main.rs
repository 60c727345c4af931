//! Gridveil Demo Client
//!
//! Runs a full session against the in-memory ledger: initialize with a
//! proof, take a few moves, and let the explorer fill in the known
//! board, logging every confirmed commitment along the way.

use anyhow::Context;
use rand::rngs::OsRng;
use tokio::time::{interval, Duration};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use gridveil::{
    AccountId, Coordinate, GameClient, InMemoryLedger, MemoryStore, MoveDelta, PublicParams,
    EXPLORE_INTERVAL_SECS, VERSION,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Gridveil Client v{}", VERSION);

    // Toy parameters: a 22 x 18 torus behind a 437-element group. Real
    // deployments fetch production-sized parameters from the ledger.
    let params = PublicParams::from_u64(23, 19, 5, 7)?;
    let ledger = InMemoryLedger::new(params);
    let account = AccountId::new("demo-player");

    let mut client = GameClient::bootstrap(ledger, MemoryStore::new(), account)
        .await
        .context("session bootstrap failed")?;
    info!(
        "grid is {} x {}",
        client.params().grid_width(),
        client.params().grid_height()
    );

    // Bind the account to a starting position.
    let origin = Coordinate::from_u64(4, 2);
    let confirmed = client
        .submit_initialize(origin.clone(), &mut OsRng)
        .await
        .context("initialize failed")?;
    info!(%origin, %confirmed, "initialized");

    // Wander the torus. Only deltas reach the ledger.
    for delta in [
        MoveDelta::new(1, 1),
        MoveDelta::new(1, 1),
        MoveDelta::new(-1, -1),
        MoveDelta::new(2, 0),
    ] {
        let confirmed = client
            .submit_move(delta.clone())
            .await
            .context("move failed")?;
        let here = client
            .state()
            .confirmed
            .as_ref()
            .map(|c| c.coordinate.clone())
            .expect("confirmed after successful move");
        info!(dx = %delta.dx, dy = %delta.dy, %here, %confirmed, "moved");
    }

    // A few explorer ticks to grow the known board.
    let mut ticker = interval(Duration::from_secs(EXPLORE_INTERVAL_SECS));
    for _ in 0..3 {
        ticker.tick().await;
        let coordinate = client.explore_tick(&mut OsRng)?;
        info!(%coordinate, entries = client.board().len(), "explored");
    }

    info!(
        "session done: {} known board entries, phase {:?}",
        client.board().len(),
        client.state().phase
    );
    Ok(())
}
