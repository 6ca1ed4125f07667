//! CLI demo for the todo application.
//!
//! Runs the full session loop against an in-memory remote store: bootstrap
//! load, a few mutations, filtering, and the resulting persisted payload.

use std::sync::Arc;
use todo_app::{AppAction, APP_ID, DATASET, Filter, bootstrap};
use todo_sync_storage::{MemoryRemoteStore, RemoteStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Todo Demo ===\n");

    let remote = Arc::new(MemoryRemoteStore::new());
    let store = bootstrap(Arc::clone(&remote) as Arc<dyn RemoteStore>).await?;

    println!("Adding items...");
    for name in ["buy milk", "write documentation", "deploy to production"] {
        store
            .send(AppAction::AddItem {
                name: name.to_string(),
            })
            .await?
            .wait()
            .await;
    }

    let state = store.state(Clone::clone).await;
    println!("\n{} item(s):", state.items.len());
    for item in &state.items {
        let status = if item.done { "x" } else { " " };
        println!("  [{}] {} (#{})", status, item.name, item.id);
    }

    println!("\nCompleting 'buy milk'...");
    let milk_id = state.items[0].id;
    store.send(AppAction::ToggleItem { id: milk_id }).await?.wait().await;

    store
        .send(AppAction::SetFilter {
            filter: Filter::Active,
        })
        .await?
        .wait()
        .await;

    let state = store.state(Clone::clone).await;
    println!("{} item(s) left:", state.remaining().len());
    for item in state.selected_items() {
        println!("  [ ] {}", item.name);
    }

    println!("\nToggling all...");
    store.send(AppAction::ToggleAll).await?.wait().await;

    let state = store.state(Clone::clone).await;
    println!(
        "all done: {}, remaining: {}",
        state.completed(),
        state.remaining().len()
    );

    let payload = remote.stored(APP_ID, DATASET).await;
    println!(
        "\nPersisted after {} save(s): {}",
        remote.save_count(),
        payload.map_or_else(|| "<nothing>".to_string(), |p| p.to_string()),
    );

    println!("\n=== Demo Complete ===");
    Ok(())
}
