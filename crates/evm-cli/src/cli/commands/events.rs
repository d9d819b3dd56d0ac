//! Event command handlers.

use anyhow::{Context, Result};
use evm_core::EventBook;
use evm_core::events::is_valid_name;
use evm_kv::RestKvClient;

pub async fn list(client: RestKvClient) -> Result<()> {
    let events = EventBook::new(client).list().await.context("list events")?;
    if events.is_empty() {
        println!("No events found.");
    } else {
        for event in events {
            println!("{}  {}", event.id, event.name);
        }
    }
    Ok(())
}

pub async fn add(client: RestKvClient, name: &str) -> Result<()> {
    if !is_valid_name(name) {
        anyhow::bail!("Event name must not be blank");
    }
    let event = EventBook::new(client)
        .add(name)
        .await
        .context("add event")?
        .context("The server rejected the new event")?;
    println!("Added {}  {}", event.id, event.name);
    Ok(())
}

pub async fn rename(client: RestKvClient, id: &str, name: &str) -> Result<()> {
    if !is_valid_name(name) {
        anyhow::bail!("Event name must not be blank");
    }
    let ok = EventBook::new(client)
        .rename(id, name)
        .await
        .with_context(|| format!("rename event '{id}'"))?;
    if !ok {
        anyhow::bail!("The server rejected the rename of '{id}'");
    }
    println!("Renamed {id} → {name}");
    Ok(())
}

pub async fn delete(client: RestKvClient, id: &str) -> Result<()> {
    let ok = EventBook::new(client)
        .remove(id)
        .await
        .with_context(|| format!("delete event '{id}'"))?;
    if !ok {
        anyhow::bail!("The server rejected the delete of '{id}'");
    }
    println!("Deleted {id}");
    Ok(())
}
