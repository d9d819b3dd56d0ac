//! Raw key-value command handlers.

use anyhow::{Context, Result};
use evm_kv::{KvStore, RestKvClient};
use serde_json::Value;

pub async fn get(client: &RestKvClient, key: &str) -> Result<()> {
    let value = client
        .get(key)
        .await
        .with_context(|| format!("get '{key}'"))?
        .with_context(|| format!("No value stored for '{key}'"))?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

pub async fn set(client: &RestKvClient, key: &str, raw: &str) -> Result<()> {
    let value: Value = serde_json::from_str(raw).context("Value is not valid JSON")?;
    let ok = client
        .set(key, &value)
        .await
        .with_context(|| format!("set '{key}'"))?;
    if !ok {
        anyhow::bail!("The server rejected the write for '{key}'");
    }
    println!("Stored {key}");
    Ok(())
}

pub async fn delete(client: &RestKvClient, key: &str) -> Result<()> {
    let ok = client
        .delete(key)
        .await
        .with_context(|| format!("delete '{key}'"))?;
    if !ok {
        anyhow::bail!("The server rejected the delete for '{key}'");
    }
    println!("Deleted {key}");
    Ok(())
}

pub async fn list(client: &RestKvClient, prefix: &str) -> Result<()> {
    let records = client
        .get_with_prefix(prefix)
        .await
        .with_context(|| format!("list '{prefix}'"))?;
    if records.is_empty() {
        println!("No keys found.");
    } else {
        for record in records {
            println!("{}\t{}", record.key, record.value);
        }
    }
    Ok(())
}
