use std::time::Duration;

use anyhow::Result;
use grantstore::PersistedGrantStore;
use grantstore_postgres::PostgresGrantStore;
use tracing::{error, info};

use crate::cli::{OutputFormat, RemoveAllArgs};
use crate::output::{print_grant, print_grants, print_success, print_warning};

pub async fn get(store: &PostgresGrantStore, key: &str, format: OutputFormat) -> Result<()> {
    match store.get(key).await? {
        Some(grant) => print_grant(&grant, format)?,
        None => print_warning(&format!("No grant with key {key}")),
    }
    Ok(())
}

pub async fn list(store: &PostgresGrantStore, subject: &str, format: OutputFormat) -> Result<()> {
    let grants = store.get_all(subject).await?;
    print_grants(&grants, format)
}

pub async fn remove(store: &PostgresGrantStore, key: &str) -> Result<()> {
    store.remove(key).await?;
    print_success(&format!("Removed grant {key}"));
    Ok(())
}

pub async fn remove_all(store: &PostgresGrantStore, args: &RemoveAllArgs) -> Result<()> {
    let removed = match &args.grant_type {
        Some(grant_type) => {
            store
                .remove_all_of_type(&args.subject, &args.client, grant_type)
                .await?
        }
        None => store.remove_all(&args.subject, &args.client).await?,
    };
    print_success(&format!(
        "Removed {removed} grant(s) of {} for {}",
        args.subject, args.client
    ));
    Ok(())
}

pub async fn purge_expired(store: &PostgresGrantStore, every: Option<u64>) -> Result<()> {
    let Some(seconds) = every else {
        let removed = store.remove_all_expired().await?;
        print_success(&format!("Removed {removed} expired grant(s)"));
        return Ok(());
    };

    info!(interval_secs = seconds, "Purging expired grants until interrupted");
    let mut ticker = tokio::time::interval(Duration::from_secs(seconds));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping expired grant purge");
                return Ok(());
            }
            _ = ticker.tick() => {
                // A failed sweep is retried on the next tick
                match store.remove_all_expired().await {
                    Ok(removed) => info!(removed, "Purged expired grants"),
                    Err(e) => error!(error = %e, "Failed to purge expired grants"),
                }
            }
        }
    }
}

pub async fn init_schema(store: &PostgresGrantStore) -> Result<()> {
    store.collection().ensure_schema().await?;
    print_success("Grant collection schema ready");
    Ok(())
}
