//! `parkinglot history` — past and present visits of one vehicle.
//!
//! Only the SQLite store keeps departed vehicles.

use parkinglot_config::AppConfig;
use parkinglot_store::{sqlite_url, SqliteStore};

pub async fn run(registration_number: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if config.store.backend != "sqlite" {
        return Err(format!(
            "history needs the sqlite store (configured: {})",
            config.store.backend
        )
        .into());
    }

    let store = SqliteStore::new(&sqlite_url(&config.store_location())).await?;
    let visits = store.history(registration_number).await?;

    if visits.is_empty() {
        println!("No visits recorded for {registration_number}");
        return Ok(());
    }

    println!("Visits for {registration_number} (newest first):");
    for visit in &visits {
        let left = visit
            .left_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "still parked".into());
        println!(
            "  slot {:>4}  {:<10}  {}  ->  {}",
            visit.record.slot_id,
            visit.record.colour,
            visit.parked_at.format("%Y-%m-%d %H:%M:%S"),
            left
        );
    }

    Ok(())
}
