//! `parkinglot status` — Show configuration and stored lot occupancy.

use parkinglot_config::AppConfig;
use parkinglot_core::store::LotStore;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("Parking Lot Status");
    println!("==================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Store:        {}", config.store.backend);
    if config.store.backend != "memory" {
        println!("  Location:     {}", config.store_location());
    }

    let store = parkinglot_store::open_from_config(&config).await?;
    match store.load().await? {
        Some(snapshot) => {
            let occupied = snapshot.records.iter().filter(|r| r.active).count();
            println!("  Capacity:     {}", snapshot.capacity);
            println!("  Occupied:     {occupied}");
            println!(
                "  Free:         {}",
                (snapshot.capacity as usize).saturating_sub(occupied)
            );
        }
        None => println!("  Lot:          not created yet"),
    }

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `parkinglot onboard` to create one");
    }

    Ok(())
}
