//! `parkinglot config` — Configuration management commands.

use parkinglot_config::AppConfig;

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            if config.store.backend == "memory" {
                println!("   ⚠️  memory store: lot state is lost when the process exits");
            }

            println!();
            println!("   Store:     {}", config.store.backend);
            println!("   Location:  {}", config.store_location());
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    println!("{}", render_effective(&config)?);
    Ok(())
}

/// The effective config as TOML, headed by where the lot is actually kept.
fn render_effective(config: &AppConfig) -> Result<String, toml::ser::Error> {
    let location = match config.store.backend.as_str() {
        "memory" => "in memory (not persisted)".to_string(),
        _ => config.store_location(),
    };
    Ok(format!(
        "# store: {} at {location}\n{}",
        config.store.backend,
        toml::to_string_pretty(config)?
    ))
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkinglot_config::StoreConfig;

    #[test]
    fn effective_config_names_store_location() {
        let config = AppConfig {
            store: StoreConfig {
                backend: "file".into(),
                path: "/data/lot.json".into(),
            },
        };
        let out = render_effective(&config).unwrap();
        assert!(out.starts_with("# store: file at /data/lot.json\n"));
        assert!(out.contains("[store]"));

        let memory = AppConfig {
            store: StoreConfig {
                backend: "memory".into(),
                path: String::new(),
            },
        };
        assert!(render_effective(&memory).unwrap().contains("not persisted"));
    }

    #[test]
    fn config_path_is_valid() {
        let path = parkinglot_config::AppConfig::config_dir().join("config.toml");
        assert!(path.to_str().unwrap().contains("config.toml"));
    }
}
