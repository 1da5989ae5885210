//! Show or create the configuration file.

use courtside_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, init: bool) -> anyhow::Result<()> {
    let path = config_file_path();

    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
        } else {
            let written = AppConfig::default().save()?;
            println!("Wrote default config to {}", written.display());
        }
        return Ok(());
    }

    let source = if path.exists() {
        path.display().to_string()
    } else {
        "built-in defaults".to_string()
    };
    println!("# {source}");
    println!("{}", serde_json::to_string_pretty(config)?);

    Ok(())
}
