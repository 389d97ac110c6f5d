//! `fstore config`: print the effective storage configuration.

use anyhow::Result;
use console::style;

use crate::state::AppState;

pub fn show(state: &AppState, json: bool) -> Result<()> {
    let config = &state.config;

    if json {
        let result = serde_json::json!({
            "data_dir": state.data_dir.display().to_string(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let storages: Vec<&str> = config.storages.iter().map(|s| s.as_str()).collect();
    let prefix_match = serde_json::to_value(config.prefix_match)?;

    println!();
    println!(
        "  {} {}",
        style("Data dir:").bold(),
        style(state.data_dir.display()).cyan()
    );
    println!("  {:<18} {}", "max_path_length", config.max_path_length);
    println!("  {:<18} {}", "default_page_size", config.default_page_size);
    println!("  {:<18} {}", "max_page_size", config.max_page_size);
    println!(
        "  {:<18} {}",
        "prefix_match",
        prefix_match.as_str().unwrap_or_default()
    );
    println!("  {:<18} {}", "storages", storages.join(", "));
    println!();

    Ok(())
}
