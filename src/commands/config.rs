use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use recurrence_core::config::RecurrenceConfig;

pub fn run(data_path: &Path, config: &RecurrenceConfig) -> Result<()> {
    let config_path = RecurrenceConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!("  Data file:  {}", data_path.display());
    println!();
    println!("{}", "Settings".bold());
    for line in config.to_toml()?.lines() {
        println!("  {}", line);
    }

    Ok(())
}
