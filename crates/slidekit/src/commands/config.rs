use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;
use crate::store::FileStore;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    println!("{} {}", "Config file:".bold(), path.display());
    match FileStore::default_path() {
        Ok(store) => println!("{} {}", "Preferences:".bold(), store.display()),
        Err(e) => println!("{} {}", "Preferences:".bold(), e.to_string().yellow()),
    }
    println!();

    let config = if path.exists() {
        Config::load_from(&path)?
    } else {
        println!("{}", "No config file yet, showing defaults.".dimmed());
        Config::default()
    };

    println!("{}", "defaults:".bold().cyan());
    let theme = config
        .theme()
        .map(|t| t.to_string())
        .unwrap_or_else(|| "light (or the deck's theme)".to_string());
    println!("  theme:          {theme}");
    println!("  start_mode:     {}", config.start_mode());
    match config.autoplay() {
        Some(interval) => println!("  autoplay:       {}s", interval.as_secs()),
        None => println!("  autoplay:       {}", "off".dimmed()),
    }
    println!("  reduced_motion: {}", config.reduced_motion());
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {} = {} ({})",
        "Saved".green().bold(),
        key,
        value.bold(),
        path.display()
    );
    Ok(())
}
