use anyhow::Result;
use std::process::Command;

use crate::config::Config;

use super::Context;

pub fn show_config(ctx: &Context) -> Result<()> {
    let mut shown = ctx.config.clone();
    if !shown.session.token.is_empty() {
        shown.session.token = "********".to_string();
    }
    let config_str = toml::to_string_pretty(&shown)?;

    println!("Current Configuration ({})", ctx.config.location()?.display());
    println!("────────────────────────────────");
    println!();
    println!("{}", config_str);

    Ok(())
}

pub fn edit_config(ctx: &Context) -> Result<()> {
    let config_file = ctx.config.location()?;

    if !config_file.exists() {
        ctx.config.save()?;
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());

    Command::new(editor).arg(&config_file).status()?;

    // Reject edits that no longer parse
    Config::load_from(Some(config_file.as_path()))?;
    println!("✓ Configuration saved!");

    Ok(())
}

pub fn init_config(ctx: &Context, force: bool) -> Result<()> {
    let config_file = ctx.config.location()?;

    if config_file.exists() && !force {
        println!(
            "Configuration file already exists at: {}",
            config_file.display()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let config = Config::default().at(config_file.clone());
    config.save()?;

    println!("✓ Configuration initialized at: {}", config_file.display());
    println!();
    println!("You can edit it with: athlete-results config edit");

    Ok(())
}
