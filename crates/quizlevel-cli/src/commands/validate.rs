//! The `quizlevel validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = quizlevel_core::config::load_config_from(config_path.as_deref())?;
    config.validate().context("level configuration is not usable")?;

    println!(
        "Levels: {} (window {}, pass with more than {} correct)",
        config.level_ranges.len(),
        config.window_size,
        config.pass_threshold
    );
    for (level, band) in config.level_ranges.iter() {
        let questions: Vec<String> = band.iter().map(u32::to_string).collect();
        println!("  Level {level}: {} question(s) [{}]", band.len(), questions.join(", "));
    }

    let warnings = quizlevel_core::config::validate_config(&config);
    for w in &warnings {
        let prefix = w
            .level
            .map(|level| format!("  [level {level}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Level configuration valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
