//! The `quizlevel assess` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use quizlevel_core::assessor::{Assessment, LevelOutcome};
use quizlevel_core::service::LevelService;

pub async fn execute(
    history_path: PathBuf,
    user: String,
    config_path: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let config = quizlevel_core::config::load_config_from(config_path.as_deref())?;
    let store = quizlevel_core::history::load_history_file(&history_path)?;
    tracing::debug!("{} learner(s) in {}", store.learner_count(), history_path.display());

    let service = LevelService::new(Arc::new(store), config)
        .context("level configuration is not usable")?;
    let assessment = service.assess(&user).await?;

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&assessment)?);
        }
        _ => print_summary(&user, &assessment),
    }

    Ok(())
}

fn print_summary(user: &str, assessment: &Assessment) {
    use comfy_table::{Cell, Table};

    println!(
        "{user} is at level {} of {}",
        assessment.level, assessment.max_level
    );

    let mut table = Table::new();
    table.set_header(vec!["Level", "Outcome", "Correct", "Window"]);

    for outcome in &assessment.outcomes {
        let (label, correct, window) = match *outcome {
            LevelOutcome::Passed {
                correct, window, ..
            } => ("passed", correct.to_string(), window.to_string()),
            LevelOutcome::Failed {
                correct, window, ..
            } => ("failed", correct.to_string(), window.to_string()),
            LevelOutcome::Insufficient { seen, required, .. } => {
                ("not enough answers", "-".to_string(), format!("{seen}/{required}"))
            }
        };
        table.add_row(vec![
            Cell::new(outcome.level()),
            Cell::new(label),
            Cell::new(correct),
            Cell::new(window),
        ]);
    }

    println!("{table}");
}
