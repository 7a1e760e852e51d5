//! Generate command implementation.
//!
//! Drives the full workflow without prompts: keyword, topic choice by index,
//! outline as proposed, every section, then the optional polish pass.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;
use wecreate_core::{export_article, Intent, StudioDriver, WorkflowStep};

use crate::render;
use crate::setup::GlobalOptions;

/// Execute the generate command.
pub async fn execute(
    global: &GlobalOptions,
    keyword: String,
    topic: usize,
    polish: bool,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let config = global.load_config()?;
    let mut driver = global.driver(&config)?;

    driver.dispatch(Intent::SubmitKeyword(keyword))?;
    driver.settle().await;
    fail_on_error(&driver)?;

    let topics = driver.workflow().brief().map(|b| b.topics.clone()).unwrap_or_default();
    if topic == 0 || topic > topics.len() {
        anyhow::bail!("Topic {} is out of range: {} idea(s) available", topic, topics.len());
    }
    let idea = topics[topic - 1].clone();
    info!(title = %idea.title, "Selected topic");

    driver.dispatch(Intent::SelectTopic(idea))?;
    driver.settle().await;
    fail_on_error(&driver)?;

    driver.dispatch(Intent::ConfirmOutline)?;
    driver.settle().await;

    let progress = driver.workflow().writing_progress();
    if progress.failed > 0 {
        eprintln!(
            "{} {} of {} section(s) failed to generate",
            "!".yellow(),
            progress.failed,
            progress.total
        );
    }
    if driver.workflow().images().is_empty() {
        eprintln!("{} No illustration was generated", "!".yellow());
    }

    if polish {
        driver.dispatch(Intent::RequestPolish)?;
        driver.settle().await;
        if let Some(failure) = driver.workflow().last_failure() {
            render::failure(failure);
        }
    }

    let view = driver.view();
    let article = export_article(&view).context("Article did not reach the finished step")?;

    if let Some(path) = &output {
        std::fs::write(path, &article)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("{} Saved article to {}", "✓".green(), path.display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else if output.is_none() {
        print!("{article}");
    }
    Ok(())
}

/// Fails when the last step did not advance because of a generation error.
fn fail_on_error(driver: &StudioDriver) -> Result<()> {
    let workflow = driver.workflow();
    match workflow.last_failure() {
        Some(failure) if workflow.step() != WorkflowStep::Done => anyhow::bail!("{failure}"),
        _ => Ok(()),
    }
}
