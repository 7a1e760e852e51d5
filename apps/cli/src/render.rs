//! Terminal rendering for the wizard and commands.

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use wecreate_abstraction::{OutlineSection, TopicBrief};
use wecreate_core::{preview_markdown, DraftSection, Failure, SectionBody, WorkflowStep, WorkflowView};

/// Prints the welcome banner.
pub fn banner(endpoint: &str) {
    println!();
    println!("{}", "WeCreate Studio".bold().cyan());
    println!("{} {}", "Generator:".dimmed(), endpoint.dimmed());
    println!();
}

/// Prints the step indicator with the current step highlighted.
pub fn step_header(current: WorkflowStep) {
    let steps: Vec<String> = WorkflowStep::ALL
        .iter()
        .map(|step| {
            let label = step.as_str();
            if *step == current {
                label.bold().cyan().to_string()
            } else if step.position() < current.position() {
                label.green().to_string()
            } else {
                label.dimmed().to_string()
            }
        })
        .collect();
    let separator = " › ".dimmed().to_string();
    println!();
    println!("{}", steps.join(separator.as_str()));
    println!();
}

/// Prints the research summary, sources and topic ideas.
pub fn brief(brief: &TopicBrief) {
    println!("{}", "Intelligence Brief".bold());
    println!("{}", brief.summary);
    println!();

    if !brief.sources.is_empty() {
        println!("{}", "Sources".bold());
        for source in &brief.sources {
            println!("  • {} {}", source.title, source.url.dimmed());
        }
        println!();
    }

    println!("{}", "Topic ideas".bold());
    for (i, topic) in brief.topics.iter().enumerate() {
        println!("  {}. {} {}", i + 1, topic.title.cyan(), format!("[{}]", topic.angle).dimmed());
        println!("     {}", topic.rationale);
    }
    println!();
}

/// Prints the outline sections.
pub fn outline(sections: &[OutlineSection]) {
    println!("{}", "Outline".bold());
    for (i, section) in sections.iter().enumerate() {
        println!("  {}. {}", i + 1, section.title.cyan());
        println!("     {}", section.description);
        for point in &section.key_points {
            println!("       - {}", point.dimmed());
        }
    }
    println!();
}

/// Prints one line for a resolved section.
pub fn section_done(index: usize, total: usize, section: &DraftSection) {
    let counter = format!("[{}/{}]", index + 1, total).dimmed();
    match &section.body {
        SectionBody::Written(text) => {
            println!("  {} {} {} {}", "✓".green(), counter, section.title, format!("({} chars)", text.chars().count()).dimmed());
        }
        SectionBody::Failed(message) => {
            println!("  {} {} {} {}", "✗".red(), counter, section.title, message.red());
        }
        SectionBody::Pending => {}
    }
}

/// Prints a generation failure.
pub fn failure(failure: &Failure) {
    eprintln!("{} {}", "✗".red(), failure.to_string().red());
}

/// Prints a warning line.
pub fn warning(message: &str) {
    println!("{} {}", "!".yellow(), message.yellow());
}

/// Prints the preview markdown.
pub fn preview(view: &WorkflowView) {
    let rule = "─".repeat(60).dimmed();
    println!("{rule}");
    println!("{}", preview_markdown(view));
    println!("{rule}");
    if view.busy.image {
        println!("{}", "Illustration is still being generated...".dimmed());
    }
}

/// Starts a spinner with the given message.
pub fn spinner(message: impl Into<String>) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner().tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ").template("{spinner:.cyan} {msg}")?,
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}
