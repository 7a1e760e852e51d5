//! Interactive article wizard.
//!
//! Each step renders the current snapshot, asks for the next user intent and
//! pumps the driver until the calls it started have come back.

use anyhow::{Context, Result};
use colored::Colorize;
use inquire::{InquireError, Select, Text};
use std::fmt;
use std::path::PathBuf;
use wecreate_core::{
    export_article, Intent, IntentError, SectionField, StudioDriver, WorkflowStep,
};

use crate::render;
use crate::setup::GlobalOptions;

/// Maps prompt cancellation (Esc / Ctrl-C) to `None`.
fn answer<T>(result: Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e).context("Failed to read user input"),
    }
}

/// Dispatches an intent, reporting rejections instead of failing.
fn dispatch(driver: &mut StudioDriver, intent: Intent) -> bool {
    match driver.dispatch(intent) {
        Ok(()) => true,
        Err(e) => {
            render::warning(&e.to_string());
            false
        }
    }
}

/// Waits for all in-flight calls, with a spinner.
async fn settle(driver: &mut StudioDriver, message: &str) -> Result<()> {
    let spinner = render::spinner(message)?;
    driver.settle().await;
    spinner.finish_and_clear();
    report_failure(driver);
    Ok(())
}

fn report_failure(driver: &StudioDriver) {
    if let Some(failure) = driver.workflow().last_failure() {
        render::failure(failure);
    }
}

/// Execute the studio wizard.
pub async fn execute(global: &GlobalOptions) -> Result<()> {
    let config = global.load_config()?;
    let client = global.client(&config)?;
    render::banner(client.endpoint());

    let settings = config.workflow_settings().context("Invalid finishing configuration")?;
    let mut driver = StudioDriver::new(client, settings);

    loop {
        let step = driver.workflow().step();
        render::step_header(step);

        let keep_going = match step {
            WorkflowStep::Topic => topic_step(&mut driver).await?,
            WorkflowStep::Outline => outline_step(&mut driver).await?,
            WorkflowStep::Writing => {
                writing_step(&mut driver).await;
                true
            }
            WorkflowStep::Done => done_step(&mut driver).await?,
        };
        if !keep_going {
            break;
        }
    }

    println!("{}", "Bye.".dimmed());
    Ok(())
}

async fn ask_keyword(driver: &mut StudioDriver) -> Result<bool> {
    let Some(keyword) = answer(Text::new("Topic or keyword:").prompt())? else {
        return Ok(false);
    };
    if dispatch(driver, Intent::SubmitKeyword(keyword)) {
        settle(driver, "Researching...").await?;
    }
    Ok(true)
}

enum TopicChoice {
    Idea(usize, String),
    NewKeyword,
    Quit,
}

impl fmt::Display for TopicChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idea(i, title) => write!(f, "{}. {}", i + 1, title),
            Self::NewKeyword => f.write_str("Search another keyword"),
            Self::Quit => f.write_str("Quit"),
        }
    }
}

async fn topic_step(driver: &mut StudioDriver) -> Result<bool> {
    let Some(brief) = driver.workflow().brief().cloned() else {
        return ask_keyword(driver).await;
    };
    render::brief(&brief);

    let mut choices: Vec<TopicChoice> = brief
        .topics
        .iter()
        .enumerate()
        .map(|(i, topic)| TopicChoice::Idea(i, topic.title.clone()))
        .collect();
    choices.push(TopicChoice::NewKeyword);
    choices.push(TopicChoice::Quit);

    match answer(Select::new("Pick a topic to write:", choices).prompt())? {
        Some(TopicChoice::Idea(i, _)) => {
            if dispatch(driver, Intent::SelectTopic(brief.topics[i].clone())) {
                settle(driver, "Building outline...").await?;
            }
            Ok(true)
        }
        Some(TopicChoice::NewKeyword) => ask_keyword(driver).await,
        Some(TopicChoice::Quit) | None => Ok(false),
    }
}

enum OutlineChoice {
    Write,
    Edit,
    StartOver,
    Quit,
}

impl fmt::Display for OutlineChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Write => "Start writing",
            Self::Edit => "Edit a section",
            Self::StartOver => "Start over",
            Self::Quit => "Quit",
        })
    }
}

async fn outline_step(driver: &mut StudioDriver) -> Result<bool> {
    if let Some(topic) = driver.workflow().selected_topic() {
        println!("{} {}", "Topic:".bold(), topic.title.cyan());
        println!();
    }
    render::outline(driver.workflow().outline());

    let choices =
        vec![OutlineChoice::Write, OutlineChoice::Edit, OutlineChoice::StartOver, OutlineChoice::Quit];
    match answer(Select::new("Outline ready:", choices).prompt())? {
        Some(OutlineChoice::Write) => {
            dispatch(driver, Intent::ConfirmOutline);
            Ok(true)
        }
        Some(OutlineChoice::Edit) => {
            edit_section(driver)?;
            Ok(true)
        }
        Some(OutlineChoice::StartOver) => {
            dispatch(driver, Intent::StartOver);
            Ok(true)
        }
        Some(OutlineChoice::Quit) | None => Ok(false),
    }
}

fn edit_section(driver: &mut StudioDriver) -> Result<()> {
    let titles: Vec<String> = driver
        .workflow()
        .outline()
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}", i + 1, s.title))
        .collect();
    let Some(picked) = answer(Select::new("Which section?", titles).raw_prompt())? else {
        return Ok(());
    };
    let index = picked.index;

    let Some(field) = answer(Select::new("Edit:", vec!["Title", "Description"]).prompt())? else {
        return Ok(());
    };
    let (field, current) = {
        let section = &driver.workflow().outline()[index];
        if field == "Title" {
            (SectionField::Title, section.title.clone())
        } else {
            (SectionField::Description, section.description.clone())
        }
    };

    if let Some(value) = answer(Text::new("New value:").with_initial_value(&current).prompt())? {
        dispatch(driver, Intent::EditSection { index, field, value });
    }
    Ok(())
}

async fn writing_step(driver: &mut StudioDriver) {
    let total = driver.workflow().outline().len();
    let mut shown = 0;

    println!("{}", "Writing...".bold());
    while driver.workflow().step() == WorkflowStep::Writing {
        if !driver.next().await {
            break;
        }
        let sections = driver.workflow().draft().sections();
        while shown < sections.len() && !sections[shown].body.is_pending() {
            render::section_done(shown, total, &sections[shown]);
            shown += 1;
        }
    }
}

enum DoneChoice {
    Preview,
    Polish(String),
    Image,
    Export,
    StartOver,
    Quit,
}

impl fmt::Display for DoneChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preview => f.write_str("Show preview"),
            Self::Polish(style) => write!(f, "Polish ({style})"),
            Self::Image => f.write_str("Regenerate illustration"),
            Self::Export => f.write_str("Export article"),
            Self::StartOver => f.write_str("Start over"),
            Self::Quit => f.write_str("Quit"),
        }
    }
}

async fn done_step(driver: &mut StudioDriver) -> Result<bool> {
    driver.drain_ready();
    report_failure(driver);
    render::preview(&driver.view());

    let choices = vec![
        DoneChoice::Preview,
        DoneChoice::Polish(driver.workflow().settings().polish_style.clone()),
        DoneChoice::Image,
        DoneChoice::Export,
        DoneChoice::StartOver,
        DoneChoice::Quit,
    ];
    let Some(choice) = answer(Select::new("Article finished:", choices).prompt())? else {
        return Ok(false);
    };
    driver.drain_ready();

    match choice {
        DoneChoice::Preview => {}
        DoneChoice::Polish(_) => {
            if dispatch(driver, Intent::RequestPolish) {
                let spinner = render::spinner("Polishing...")?;
                driver.run_until(|wf| !wf.busy().polish).await;
                spinner.finish_and_clear();
            }
        }
        DoneChoice::Image => match driver.dispatch(Intent::RequestImage) {
            Ok(()) | Err(IntentError::Busy(_)) => {
                let spinner = render::spinner("Illustrating...")?;
                driver.run_until(|wf| !wf.busy().image).await;
                spinner.finish_and_clear();
            }
            Err(e) => render::warning(&e.to_string()),
        },
        DoneChoice::Export => export(driver)?,
        DoneChoice::StartOver => {
            dispatch(driver, Intent::StartOver);
        }
        DoneChoice::Quit => return Ok(false),
    }
    Ok(true)
}

fn export(driver: &StudioDriver) -> Result<()> {
    let Some(article) = export_article(&driver.view()) else {
        render::warning("Nothing to export yet");
        return Ok(());
    };
    let Some(path) = answer(Text::new("Save to:").with_default("article.md").prompt())? else {
        return Ok(());
    };

    let path = PathBuf::from(path);
    std::fs::write(&path, article).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} Saved article to {}", "✓".green(), path.display());
    Ok(())
}
