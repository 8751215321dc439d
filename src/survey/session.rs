// The interactive survey session: terminal prompts driving the wizard.

use std::collections::BTreeMap;

use dialoguer::{Confirm, Input, Select};
use log::warn;
use snafu::prelude::*;

use survey_wizard::{Catalog, SurveyStep, WizardState, SCORE_MAX, SCORE_MIN};

use crate::survey::store::ResponseStore;
use crate::survey::{recorder, PromptSnafu, SurveyResult, WizardSnafu};

/// Runs survey sessions until the respondent declines to start over.
pub fn run_survey(store: &dyn ResponseStore, catalog: Catalog) -> SurveyResult<()> {
    let mut wizard = WizardState::new(catalog);
    loop {
        run_session(&mut wizard, store)?;
        let again = Confirm::new()
            .with_prompt("Start over with a new response?")
            .default(false)
            .interact()
            .context(PromptSnafu {})?;
        if !again {
            break;
        }
        wizard.reset();
    }
    Ok(())
}

fn run_session(wizard: &mut WizardState, store: &dyn ResponseStore) -> SurveyResult<()> {
    while !wizard.is_complete() {
        println!(
            "\n[Step {} of {}]",
            wizard.step_number(),
            WizardState::total_steps()
        );
        match wizard.step() {
            SurveyStep::UserInfo => collect_user_info(wizard)?,
            SurveyStep::SelectAttribute { slot } => select_attribute(wizard, slot)?,
            SurveyStep::ScoreAttributes { slot } => score_attributes(wizard, slot)?,
            SurveyStep::Complete => {}
        }
    }
    match recorder::finalize(wizard) {
        Ok(response) => recorder::record(store, &response),
        Err(e) => warn!("could not assemble the response record: {}", e),
    }
    println!("\nThank you! Your responses have been recorded.");
    Ok(())
}

fn collect_user_info(wizard: &mut WizardState) -> SurveyResult<()> {
    println!("Tell us about yourself.");
    let required = |input: &String| {
        if input.trim().is_empty() {
            Err("this field is required")
        } else {
            Ok(())
        }
    };
    let name: String = Input::new()
        .with_prompt("Your name")
        .validate_with(required)
        .interact_text()
        .context(PromptSnafu {})?;
    let email: String = Input::new()
        .with_prompt("Your email")
        .validate_with(required)
        .interact_text()
        .context(PromptSnafu {})?;
    wizard.submit_user_info(&name, &email).context(WizardSnafu {})
}

fn select_attribute(wizard: &mut WizardState, slot: usize) -> SurveyResult<()> {
    println!("Pick your {} main attribute.", ordinal(slot));
    let names: Vec<&str> = wizard
        .remaining_attributes()
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    let idx = Select::new()
        .with_prompt("Attribute")
        .items(&names)
        .default(0)
        .interact()
        .context(PromptSnafu {})?;
    let id = wizard.remaining_attributes()[idx].id.clone();
    wizard.select_main_attribute(&id).context(WizardSnafu {})
}

fn score_attributes(wizard: &mut WizardState, slot: usize) -> SurveyResult<()> {
    let attribute = match wizard.scoring_attribute() {
        Some(a) => a.clone(),
        None => whatever!("no attribute is being scored"),
    };
    println!(
        "Score your {} selection from {} (lowest) to {} (highest).",
        ordinal(slot),
        SCORE_MIN,
        SCORE_MAX
    );
    let mut names: Vec<String> = vec![attribute.name.clone()];
    names.extend(attribute.related_attributes.iter().cloned());

    let mut scores: BTreeMap<String, u8> = BTreeMap::new();
    for name in names {
        let label = if name == attribute.name {
            format!("{} (main)", name)
        } else {
            name.clone()
        };
        let score: u8 = Input::new()
            .with_prompt(label)
            .validate_with(|score: &u8| {
                if (SCORE_MIN..=SCORE_MAX).contains(score) {
                    Ok(())
                } else {
                    Err("the score must be between 1 and 5")
                }
            })
            .interact_text()
            .context(PromptSnafu {})?;
        scores.insert(name, score);
    }
    wizard.submit_scores(&scores).context(WizardSnafu {})
}

fn ordinal(slot: usize) -> &'static str {
    match slot {
        1 => "first",
        2 => "second",
        3 => "third",
        _ => "next",
    }
}
