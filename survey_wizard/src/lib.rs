//! State machine for a short multi-step attribute survey.
//!
//! A session walks a respondent through eight steps: collecting a name and
//! an email address, then three rounds of picking a main attribute from the
//! remaining pool and scoring it together with its two related attributes,
//! and finally a terminal thank-you step.
//!
//! ```
//! use survey_wizard::{Catalog, WizardState};
//! # use survey_wizard::WizardError;
//!
//! let mut wizard = WizardState::new(Catalog::builtin());
//! wizard.submit_user_info("Ada", "ada@example.com")?;
//! let first = wizard.remaining_attributes()[0].clone();
//! wizard.select_main_attribute(&first.id)?;
//! # Ok::<(), WizardError>(())
//! ```

mod catalog;
mod config;

use log::{debug, info};

use std::collections::BTreeMap;

pub use crate::catalog::*;
pub use crate::config::*;

/// The steps of a survey session, in order.
///
/// `slot` is the 1-based index of the selection being worked on.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SurveyStep {
    UserInfo,
    SelectAttribute { slot: usize },
    ScoreAttributes { slot: usize },
    Complete,
}

/// The mutable state of one survey session.
///
/// All transitions either succeed and advance the step, or fail with a
/// [`WizardError`] and leave the state exactly as it was. The remaining
/// attribute pool shrinks by one per selection, so no attribute can be
/// picked twice within a session.
#[derive(Debug, Clone)]
pub struct WizardState {
    catalog: Catalog,
    step: SurveyStep,
    respondent_name: String,
    respondent_email: String,
    remaining: Vec<Attribute>,
    selections: Vec<Selection>,
}

impl WizardState {
    pub fn new(catalog: Catalog) -> WizardState {
        let remaining = catalog.attributes().to_vec();
        WizardState {
            catalog,
            step: SurveyStep::UserInfo,
            respondent_name: String::new(),
            respondent_email: String::new(),
            remaining,
            selections: Vec::new(),
        }
    }

    pub fn step(&self) -> SurveyStep {
        self.step
    }

    /// The 1-based number of the current step, for progress display.
    ///
    /// User info is step 1, selection k is step 2k, scoring k is step
    /// 2k + 1 and the thank-you step closes the sequence. The number is
    /// monotonic over the lifetime of a session (until a reset).
    pub fn step_number(&self) -> u32 {
        match self.step {
            SurveyStep::UserInfo => 1,
            SurveyStep::SelectAttribute { slot } => 2 * slot as u32,
            SurveyStep::ScoreAttributes { slot } => 2 * slot as u32 + 1,
            SurveyStep::Complete => Self::total_steps(),
        }
    }

    pub fn total_steps() -> u32 {
        2 + 2 * SELECTION_COUNT as u32
    }

    /// The attributes still available for selection, in catalog order.
    pub fn remaining_attributes(&self) -> &[Attribute] {
        &self.remaining
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn respondent_name(&self) -> &str {
        &self.respondent_name
    }

    pub fn respondent_email(&self) -> &str {
        &self.respondent_email
    }

    /// The catalog entry being scored, when the session is at a scoring step.
    pub fn scoring_attribute(&self) -> Option<&Attribute> {
        match self.step {
            SurveyStep::ScoreAttributes { slot } => {
                let main = &self.selections.get(slot - 1)?.main_attribute;
                self.catalog.attributes().iter().find(|a| &a.name == main)
            }
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.step == SurveyStep::Complete
    }

    /// Records the respondent's name and email and opens the first selection.
    ///
    /// Both fields are required; values are trimmed before being stored.
    pub fn submit_user_info(&mut self, name: &str, email: &str) -> Result<(), WizardError> {
        if self.step != SurveyStep::UserInfo {
            return Err(WizardError::ClosedStep {
                operation: "submit_user_info",
            });
        }
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(WizardError::MissingField("name"));
        }
        if email.is_empty() {
            return Err(WizardError::MissingField("email"));
        }
        self.respondent_name = name.to_string();
        self.respondent_email = email.to_string();
        self.step = SurveyStep::SelectAttribute { slot: 1 };
        info!("collected user info for {}", self.respondent_name);
        Ok(())
    }

    /// Picks a main attribute from the remaining pool and opens its scoring
    /// step. The attribute is removed from the pool.
    pub fn select_main_attribute(&mut self, attribute_id: &str) -> Result<(), WizardError> {
        let slot = match self.step {
            SurveyStep::SelectAttribute { slot } => slot,
            _ => {
                return Err(WizardError::ClosedStep {
                    operation: "select_main_attribute",
                });
            }
        };
        let idx = self
            .remaining
            .iter()
            .position(|a| a.id == attribute_id)
            .ok_or_else(|| WizardError::UnknownAttribute(attribute_id.to_string()))?;
        let attribute = self.remaining.remove(idx);
        debug!(
            "selection {}: picked {} ({} left in the pool)",
            slot,
            attribute.name,
            self.remaining.len()
        );
        self.selections.push(Selection {
            main_attribute: attribute.name,
            scores: BTreeMap::new(),
        });
        self.step = SurveyStep::ScoreAttributes { slot };
        Ok(())
    }

    /// Records the scores for the current selection and advances to the next
    /// selection, or to the terminal step after the last one.
    ///
    /// The keys of `scores` must be exactly the main attribute plus its two
    /// related attributes, each with a value in `SCORE_MIN..=SCORE_MAX`.
    pub fn submit_scores(&mut self, scores: &BTreeMap<String, u8>) -> Result<(), WizardError> {
        let slot = match self.step {
            SurveyStep::ScoreAttributes { slot } => slot,
            _ => {
                return Err(WizardError::ClosedStep {
                    operation: "submit_scores",
                });
            }
        };
        let attribute = self
            .scoring_attribute()
            .ok_or(WizardError::NotComplete)?
            .clone();
        let mut expected: Vec<&str> = vec![attribute.name.as_str()];
        expected.extend(attribute.related_attributes.iter().map(|s| s.as_str()));

        for name in scores.keys() {
            if !expected.contains(&name.as_str()) {
                return Err(WizardError::UnknownAttribute(name.clone()));
            }
        }
        let mut missing: Vec<String> = expected
            .iter()
            .filter(|name| !scores.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            missing.sort();
            return Err(WizardError::IncompleteScores(missing));
        }
        for (name, &score) in scores.iter() {
            if !(SCORE_MIN..=SCORE_MAX).contains(&score) {
                return Err(WizardError::ScoreOutOfRange {
                    attribute: name.clone(),
                    score,
                });
            }
        }

        self.selections[slot - 1].scores = scores.clone();
        debug!("selection {}: scores recorded for {}", slot, attribute.name);
        if slot < SELECTION_COUNT {
            self.step = SurveyStep::SelectAttribute { slot: slot + 1 };
        } else {
            self.step = SurveyStep::Complete;
            info!(
                "survey complete for {} ({} selections)",
                self.respondent_name,
                self.selections.len()
            );
        }
        Ok(())
    }

    /// The three fully scored selections. Only available once the session
    /// has reached the terminal step.
    pub fn completed_selections(&self) -> Result<&[Selection], WizardError> {
        if !self.is_complete() {
            return Err(WizardError::NotComplete);
        }
        Ok(&self.selections)
    }

    /// Clears everything back to the initial state. Callable from any step.
    pub fn reset(&mut self) {
        info!("survey reset");
        self.step = SurveyStep::UserInfo;
        self.respondent_name.clear();
        self.respondent_email.clear();
        self.remaining = self.catalog.attributes().to_vec();
        self.selections.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(name: &str, rel_a: &str, rel_b: &str) -> Attribute {
        Attribute {
            id: name.to_lowercase(),
            name: name.to_string(),
            related_attributes: [rel_a.to_string(), rel_b.to_string()],
        }
    }

    fn small_catalog() -> Catalog {
        Catalog::new(vec![
            attr("Innovation", "Creativity", "Problem Solving"),
            attr("Leadership", "Communication", "Empathy"),
            attr("Rigor", "Patience", "Focus"),
            attr("Curiosity", "Openness", "Drive"),
        ])
        .unwrap()
    }

    fn expected_scores(wizard: &WizardState) -> BTreeMap<String, u8> {
        let attribute = wizard.scoring_attribute().unwrap();
        let mut scores = BTreeMap::new();
        scores.insert(attribute.name.clone(), 5);
        scores.insert(attribute.related_attributes[0].clone(), 4);
        scores.insert(attribute.related_attributes[1].clone(), 3);
        scores
    }

    fn complete_survey(wizard: &mut WizardState) {
        wizard.submit_user_info("Ada", "ada@x.com").unwrap();
        for _ in 0..SELECTION_COUNT {
            let id = wizard.remaining_attributes()[0].id.clone();
            wizard.select_main_attribute(&id).unwrap();
            let scores = expected_scores(wizard);
            wizard.submit_scores(&scores).unwrap();
        }
    }

    #[test]
    fn full_run_selects_three_distinct_attributes() {
        let catalog = Catalog::builtin();
        let pool_size = catalog.len();
        let mut wizard = WizardState::new(catalog);
        complete_survey(&mut wizard);

        assert!(wizard.is_complete());
        assert_eq!(wizard.remaining_attributes().len(), pool_size - 3);
        let selections = wizard.completed_selections().unwrap();
        assert_eq!(selections.len(), 3);
        let mut mains: Vec<&str> = selections.iter().map(|s| s.main_attribute.as_str()).collect();
        mains.sort();
        mains.dedup();
        assert_eq!(mains.len(), 3);
        for selection in selections {
            assert!(!wizard
                .remaining_attributes()
                .iter()
                .any(|a| a.name == selection.main_attribute));
            assert_eq!(selection.scores.len(), 3);
        }
    }

    #[test]
    fn ada_example() {
        let mut wizard = WizardState::new(small_catalog());
        wizard.submit_user_info("Ada", "ada@x.com").unwrap();
        wizard.select_main_attribute("innovation").unwrap();
        let mut scores = BTreeMap::new();
        scores.insert("Innovation".to_string(), 5);
        scores.insert("Creativity".to_string(), 4);
        scores.insert("Problem Solving".to_string(), 3);
        wizard.submit_scores(&scores).unwrap();
        for _ in 0..2 {
            let id = wizard.remaining_attributes()[0].id.clone();
            wizard.select_main_attribute(&id).unwrap();
            let scores = expected_scores(&wizard);
            wizard.submit_scores(&scores).unwrap();
        }
        let selections = wizard.completed_selections().unwrap();
        assert_eq!(selections.len(), 3);
        assert_eq!(selections[0].main_attribute, "Innovation");
        assert_eq!(selections[0].scores["Creativity"], 4);
    }

    #[test]
    fn user_info_requires_both_fields() {
        let mut wizard = WizardState::new(small_catalog());
        assert_eq!(
            wizard.submit_user_info("  ", "ada@x.com"),
            Err(WizardError::MissingField("name"))
        );
        assert_eq!(
            wizard.submit_user_info("Ada", ""),
            Err(WizardError::MissingField("email"))
        );
        assert_eq!(wizard.step(), SurveyStep::UserInfo);

        wizard.submit_user_info(" Ada ", " ada@x.com ").unwrap();
        assert_eq!(wizard.respondent_name(), "Ada");
        assert_eq!(wizard.respondent_email(), "ada@x.com");
    }

    #[test]
    fn unknown_attribute_does_not_mutate_state() {
        let mut wizard = WizardState::new(small_catalog());
        wizard.submit_user_info("Ada", "ada@x.com").unwrap();
        let before_pool = wizard.remaining_attributes().to_vec();
        let res = wizard.select_main_attribute("no-such-id");
        assert_eq!(
            res,
            Err(WizardError::UnknownAttribute("no-such-id".to_string()))
        );
        assert_eq!(wizard.remaining_attributes(), before_pool.as_slice());
        assert_eq!(wizard.step(), SurveyStep::SelectAttribute { slot: 1 });
        assert!(wizard.selections().is_empty());
    }

    #[test]
    fn selected_attribute_leaves_the_pool() {
        let mut wizard = WizardState::new(small_catalog());
        wizard.submit_user_info("Ada", "ada@x.com").unwrap();
        wizard.select_main_attribute("rigor").unwrap();
        let scores = expected_scores(&wizard);
        wizard.submit_scores(&scores).unwrap();
        // The same attribute cannot be picked for the second selection.
        assert_eq!(
            wizard.select_main_attribute("rigor"),
            Err(WizardError::UnknownAttribute("rigor".to_string()))
        );
        assert_eq!(wizard.remaining_attributes().len(), 3);
    }

    #[test]
    fn incomplete_scores_are_rejected() {
        let mut wizard = WizardState::new(small_catalog());
        wizard.submit_user_info("Ada", "ada@x.com").unwrap();
        wizard.select_main_attribute("innovation").unwrap();

        let mut scores = BTreeMap::new();
        scores.insert("Innovation".to_string(), 5);
        let res = wizard.submit_scores(&scores);
        assert_eq!(
            res,
            Err(WizardError::IncompleteScores(vec![
                "Creativity".to_string(),
                "Problem Solving".to_string(),
            ]))
        );
        // No transition happened and nothing was recorded.
        assert_eq!(wizard.step(), SurveyStep::ScoreAttributes { slot: 1 });
        assert!(wizard.selections()[0].scores.is_empty());
    }

    #[test]
    fn scores_must_be_in_range() {
        let mut wizard = WizardState::new(small_catalog());
        wizard.submit_user_info("Ada", "ada@x.com").unwrap();
        wizard.select_main_attribute("innovation").unwrap();
        let mut scores = expected_scores(&wizard);
        scores.insert("Creativity".to_string(), 6);
        assert_eq!(
            wizard.submit_scores(&scores),
            Err(WizardError::ScoreOutOfRange {
                attribute: "Creativity".to_string(),
                score: 6,
            })
        );
        assert_eq!(wizard.step(), SurveyStep::ScoreAttributes { slot: 1 });
    }

    #[test]
    fn unexpected_score_keys_are_rejected() {
        let mut wizard = WizardState::new(small_catalog());
        wizard.submit_user_info("Ada", "ada@x.com").unwrap();
        wizard.select_main_attribute("innovation").unwrap();
        let mut scores = expected_scores(&wizard);
        scores.insert("Leadership".to_string(), 2);
        assert_eq!(
            wizard.submit_scores(&scores),
            Err(WizardError::UnknownAttribute("Leadership".to_string()))
        );
    }

    #[test]
    fn operations_fail_outside_their_step() {
        let mut wizard = WizardState::new(small_catalog());
        assert_eq!(
            wizard.select_main_attribute("innovation"),
            Err(WizardError::ClosedStep {
                operation: "select_main_attribute"
            })
        );
        assert_eq!(
            wizard.submit_scores(&BTreeMap::new()),
            Err(WizardError::ClosedStep {
                operation: "submit_scores"
            })
        );
        wizard.submit_user_info("Ada", "ada@x.com").unwrap();
        assert_eq!(
            wizard.submit_user_info("Ada", "ada@x.com"),
            Err(WizardError::ClosedStep {
                operation: "submit_user_info"
            })
        );
        assert_eq!(wizard.completed_selections(), Err(WizardError::NotComplete));
    }

    #[test]
    fn step_numbers_are_monotonic() {
        let mut wizard = WizardState::new(small_catalog());
        let mut seen = vec![wizard.step_number()];
        wizard.submit_user_info("Ada", "ada@x.com").unwrap();
        seen.push(wizard.step_number());
        for _ in 0..SELECTION_COUNT {
            let id = wizard.remaining_attributes()[0].id.clone();
            wizard.select_main_attribute(&id).unwrap();
            seen.push(wizard.step_number());
            let scores = expected_scores(&wizard);
            wizard.submit_scores(&scores).unwrap();
            seen.push(wizard.step_number());
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(WizardState::total_steps(), 8);
    }

    #[test]
    fn reset_restores_the_initial_state() {
        let mut wizard = WizardState::new(small_catalog());
        complete_survey(&mut wizard);
        assert!(wizard.is_complete());

        wizard.reset();
        assert_eq!(wizard.step(), SurveyStep::UserInfo);
        assert_eq!(wizard.step_number(), 1);
        assert_eq!(wizard.remaining_attributes().len(), 4);
        assert!(wizard.selections().is_empty());
        assert!(wizard.respondent_name().is_empty());

        // The session can run again after a reset.
        complete_survey(&mut wizard);
        assert!(wizard.is_complete());
    }
}
