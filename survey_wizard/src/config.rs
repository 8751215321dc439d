// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The number of main attributes a respondent picks over one session.
pub const SELECTION_COUNT: usize = 3;

/// The lowest score that can be assigned to an attribute.
pub const SCORE_MIN: u8 = 1;
/// The highest score that can be assigned to an attribute.
pub const SCORE_MAX: u8 = 5;

/// One entry of the attribute catalog.
///
/// An attribute has a unique identifier, a display name and exactly two
/// related attributes that get scored alongside it when it is picked as a
/// main attribute. Catalogs are loaded once at startup and never change
/// while a survey is running.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub id: String,
    pub name: String,
    #[serde(rename = "relatedAttributes")]
    pub related_attributes: [String; 2],
}

/// The record of one main-attribute choice and the scores assigned to it.
///
/// The keys of `scores` are exactly the main attribute plus its two related
/// attributes, each mapped to a value in `SCORE_MIN..=SCORE_MAX`. The map is
/// ordered so that exports iterate it deterministically.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Selection {
    #[serde(rename = "mainAttribute")]
    pub main_attribute: String,
    pub scores: BTreeMap<String, u8>,
}

impl Selection {
    /// The names of the scored attributes other than the main one, in map
    /// iteration order.
    pub fn related_names(&self) -> Vec<&str> {
        self.scores
            .keys()
            .filter(|name| **name != self.main_attribute)
            .map(|name| name.as_str())
            .collect()
    }
}

/// A completed survey response, immutable once constructed.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SurveyResponse {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub name: String,
    pub email: String,
    #[serde(rename = "selectedAttributes")]
    pub selected_attributes: Vec<Selection>,
}

/// Errors raised by the wizard transitions.
///
/// A failed transition leaves the wizard state untouched.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum WizardError {
    /// A required user-info field was empty after trimming.
    MissingField(&'static str),
    /// The attribute is not in the remaining pool (or not scorable here).
    UnknownAttribute(String),
    /// Scores were submitted before every expected attribute was rated.
    /// Carries the names that are still missing, in sorted order.
    IncompleteScores(Vec<String>),
    /// A score fell outside `SCORE_MIN..=SCORE_MAX`.
    ScoreOutOfRange { attribute: String, score: u8 },
    /// The operation does not apply to the current step.
    ClosedStep { operation: &'static str },
    /// The survey has not reached the terminal step yet.
    NotComplete,
}

impl Error for WizardError {}

impl Display for WizardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WizardError::MissingField(field) => {
                write!(f, "required field {} is empty", field)
            }
            WizardError::UnknownAttribute(name) => {
                write!(f, "attribute {} is not available", name)
            }
            WizardError::IncompleteScores(missing) => {
                write!(f, "missing scores for: {}", missing.join(", "))
            }
            WizardError::ScoreOutOfRange { attribute, score } => {
                write!(
                    f,
                    "score {} for {} is outside {}..={}",
                    score, attribute, SCORE_MIN, SCORE_MAX
                )
            }
            WizardError::ClosedStep { operation } => {
                write!(f, "operation {} does not apply to the current step", operation)
            }
            WizardError::NotComplete => {
                write!(f, "the survey is not complete")
            }
        }
    }
}
