//! The attribute catalog: the fixed pool a respondent draws from.

use std::collections::HashSet;
use std::error::Error;
use std::fmt::Display;

use crate::config::{Attribute, SELECTION_COUNT};

/// Problems detected when assembling a catalog.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum CatalogError {
    /// Fewer entries than the number of selections a session makes.
    TooFewAttributes(usize),
    DuplicateId(String),
    DuplicateName(String),
}

impl Error for CatalogError {}

impl Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::TooFewAttributes(n) => {
                write!(
                    f,
                    "catalog has {} attributes, at least {} are required",
                    n, SELECTION_COUNT
                )
            }
            CatalogError::DuplicateId(id) => write!(f, "duplicate attribute id {}", id),
            CatalogError::DuplicateName(name) => write!(f, "duplicate attribute name {}", name),
        }
    }
}

/// A validated, read-only list of attributes.
///
/// The order of the entries is preserved; the wizard presents the remaining
/// pool in catalog order.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Catalog {
    attributes: Vec<Attribute>,
}

impl Catalog {
    /// Validates the entries and builds a catalog out of them.
    pub fn new(attributes: Vec<Attribute>) -> Result<Catalog, CatalogError> {
        if attributes.len() < SELECTION_COUNT {
            return Err(CatalogError::TooFewAttributes(attributes.len()));
        }
        let mut ids: HashSet<&str> = HashSet::new();
        let mut names: HashSet<&str> = HashSet::new();
        for attr in attributes.iter() {
            if !ids.insert(attr.id.as_str()) {
                return Err(CatalogError::DuplicateId(attr.id.clone()));
            }
            if !names.insert(attr.name.as_str()) {
                return Err(CatalogError::DuplicateName(attr.name.clone()));
            }
        }
        Ok(Catalog { attributes })
    }

    /// The catalog that ships with the program.
    pub fn builtin() -> Catalog {
        let attributes = BUILTIN_ATTRIBUTES
            .iter()
            .enumerate()
            .map(|(idx, (name, rel_a, rel_b))| Attribute {
                id: (idx + 1).to_string(),
                name: (*name).to_string(),
                related_attributes: [(*rel_a).to_string(), (*rel_b).to_string()],
            })
            .collect();
        // The built-in list is static and known to be well-formed.
        Catalog::new(attributes).unwrap()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.id == id)
    }
}

// Name, then the two related attributes scored alongside it.
const BUILTIN_ATTRIBUTES: &[(&str, &str, &str)] = &[
    ("Adaptability", "Resilience", "Emotion"),
    ("Awareness", "Focus", "Cognition"),
    ("Balance", "Strength", "Calmness"),
    ("Breathing", "Focus", "Energy"),
    ("Calmness", "Vitality", "Resilience"),
    ("Cardiohealth", "Endurance", "Strength"),
    ("Clarity", "Focus", "Mindfulness"),
    ("Confidence", "Selfhood", "Assertiveness"),
    ("Connection", "Empathy", "Community"),
    ("Creativity", "Imagination", "Positivity"),
    ("Curiosity", "Awareness", "Engagement"),
    ("Digestion", "Energy", "Immunity"),
    ("Empathy", "Compassion", "Community"),
    ("Endurance", "Circulation", "Strength"),
    ("Energy", "Focus", "Motivation"),
    ("Esteem", "Confidence", "Selfhood"),
    ("Expression", "Confidence", "Resilience"),
    ("Focus", "Adaptability", "Mindfulness"),
    ("Happiness", "Positivity", "Wellbeing"),
    ("Hope", "Optimism", "Resilience"),
    ("Immunity", "Wellbeing", "Energy"),
    ("Inspiration", "Creativity", "Positivity"),
    ("Longevity", "Energy", "Immunity"),
    ("Memory", "Focus", "Cognition"),
    ("Mindfulness", "Calmness", "Awareness"),
    ("Mood", "Positivity", "Wellbeing"),
    ("Patience", "Calmness", "Endurance"),
    ("Positivity", "Optimism", "Energy"),
    ("Relaxation", "Calmness", "Focus"),
    ("Resilience", "Emotion", "Direction"),
    ("Sleep", "Energy", "Calmness"),
    ("Social", "Emotion", "Wellbeing"),
    ("Strength", "Endurance", "Cardiohealth"),
    ("Trust", "Connection", "Wellbeing"),
    ("Wellbeing", "Happiness", "Immunity"),
];
