// Assembles completed wizard sessions into persisted records.

use log::{info, warn};

use survey_wizard::{SurveyResponse, WizardError, WizardState};
use time::OffsetDateTime;

use crate::survey::store::ResponseStore;

/// Builds the immutable response record out of a completed wizard,
/// stamped with the current time.
pub fn finalize(wizard: &WizardState) -> Result<SurveyResponse, WizardError> {
    let selections = wizard.completed_selections()?;
    Ok(SurveyResponse {
        timestamp: OffsetDateTime::now_utc(),
        name: wizard.respondent_name().to_string(),
        email: wizard.respondent_email().to_string(),
        selected_attributes: selections.to_vec(),
    })
}

/// Appends the record to the store, best-effort.
///
/// Persistence is decoupled from the wizard's transition to the thank-you
/// step: a storage failure is logged and swallowed, and the session goes on
/// as if the write had succeeded (at-most-once, non-blocking).
pub fn record(store: &dyn ResponseStore, response: &SurveyResponse) {
    match store.append(response) {
        Ok(()) => info!("survey response from {} persisted", response.name),
        Err(e) => warn!("failed to persist survey response: {}", e),
    }
}
