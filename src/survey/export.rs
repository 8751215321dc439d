// CSV serialization of collected responses.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use snafu::prelude::*;

use survey_wizard::{SurveyResponse, SELECTION_COUNT};
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::survey::{CsvWriteSnafu, SurveyResult};

/// Serializes the records to a CSV document: a header row, then one row per
/// response.
///
/// The layout follows the original export: `Timestamp, Name, Email`, then
/// six columns per selection slot (main attribute and score, the two
/// related attributes and their scores, related columns in score-map
/// iteration order). A response with fewer selections than slots gets empty
/// strings for the missing columns. Every field is quoted; embedded quotes
/// are doubled per RFC 4180.
pub fn export_csv(records: &[SurveyResponse]) -> SurveyResult<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut header: Vec<String> = vec![
        "Timestamp".to_string(),
        "Name".to_string(),
        "Email".to_string(),
    ];
    for i in 1..=SELECTION_COUNT {
        header.push(format!("Main Attribute {}", i));
        header.push(format!("Main Attribute {} Score", i));
        header.push(format!("Related Attribute {}A", i));
        header.push(format!("Related Attribute {}A Score", i));
        header.push(format!("Related Attribute {}B", i));
        header.push(format!("Related Attribute {}B Score", i));
    }
    writer.write_record(&header).context(CsvWriteSnafu {})?;

    for record in records {
        let mut row: Vec<String> = vec![
            format_timestamp(&record.timestamp),
            record.name.clone(),
            record.email.clone(),
        ];
        for i in 0..SELECTION_COUNT {
            match record.selected_attributes.get(i) {
                Some(selection) => {
                    let score_of = |name: &str| {
                        selection
                            .scores
                            .get(name)
                            .map(|s| s.to_string())
                            .unwrap_or_default()
                    };
                    row.push(selection.main_attribute.clone());
                    row.push(score_of(&selection.main_attribute));
                    let related = selection.related_names();
                    for slot in 0..2 {
                        match related.get(slot) {
                            Some(name) => {
                                row.push(name.to_string());
                                row.push(score_of(name));
                            }
                            None => {
                                row.push(String::new());
                                row.push(String::new());
                            }
                        }
                    }
                }
                None => {
                    for _ in 0..6 {
                        row.push(String::new());
                    }
                }
            }
        }
        writer.write_record(&row).context(CsvWriteSnafu {})?;
    }

    match writer.into_inner() {
        Ok(bytes) => Ok(bytes),
        Err(e) => whatever!("Could not flush the CSV writer: {:?}", e),
    }
}

/// The default export file name, `survey-responses-<ISO date>.csv`.
pub fn default_export_name(date: Date) -> String {
    format!("survey-responses-{}.csv", date)
}

/// Renders a timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_timestamp(timestamp: &OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    timestamp
        .format(&format)
        .unwrap_or_else(|_| timestamp.to_string())
}
