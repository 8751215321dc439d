use std::fs;

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use survey_wizard::{Attribute, Catalog};

use crate::survey::{
    InvalidCatalogSnafu, OpeningCatalogSnafu, OpeningConfigSnafu, ParsingCatalogSnafu,
    ParsingConfigSnafu, SurveyResult,
};

/// The optional JSON configuration file. The field names keep the camelCase
/// spelling of the original deployment so existing files stay readable.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "dataPath")]
    pub data_path: Option<String>,
    #[serde(rename = "catalogPath")]
    pub catalog_path: Option<String>,
}

pub fn read_config(path: &str) -> SurveyResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningConfigSnafu { path })?;
    serde_json::from_str(&contents).context(ParsingConfigSnafu { path })
}

/// Reads a custom attribute catalog: a JSON array of attributes with the
/// same shape as the built-in one. The catalog is validated on load.
pub fn read_catalog(path: &str) -> SurveyResult<Catalog> {
    let contents = fs::read_to_string(path).context(OpeningCatalogSnafu { path })?;
    let attributes: Vec<Attribute> =
        serde_json::from_str(&contents).context(ParsingCatalogSnafu { path })?;
    Catalog::new(attributes).context(InvalidCatalogSnafu { path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::SurveyError;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_a_config_file() {
        let file = write_temp(r#"{"dataPath": "/tmp/responses.json"}"#);
        let config = read_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.data_path.as_deref(), Some("/tmp/responses.json"));
        assert_eq!(config.catalog_path, None);
    }

    #[test]
    fn reads_a_catalog_file() {
        let file = write_temp(
            r#"[
              {"id": "1", "name": "Innovation", "relatedAttributes": ["Creativity", "Problem Solving"]},
              {"id": "2", "name": "Leadership", "relatedAttributes": ["Communication", "Empathy"]},
              {"id": "3", "name": "Rigor", "relatedAttributes": ["Patience", "Focus"]}
            ]"#,
        );
        let catalog = read_catalog(file.path().to_str().unwrap()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.find_by_id("1").unwrap().name, "Innovation");
    }

    #[test]
    fn rejects_an_invalid_catalog() {
        let file = write_temp(
            r#"[{"id": "1", "name": "Innovation", "relatedAttributes": ["A", "B"]}]"#,
        );
        let res = read_catalog(file.path().to_str().unwrap());
        assert!(matches!(res, Err(SurveyError::InvalidCatalog { .. })));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let res = read_config("/no/such/file.json");
        assert!(matches!(res, Err(SurveyError::OpeningConfig { .. })));
    }
}
