//! Multipart form reading shared by the upload endpoints.

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use axum::extract::Multipart;
use tracing::debug;

use crate::extraction::{aggregate, extract_all, UploadedFile};
use crate::types::{AppError, AppResult};

const FILE_FIELDS: &[&str] = &["files", "file"];

/// Files plus every non-file field of an upload form, in arrival order.
#[derive(Debug, Default)]
pub struct FormFields {
    pub files: Vec<UploadedFile>,
    fields: HashMap<String, Vec<String>>,
}

impl FormFields {
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = FormFields::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::InvalidRequest(format!("Failed to read form field: {}", e)))?
        {
            let name = field.name().unwrap_or("").to_string();

            if let Some(filename) = field.file_name().map(str::to_string) {
                if !FILE_FIELDS.contains(&name.as_str()) {
                    debug!(field = %name, filename = %filename, "Ignoring file in unexpected field");
                    continue;
                }
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::InvalidRequest(format!("Failed to read file '{}': {}", filename, e))
                })?;
                debug!(filename = %filename, size = bytes.len(), "Received upload");
                form.files.push(UploadedFile::new(filename, bytes));
            } else {
                let value = field.text().await.map_err(|e| {
                    AppError::InvalidRequest(format!("Failed to read field '{}': {}", name, e))
                })?;
                form.fields.entry(name).or_default().push(value);
            }
        }

        Ok(form)
    }

    /// Fails unless at least one file was uploaded.
    pub fn require_files(&self) -> AppResult<()> {
        if self.files.is_empty() {
            return Err(AppError::InvalidRequest(
                "At least one file must be uploaded in the 'files' field".to_string(),
            ));
        }
        Ok(())
    }

    /// Last non-blank value of a field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)?
            .iter()
            .rev()
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
    }

    /// All values of a repeatable field; each value may also be comma separated.
    pub fn list(&self, name: &str) -> Vec<&str> {
        self.fields
            .get(name)
            .map(|values| {
                values
                    .iter()
                    .flat_map(|v| v.split(','))
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn parse<T>(&self, name: &str) -> AppResult<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.text(name)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|e| AppError::Validation(format!("Invalid value for '{}': {}", name, e)))
            })
            .transpose()
    }

    pub fn flag(&self, name: &str) -> AppResult<Option<bool>> {
        self.text(name)
            .map(|raw| match raw.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(true),
                "false" | "0" | "no" | "off" => Ok(false),
                _ => Err(AppError::Validation(format!(
                    "Invalid value for '{}': expected true or false",
                    name
                ))),
            })
            .transpose()
    }

    #[cfg(test)]
    pub(crate) fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.entry(name.to_string()).or_default().push(value.to_string());
        self
    }
}

/// Extracts every uploaded file off the async runtime and joins the results in upload order.
pub async fn aggregated_content(files: Vec<UploadedFile>) -> String {
    let documents = extract_all(files).await;
    aggregate(&documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_takes_last_non_blank_value() {
        let form = FormFields::default()
            .with_field("language", "French")
            .with_field("language", "  ");
        assert_eq!(form.text("language"), Some("French"));
        assert_eq!(form.text("missing"), None);
    }

    #[test]
    fn test_list_splits_commas_and_repeats() {
        let form = FormFields::default()
            .with_field("exercises_types", "multiple_choice, multiple-choice")
            .with_field("exercises_types", "multiple_choice");
        assert_eq!(form.list("exercises_types").len(), 3);
    }

    #[test]
    fn test_parse_and_flag() {
        let form = FormFields::default()
            .with_field("exercises_count", "7")
            .with_field("bad_count", "-1")
            .with_field("include_examples", "True");

        assert_eq!(form.parse::<u32>("exercises_count").unwrap(), Some(7));
        assert!(matches!(form.parse::<u32>("bad_count"), Err(AppError::Validation(_))));
        assert_eq!(form.flag("include_examples").unwrap(), Some(true));
        assert_eq!(form.flag("include_references").unwrap(), None);
    }

    #[test]
    fn test_require_files() {
        assert!(matches!(
            FormFields::default().require_files(),
            Err(AppError::InvalidRequest(_))
        ));
    }
}
