use once_cell::sync::Lazy;
use regex::Regex;

use crate::messages;
use crate::models::ProjectPayload;
use crate::validators::{Collector, ValidationError, ValidationErrors};

// Latin plus Ukrainian/Russian Cyrillic letters
static NAME_LETTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-zА-Яа-яІіЇїЄєҐґ]").expect("valid name letter regex"));

/// Project names need at least one letter
pub fn validate_project_name(name: &str) -> Result<(), ValidationError> {
    if NAME_LETTER_RE.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "name",
            messages::PROJECT_NAME_NEEDS_LETTER,
        ))
    }
}

/// Project create/edit form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectForm {
    pub name: String,
    pub description: Option<String>,
    /// Passed through as entered
    pub status: String,
}

impl ProjectForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut collector = Collector::default();
        collector.check(validate_project_name(&self.name));
        collector.finish()
    }

    /// Validate and build the write payload
    pub fn into_payload(self) -> Result<ProjectPayload, ValidationErrors> {
        self.validate()?;
        Ok(ProjectPayload {
            name: self.name,
            description: self.description.unwrap_or_default(),
            status: self.status,
        })
    }
}
