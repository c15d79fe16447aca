use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::messages;
use crate::models::{ProjectId, Status, TaskPayload};
use crate::validators::{Collector, ValidationError, ValidationErrors};

const NAME_MIN_CHARS: usize = 3;
const NAME_MAX_CHARS: usize = 120;

/// Deadline as entered: free text from an input, or an already picked date
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeadlineInput {
    Text(String),
    Date(Date),
    DateTime(OffsetDateTime),
}

impl From<&str> for DeadlineInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DeadlineInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Date> for DeadlineInput {
    fn from(value: Date) -> Self {
        Self::Date(value)
    }
}

impl From<OffsetDateTime> for DeadlineInput {
    fn from(value: OffsetDateTime) -> Self {
        Self::DateTime(value)
    }
}

/// Local offset of this machine, UTC if it cannot be determined
pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// Current local calendar day, UTC if the local offset is unknown
pub fn today() -> Date {
    OffsetDateTime::now_utc().to_offset(local_offset()).date()
}

/// Task names are 3 to 120 characters
pub fn validate_task_name(name: &str) -> Result<(), ValidationError> {
    let chars = name.chars().count();
    if chars < NAME_MIN_CHARS {
        Err(ValidationError::new("name", messages::TASK_NAME_TOO_SHORT))
    } else if chars > NAME_MAX_CHARS {
        Err(ValidationError::new("name", messages::TASK_NAME_TOO_LONG))
    } else {
        Ok(())
    }
}

pub fn parse_status(text: &str) -> Result<Status, ValidationError> {
    text.parse()
        .map_err(|_| ValidationError::new("status", messages::TASK_STATUS_INVALID))
}

fn parse_deadline_text(text: &str, offset: UtcOffset) -> Option<Date> {
    let text = text.trim();
    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .ok()
        .or_else(|| {
            OffsetDateTime::parse(text, &Rfc3339)
                .ok()
                .map(|dt| dt.to_offset(offset).date())
        })
        .or_else(|| {
            PrimitiveDateTime::parse(
                text,
                format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
            )
            .ok()
            .map(|dt| dt.date())
        })
        .or_else(|| {
            PrimitiveDateTime::parse(text, format_description!("[year]-[month]-[day]T[hour]:[minute]"))
                .ok()
                .map(|dt| dt.date())
        })
}

/// Normalize a deadline to a calendar date no earlier than `today`.
///
/// Instants carrying an offset are first moved to `offset`, the offset
/// `today` was taken in. Time of day is then ignored, so any moment of
/// `today` passes. Date-times without an offset are already local.
pub fn parse_deadline(
    input: &DeadlineInput,
    today: Date,
    offset: UtcOffset,
) -> Result<Date, ValidationError> {
    let date = match input {
        DeadlineInput::Text(text) => parse_deadline_text(text, offset),
        DeadlineInput::Date(date) => Some(*date),
        DeadlineInput::DateTime(dt) => Some(dt.to_offset(offset).date()),
    }
    .ok_or_else(|| ValidationError::new("deadline", messages::TASK_DEADLINE_INVALID))?;

    if date < today {
        return Err(ValidationError::new(
            "deadline",
            messages::TASK_DEADLINE_IN_PAST,
        ));
    }
    Ok(date)
}

/// Task create/edit form input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub name: String,
    /// Optional; an empty string is accepted
    pub performer: Option<String>,
    pub status: String,
    pub deadline: DeadlineInput,
}

/// A task form that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTask {
    pub name: String,
    pub performer: Option<String>,
    pub status: Status,
    pub deadline: Date,
}

impl TaskForm {
    /// Validate against the current local calendar day
    pub fn validate(&self) -> Result<ValidTask, ValidationErrors> {
        let offset = local_offset();
        self.validate_on(OffsetDateTime::now_utc().to_offset(offset).date(), offset)
    }

    /// Validate with an explicit reference day and the offset it is in
    pub fn validate_on(
        &self,
        today: Date,
        offset: UtcOffset,
    ) -> Result<ValidTask, ValidationErrors> {
        let mut collector = Collector::default();
        collector.check(validate_task_name(&self.name));
        let status = collector.check(parse_status(&self.status));
        let deadline = collector.check(parse_deadline(&self.deadline, today, offset));
        collector.finish()?;

        match (status, deadline) {
            (Some(status), Some(deadline)) => Ok(ValidTask {
                name: self.name.clone(),
                performer: self.performer.clone(),
                status,
                deadline,
            }),
            // finish() already reported the failing field
            _ => Err(ValidationErrors(Vec::new())),
        }
    }
}

impl ValidTask {
    /// Write payload with the deadline as `YYYY-MM-DD`
    pub fn into_payload(self, project_id: ProjectId) -> TaskPayload {
        TaskPayload {
            name: Some(self.name),
            performer: Some(self.performer.unwrap_or_default()),
            project_id: Some(project_id),
            status: Some(self.status),
            deadline: Some(self.deadline.to_string()),
        }
    }
}
