use crate::domain::LaneId;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, KanbanError>;

#[derive(Debug, Error)]
pub enum KanbanError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Card not found: {card_id}{}", lane_suffix(.lane))]
    CardNotFound {
        card_id: String,
        lane: Option<LaneId>,
    },

    #[error("Lane not found: {0}")]
    LaneNotFound(LaneId),

    #[error("Invalid card ID: {0:?}")]
    InvalidCardId(String),

    #[error("Invalid board: {0}")]
    InvalidBoard(String),

    #[error("Board is out of sync with the displayed view: {0}")]
    Consistency(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Decode error: {0}")]
    DecodeError(#[from] base64::DecodeError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

fn lane_suffix(lane: &Option<LaneId>) -> String {
    lane.map(|l| format!(" in lane {}", l)).unwrap_or_default()
}

impl KanbanError {
    pub fn card_not_found(card_id: impl fmt::Display) -> Self {
        Self::CardNotFound {
            card_id: card_id.to_string(),
            lane: None,
        }
    }

    pub fn card_not_in_lane(card_id: impl fmt::Display, lane: LaneId) -> Self {
        Self::CardNotFound {
            card_id: card_id.to_string(),
            lane: Some(lane),
        }
    }

    /// Returns the field-level messages when this is a validation failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// A form field that can fail validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
}

impl Field {
    pub fn required_message(&self) -> &'static str {
        match self {
            Self::Title => "Please input the title!",
            Self::Description => "Please input the description!",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => write!(f, "title"),
            Self::Description => write!(f, "description"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Field-level validation messages, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(&mut self, field: Field, value: &str) {
        if value.trim().is_empty() {
            self.errors.push(FieldError {
                field,
                message: field.required_message().to_string(),
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn message_for(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Converts into `Err` when any field failed
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(KanbanError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", messages.join(", "))
    }
}
