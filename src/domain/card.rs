use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, str::FromStr};
use uuid::Uuid;

/// Opaque unique identifier for a card, assigned once at creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Generates a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CardId {
    type Err = crate::error::KanbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(crate::error::KanbanError::InvalidCardId(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one of the fixed lanes. A card's status is the id of the
/// lane holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LaneId {
    Todo,
    InProgress,
    Done,
}

pub type CardStatus = LaneId;

impl LaneId {
    /// Every lane, in board order
    pub const ALL: [LaneId; 3] = [LaneId::Todo, LaneId::InProgress, LaneId::Done];

    /// Default column heading
    pub fn default_title(&self) -> &'static str {
        match self {
            Self::Todo => "To do",
            Self::InProgress => "In progress",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Todo => write!(f, "Todo"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Done => write!(f, "Done"),
        }
    }
}

impl FromStr for LaneId {
    type Err = crate::error::KanbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "todo" => Ok(Self::Todo),
            "inprogress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(crate::error::KanbanError::ConfigError(format!(
                "Unknown lane '{}'. Valid lanes: Todo, InProgress, Done",
                s
            ))),
        }
    }
}

/// Closed set of tags a card can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardTag {
    #[serde(rename = "SEO")]
    Seo,
    #[serde(rename = "Long Form")]
    LongForm,
    #[serde(rename = "Blog Post")]
    BlogPost,
}

impl CardTag {
    /// Every tag, in picker order
    pub const ALL: [CardTag; 3] = [CardTag::Seo, CardTag::LongForm, CardTag::BlogPost];
}

impl fmt::Display for CardTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seo => write!(f, "SEO"),
            Self::LongForm => write!(f, "Long Form"),
            Self::BlogPost => write!(f, "Blog Post"),
        }
    }
}

/// A kanban card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: BTreeSet<CardTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub status: CardStatus,
}

impl Card {
    /// Builds a card with a fresh id in the given lane
    pub(crate) fn new(input: CardInput, status: CardStatus) -> Self {
        Self {
            id: CardId::generate(),
            title: input.title,
            description: input.description,
            tags: input.tags,
            due_date: input.due_date,
            status,
        }
    }

    /// Case-insensitive substring match on the title
    pub fn title_matches(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty() || self.title.to_lowercase().contains(needle_lower)
    }

    pub(crate) fn apply(&mut self, patch: CardPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
    }
}

/// Field values for a card that does not exist yet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardInput {
    pub title: String,
    pub description: String,
    pub tags: BTreeSet<CardTag>,
    pub due_date: Option<DateTime<Utc>>,
}

impl CardInput {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, tag: CardTag) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Partial update for an existing card. `None` leaves the field alone;
/// `due_date: Some(None)` clears the date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<BTreeSet<CardTag>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl CardPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn tags(mut self, tags: impl IntoIterator<Item = CardTag>) -> Self {
        self.tags = Some(tags.into_iter().collect());
        self
    }

    pub fn due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}
