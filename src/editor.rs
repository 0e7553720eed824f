//! Card form workflow: seeding a form from a card, validating what the user
//! entered, and folding the result back into the board. Deletion goes
//! through an explicit confirmation step.

use crate::{
    domain::{Board, Card, CardId, CardInput, CardPatch, CardTag, LaneId},
    error::{Field, KanbanError, Result, ValidationErrors},
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::collections::BTreeSet;

/// Field values held by the card form while it is open
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub title: String,
    pub description: String,
    pub tags: BTreeSet<CardTag>,
    /// Calendar date as picked in the date picker
    pub due_date: Option<NaiveDate>,
}

impl FormState {
    /// Checks or unchecks one tag in the picker
    pub fn toggle_tag(&mut self, tag: CardTag, checked: bool) {
        if checked {
            self.tags.insert(tag);
        } else {
            self.tags.remove(&tag);
        }
    }

    /// Required-field validation, independent of the board's own checks
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require(Field::Title, &self.title);
        errors.require(Field::Description, &self.description);
        errors
    }
}

/// Timestamp stored for a picked date: midnight UTC
pub fn dehydrate_date(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

pub fn hydrate_date(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.date_naive()
}

/// Opens an empty form for a new card
pub fn begin_create() -> FormState {
    FormState::default()
}

/// Opens a form seeded from an existing card
pub fn begin_edit(card: &Card) -> FormState {
    FormState {
        title: card.title.clone(),
        description: card.description.clone(),
        tags: card.tags.clone(),
        due_date: card.due_date.map(hydrate_date),
    }
}

/// Validates the form and creates a new card, or edits `existing`.
/// Nothing on the board changes when validation fails.
pub fn submit(form: &FormState, existing: Option<&CardId>, board: &Board) -> Result<Board> {
    form.validate().into_result()?;

    let Some(card_id) = existing else {
        return board.create_card(CardInput {
            title: form.title.clone(),
            description: form.description.clone(),
            tags: form.tags.clone(),
            due_date: form.due_date.map(dehydrate_date),
        });
    };

    // An untouched date keeps its stored time of day
    let previous = board.card(card_id).and_then(|c| c.due_date);
    let due_date = match (form.due_date, previous) {
        (Some(date), Some(stored)) if hydrate_date(stored) == date => Some(stored),
        (date, _) => date.map(dehydrate_date),
    };

    board.edit_card(
        card_id,
        CardPatch {
            title: Some(form.title.clone()),
            description: Some(form.description.clone()),
            tags: Some(form.tags.clone()),
            due_date: Some(due_date),
        },
    )
}

/// Yes/no decision point consulted before a card is deleted
pub trait ConfirmationGate {
    fn confirm(self, card: &Card) -> bool;
}

impl<F> ConfirmationGate for F
where
    F: FnOnce(&Card) -> bool,
{
    fn confirm(self, card: &Card) -> bool {
        self(card)
    }
}

/// Deletes the card only if `gate` agrees. A declined gate returns the
/// board unchanged.
pub fn confirm_delete(
    card_id: &CardId,
    lane: LaneId,
    board: &Board,
    gate: impl ConfirmationGate,
) -> Result<Board> {
    let card = board
        .lane(lane)
        .and_then(|l| l.cards.iter().find(|c| &c.id == card_id))
        .ok_or_else(|| KanbanError::card_not_in_lane(card_id, lane))?;

    if gate.confirm(card) {
        board.delete_card(card_id, lane)
    } else {
        tracing::debug!(card_id = %card_id, "delete declined");
        Ok(board.clone())
    }
}

/// First half of the two-step delete: records the intent without touching
/// the board
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending deletion does nothing until confirmed"]
pub struct PendingDeletion {
    card_id: CardId,
    lane: LaneId,
}

pub fn request_delete(card_id: CardId, lane: LaneId) -> PendingDeletion {
    PendingDeletion { card_id, lane }
}

impl PendingDeletion {
    pub fn card_id(&self) -> &CardId {
        &self.card_id
    }

    pub fn lane(&self) -> LaneId {
        self.lane
    }

    /// Runs the deletion against the current board
    pub fn confirm(self, board: &Board) -> Result<Board> {
        board.delete_card(&self.card_id, self.lane)
    }

    pub fn cancel(self) {
        tracing::debug!(card_id = %self.card_id, "delete cancelled");
    }
}
