//! Drop reconciliation.
//!
//! A drag widget reports drop positions against the lane it is showing, which
//! may be a filtered subsequence of the canonical lane. Positions in the two
//! are not interchangeable once a filter hides cards between visible ones, so
//! a filtered drop is anchored on the identity of the card it landed before.

use crate::{
    domain::{
        board::Board,
        card::{CardId, LaneId},
        filter::FilteredBoard,
    },
    error::{KanbanError, Result},
};

/// A drop gesture as reported by the drag widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    pub card_id: CardId,
    pub source: LaneId,
    pub target: LaneId,
    /// Index into the displayed target lane
    pub position: usize,
}

impl DropEvent {
    pub fn new(card_id: CardId, source: LaneId, target: LaneId, position: usize) -> Self {
        Self {
            card_id,
            source,
            target,
            position,
        }
    }
}

/// Outcome of translating a drop into canonical coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropResolution {
    /// Insert at this index of the canonical target lane
    Canonical(usize),
    /// The card was dropped onto itself; nothing moves
    Unchanged,
}

/// Translates the drop position, given against `view`, into a canonical
/// index of the target lane in `board`.
pub fn resolve_drop(board: &Board, view: &FilteredBoard, drop: &DropEvent) -> Result<DropResolution> {
    if !view.is_filtered() {
        return Ok(DropResolution::Canonical(drop.position));
    }

    let canonical = board
        .lane(drop.target)
        .ok_or(KanbanError::LaneNotFound(drop.target))?;
    let shown = view.lane(drop.target).ok_or_else(|| {
        KanbanError::Consistency(format!("lane {} is not displayed", drop.target))
    })?;

    if drop.position == shown.cards.len() {
        return Ok(DropResolution::Canonical(canonical.cards.len()));
    }

    let anchor = shown.cards.get(drop.position).ok_or_else(|| {
        KanbanError::Consistency(format!(
            "drop position {} is past the {} cards shown in lane {}",
            drop.position,
            shown.cards.len(),
            drop.target
        ))
    })?;

    let Some(index) = canonical.position_of(&anchor.id) else {
        tracing::warn!(
            anchor = %anchor.id,
            lane = %drop.target,
            "drop anchor missing from board"
        );
        return Err(KanbanError::Consistency(format!(
            "anchor card {} is no longer in lane {}",
            anchor.id, drop.target
        )));
    };

    // Only a card that really sits in the target lane can anchor on itself
    if anchor.id == drop.card_id {
        return Ok(DropResolution::Unchanged);
    }

    Ok(DropResolution::Canonical(index))
}

/// Resolves a drop against the displayed view and applies the move.
/// On any failure the board is left as it was.
pub fn apply_drop(board: &Board, view: &FilteredBoard, drop: &DropEvent) -> Result<Board> {
    match resolve_drop(board, view, drop)? {
        DropResolution::Canonical(index) => {
            board.move_card(&drop.card_id, drop.source, drop.target, index)
        }
        DropResolution::Unchanged => {
            if board.lane(drop.source).and_then(|l| l.position_of(&drop.card_id)).is_none() {
                return Err(KanbanError::card_not_in_lane(&drop.card_id, drop.source));
            }
            Ok(board.clone())
        }
    }
}
