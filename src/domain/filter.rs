use crate::domain::{
    board::{Board, Lane},
    card::{Card, LaneId},
};

/// A lane as currently displayed: the subsequence of its cards that pass
/// the active search, in canonical order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredLane {
    pub id: LaneId,
    pub title: String,
    pub label: String,
    pub cards: Vec<Card>,
}

impl FilteredLane {
    fn project(lane: &Lane, needle: &str) -> Self {
        Self {
            id: lane.id,
            title: lane.title.clone(),
            label: lane.label.clone(),
            cards: lane
                .cards
                .iter()
                .filter(|c| c.title_matches(needle))
                .cloned()
                .collect(),
        }
    }
}

/// Read-only view of a board under a search term. Recomputed from the
/// canonical board, never edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredBoard {
    search_term: String,
    lanes: Vec<FilteredLane>,
}

impl FilteredBoard {
    /// The term this view was projected with
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// True when the view may hide cards
    pub fn is_filtered(&self) -> bool {
        !self.search_term.is_empty()
    }

    pub fn lanes(&self) -> &[FilteredLane] {
        &self.lanes
    }

    pub fn lane(&self, id: LaneId) -> Option<&FilteredLane> {
        self.lanes.iter().find(|l| l.id == id)
    }

    pub fn card_count(&self) -> usize {
        self.lanes.iter().map(|l| l.cards.len()).sum()
    }
}

/// Projects `board` through a case-insensitive title search. An empty term
/// keeps every card.
pub fn project(board: &Board, search_term: &str) -> FilteredBoard {
    let needle = search_term.to_lowercase();
    FilteredBoard {
        search_term: search_term.to_string(),
        lanes: board
            .lanes()
            .map(|lane| FilteredLane::project(lane, &needle))
            .collect(),
    }
}
