use crate::{
    config::{BoardConfig, LaneConfig},
    domain::card::{Card, CardId, CardInput, CardPatch, LaneId},
    error::{Field, KanbanError, Result, ValidationErrors},
};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, sync::Arc};

/// A kanban lane: one fixed column holding an ordered run of cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    pub id: LaneId,
    pub title: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Lane {
    pub fn from_config(config: &LaneConfig) -> Self {
        Self {
            id: config.id,
            title: config.title.clone(),
            label: config.label.clone(),
            cards: Vec::new(),
        }
    }

    /// Gets the position of a card within this lane
    pub fn position_of(&self, card_id: &CardId) -> Option<usize> {
        self.cards.iter().position(|c| &c.id == card_id)
    }

    /// Card count shown in the lane header when no label is configured
    pub fn count_label(&self) -> String {
        if self.label.is_empty() {
            self.cards.len().to_string()
        } else {
            self.label.clone()
        }
    }
}

/// Where a card currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLocation {
    pub lane: LaneId,
    pub index: usize,
}

/// Kanban board state.
///
/// A `Board` is an immutable value. Every operation returns a new board and
/// leaves `self` untouched; lanes the operation did not change are shared
/// with the previous value through `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    lanes: Vec<Arc<Lane>>,
}

impl Board {
    /// Creates an empty board with the configured lanes
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            lanes: config
                .lanes
                .iter()
                .map(|l| Arc::new(Lane::from_config(l)))
                .collect(),
        }
    }

    /// Builds the starting board for a config, seeding demo cards if asked
    pub fn from_config(config: &BoardConfig) -> Result<Self> {
        config.validate()?;
        let board = Self::new(config);
        if !config.seed_demo_cards {
            return Ok(board);
        }

        board
            .create_card(CardInput::new("Write Blog", "Can AI make memes"))?
            .create_card(CardInput::new("Pay Rent", "Transfer via NEFT"))
    }

    /// Builds a board from explicit lanes, checking every board invariant
    pub fn from_lanes(lanes: Vec<Lane>) -> Result<Self> {
        let board = Self {
            lanes: lanes.into_iter().map(Arc::new).collect(),
        };
        board.check_invariants()?;
        Ok(board)
    }

    pub fn lanes(&self) -> impl Iterator<Item = &Lane> {
        self.lanes.iter().map(|l| l.as_ref())
    }

    pub fn lane(&self, id: LaneId) -> Option<&Lane> {
        self.lanes().find(|l| l.id == id)
    }

    pub fn card_count(&self) -> usize {
        self.lanes().map(|l| l.cards.len()).sum()
    }

    /// Locates a card anywhere on the board
    pub fn find_card(&self, card_id: &CardId) -> Option<CardLocation> {
        self.lanes().find_map(|lane| {
            lane.position_of(card_id).map(|index| CardLocation {
                lane: lane.id,
                index,
            })
        })
    }

    pub fn card(&self, card_id: &CardId) -> Option<&Card> {
        self.lanes()
            .flat_map(|l| l.cards.iter())
            .find(|c| &c.id == card_id)
    }

    /// Verifies the fixed lane set, board-wide id uniqueness and that every
    /// card's status names the lane holding it
    pub fn check_invariants(&self) -> Result<()> {
        let mut lane_ids: Vec<LaneId> = self.lanes().map(|l| l.id).collect();
        lane_ids.sort();
        if lane_ids != LaneId::ALL {
            return Err(KanbanError::InvalidBoard(format!(
                "board must hold exactly the lanes Todo, InProgress and Done, found {:?}",
                lane_ids
            )));
        }

        let mut seen = HashSet::new();
        for lane in self.lanes() {
            for card in &lane.cards {
                if !seen.insert(&card.id) {
                    return Err(KanbanError::InvalidBoard(format!(
                        "duplicate card id {}",
                        card.id
                    )));
                }
                if card.status != lane.id {
                    return Err(KanbanError::InvalidBoard(format!(
                        "card {} has status {} but sits in lane {}",
                        card.id, card.status, lane.id
                    )));
                }
            }
        }

        Ok(())
    }

    fn lane_index(&self, id: LaneId) -> Result<usize> {
        self.lanes
            .iter()
            .position(|l| l.id == id)
            .ok_or(KanbanError::LaneNotFound(id))
    }

    /// Returns a copy of this board with the lanes at the given indices
    /// replaced. Every other lane is shared.
    fn replace_lanes(&self, replacements: Vec<(usize, Lane)>) -> Self {
        let mut lanes = self.lanes.clone();
        for (index, lane) in replacements {
            lanes[index] = Arc::new(lane);
        }
        Self { lanes }
    }

    /// Appends a new card to the end of the To do lane
    pub fn create_card(&self, input: CardInput) -> Result<Self> {
        let mut errors = ValidationErrors::new();
        errors.require(Field::Title, &input.title);
        errors.require(Field::Description, &input.description);
        errors.into_result()?;

        let index = self.lane_index(LaneId::Todo)?;
        let mut lane = self.lanes[index].as_ref().clone();

        let mut card = Card::new(input, LaneId::Todo);
        while self.find_card(&card.id).is_some() {
            card.id = CardId::generate();
        }

        tracing::debug!(card_id = %card.id, "creating card");
        lane.cards.push(card);
        Ok(self.replace_lanes(vec![(index, lane)]))
    }

    /// Merges `patch` into an existing card. Id, status and position are kept.
    pub fn edit_card(&self, card_id: &CardId, patch: CardPatch) -> Result<Self> {
        let mut errors = ValidationErrors::new();
        if let Some(title) = &patch.title {
            errors.require(Field::Title, title);
        }
        if let Some(description) = &patch.description {
            errors.require(Field::Description, description);
        }
        errors.into_result()?;

        let location = self
            .find_card(card_id)
            .ok_or_else(|| KanbanError::card_not_found(card_id))?;
        let index = self.lane_index(location.lane)?;
        let mut lane = self.lanes[index].as_ref().clone();

        tracing::debug!(card_id = %card_id, lane = %location.lane, "editing card");
        lane.cards[location.index].apply(patch);
        Ok(self.replace_lanes(vec![(index, lane)]))
    }

    /// Removes a card from the given lane; later cards shift left
    pub fn delete_card(&self, card_id: &CardId, lane_id: LaneId) -> Result<Self> {
        let index = self.lane_index(lane_id)?;
        let position = self.lanes[index]
            .position_of(card_id)
            .ok_or_else(|| KanbanError::card_not_in_lane(card_id, lane_id))?;

        let mut lane = self.lanes[index].as_ref().clone();
        lane.cards.remove(position);

        tracing::debug!(card_id = %card_id, lane = %lane_id, "deleted card");
        Ok(self.replace_lanes(vec![(index, lane)]))
    }

    /// Moves a card to `target_index` of `target`, both expressed in
    /// canonical (unfiltered) positions.
    ///
    /// The card is removed first and then inserted, so within one lane a move
    /// to an index at or past the card's old slot lands one slot earlier than
    /// the raw index. An index past the end appends. Moving across lanes
    /// updates the card's status.
    pub fn move_card(
        &self,
        card_id: &CardId,
        source: LaneId,
        target: LaneId,
        target_index: usize,
    ) -> Result<Self> {
        let source_index = self.lane_index(source)?;
        let target_lane_index = self.lane_index(target)?;
        let position = self.lanes[source_index]
            .position_of(card_id)
            .ok_or_else(|| KanbanError::card_not_in_lane(card_id, source))?;

        let mut source_lane = self.lanes[source_index].as_ref().clone();
        let mut card = source_lane.cards.remove(position);

        tracing::debug!(
            card_id = %card_id,
            from = %source,
            to = %target,
            index = target_index,
            "moving card"
        );

        if source == target {
            let insert_at = target_index.min(source_lane.cards.len());
            source_lane.cards.insert(insert_at, card);
            return Ok(self.replace_lanes(vec![(source_index, source_lane)]));
        }

        let mut target_lane = self.lanes[target_lane_index].as_ref().clone();
        card.status = target;
        let insert_at = target_index.min(target_lane.cards.len());
        target_lane.cards.insert(insert_at, card);

        Ok(self.replace_lanes(vec![
            (source_index, source_lane),
            (target_lane_index, target_lane),
        ]))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(&BoardConfig::default())
    }
}
