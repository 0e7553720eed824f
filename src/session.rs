use crate::{
    domain::{
        apply_drop, project, Board, Card, CardId, CardInput, CardPatch, DropEvent, FilteredBoard,
        LaneId,
    },
    editor::{self, ConfirmationGate, FormState, PendingDeletion},
    error::Result,
    storage::{BoardStore, KeyValueStore},
};

/// Sole owner of the live board.
///
/// Every mutation goes through `&mut self`, so only one can run at a time.
/// A successful mutation replaces the board immediately, then writes it
/// through the store; a failed write is logged and the in-memory board
/// stays current. Failed operations leave the board untouched.
pub struct BoardSession<S> {
    store: BoardStore<S>,
    board: Board,
    search_term: String,
    view: FilteredBoard,
}

impl<S: KeyValueStore> BoardSession<S> {
    /// Loads the stored board, or starts from the configured default
    pub async fn open(store: BoardStore<S>) -> Result<Self> {
        let board = store.load().await?;
        let view = project(&board, "");
        tracing::debug!(cards = board.card_count(), "board session opened");
        Ok(Self {
            store,
            board,
            search_term: String::new(),
            view,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// What should be on screen right now
    pub fn view(&self) -> &FilteredBoard {
        &self.view
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Looks up the card behind a click
    pub fn card(&self, card_id: &CardId) -> Option<&Card> {
        self.board.card(card_id)
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.view = project(&self.board, &self.search_term);
    }

    pub async fn create_card(&mut self, input: CardInput) -> Result<()> {
        let next = self.board.create_card(input)?;
        self.commit(next).await;
        Ok(())
    }

    pub async fn edit_card(&mut self, card_id: &CardId, patch: CardPatch) -> Result<()> {
        let next = self.board.edit_card(card_id, patch)?;
        self.commit(next).await;
        Ok(())
    }

    /// Moves a card using canonical indices
    pub async fn move_card(
        &mut self,
        card_id: &CardId,
        source: LaneId,
        target: LaneId,
        target_index: usize,
    ) -> Result<()> {
        let next = self.board.move_card(card_id, source, target, target_index)?;
        self.commit(next).await;
        Ok(())
    }

    /// Applies a drop reported against the current view
    pub async fn drop_card(&mut self, drop: &DropEvent) -> Result<()> {
        let next = apply_drop(&self.board, &self.view, drop)?;
        if next == self.board {
            return Ok(());
        }
        self.commit(next).await;
        Ok(())
    }

    /// Submits the card form, creating a card or editing `existing`
    pub async fn submit_form(&mut self, form: &FormState, existing: Option<&CardId>) -> Result<()> {
        let next = editor::submit(form, existing, &self.board)?;
        self.commit(next).await;
        Ok(())
    }

    /// Deletes a card if `gate` confirms it
    pub async fn delete_card(
        &mut self,
        card_id: &CardId,
        lane: LaneId,
        gate: impl ConfirmationGate,
    ) -> Result<()> {
        let next = editor::confirm_delete(card_id, lane, &self.board, gate)?;
        if next == self.board {
            return Ok(());
        }
        self.commit(next).await;
        Ok(())
    }

    /// Completes a two-step deletion
    pub async fn confirm_delete(&mut self, pending: PendingDeletion) -> Result<()> {
        let next = pending.confirm(&self.board)?;
        self.commit(next).await;
        Ok(())
    }

    /// Drops the stored board and starts over from the configured default.
    /// The search term is kept.
    pub async fn reset(&mut self) -> Result<()> {
        self.board = self.store.clear().await?;
        self.view = project(&self.board, &self.search_term);
        Ok(())
    }

    async fn commit(&mut self, next: Board) {
        self.board = next;
        self.view = project(&self.board, &self.search_term);
        self.store.persist(&self.board).await;
    }
}
