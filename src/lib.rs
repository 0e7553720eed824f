//! # Kanban Board Core
//!
//! Board state, search projection, drag-and-drop reconciliation and
//! persistence for a single-user kanban board with fixed lanes.
//!
//! Every board operation takes the current [`Board`] and returns a new one.
//! Rendering, forms and dialogs live outside this crate and drive it through
//! [`BoardSession`] or the free functions directly.

pub mod config;
pub mod domain;
pub mod editor;
pub mod error;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use config::{BoardConfig, LaneConfig};
pub use domain::{
    board::{Board, Lane},
    card::{Card, CardId, CardInput, CardPatch, CardStatus, CardTag, LaneId},
    filter::{project, FilteredBoard},
    reconcile::DropEvent,
};
pub use editor::{FormState, PendingDeletion};
pub use error::{KanbanError, Result};
pub use session::BoardSession;
pub use storage::{BoardStore, KeyValueStore};
