pub mod board;
pub mod card;
pub mod filter;
pub mod reconcile;

pub use board::{Board, CardLocation, Lane};
pub use card::{Card, CardId, CardInput, CardPatch, CardStatus, CardTag, LaneId};
pub use filter::{project, FilteredBoard, FilteredLane};
pub use reconcile::{apply_drop, resolve_drop, DropEvent, DropResolution};
