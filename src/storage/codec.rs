//! Blob format for a stored board: the board as JSON, base64-encoded so the
//! payload is plain ASCII.

use crate::{
    domain::Board,
    error::{KanbanError, Result},
};
use base64::{engine::general_purpose::STANDARD, Engine};

pub fn encode(board: &Board) -> Result<String> {
    let json = serde_json::to_string(board)?;
    Ok(STANDARD.encode(json))
}

/// Decodes a stored blob, rejecting boards that break the lane or card
/// invariants
pub fn decode(blob: &str) -> Result<Board> {
    let bytes = STANDARD.decode(blob.trim())?;
    let board: Board = serde_json::from_slice(&bytes)?;
    board
        .check_invariants()
        .map_err(|e| KanbanError::StorageError(format!("stored board rejected: {}", e)))?;
    Ok(board)
}
