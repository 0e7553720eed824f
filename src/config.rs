use crate::{
    domain::LaneId,
    error::{KanbanError, Result},
};
use serde::{Deserialize, Serialize};

/// Display configuration for one of the fixed lanes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneConfig {
    pub id: LaneId,
    pub title: String,
    #[serde(default)]
    pub label: String,
}

impl LaneConfig {
    pub fn new(id: LaneId, title: String) -> Self {
        Self {
            id,
            title,
            label: String::new(),
        }
    }
}

/// Board configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Key the serialized board is stored under
    pub storage_key: String,
    pub lanes: Vec<LaneConfig>,
    /// Start a fresh board with a couple of example cards in To do
    pub seed_demo_cards: bool,
}

impl BoardConfig {
    pub const DEFAULT_STORAGE_KEY: &'static str = "kanban-board";

    /// Parses a JSON config; missing fields fall back to defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_demo_cards(mut self) -> Self {
        self.seed_demo_cards = true;
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Lanes are fixed: exactly Todo, InProgress and Done, each once
    pub fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(KanbanError::ConfigError(
                "storage_key must not be empty".to_string(),
            ));
        }

        let mut ids: Vec<LaneId> = self.lanes.iter().map(|l| l.id).collect();
        ids.sort();
        if ids != LaneId::ALL {
            return Err(KanbanError::ConfigError(format!(
                "lanes must be exactly Todo, InProgress and Done, got {:?}",
                self.lanes.iter().map(|l| l.id).collect::<Vec<_>>()
            )));
        }

        Ok(())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            storage_key: Self::DEFAULT_STORAGE_KEY.to_string(),
            lanes: LaneId::ALL
                .iter()
                .map(|id| LaneConfig::new(*id, id.default_title().to_string()))
                .collect(),
            seed_demo_cards: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BoardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.storage_key, "kanban-board");
        assert_eq!(config.lanes.len(), 3);
        assert_eq!(config.lanes[0].title, "To do");
        assert_eq!(config.lanes[1].title, "In progress");
        assert_eq!(config.lanes[2].title, "Done");
    }

    #[test]
    fn test_duplicate_lane_rejected() {
        let mut config = BoardConfig::default();
        config.lanes[2] = LaneConfig::new(LaneId::Todo, "Again".to_string());
        assert!(matches!(
            config.validate(),
            Err(KanbanError::ConfigError(_))
        ));
    }

    #[test]
    fn test_missing_lane_rejected() {
        let mut config = BoardConfig::default();
        config.lanes.pop();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reordered_lanes_allowed() {
        let mut config = BoardConfig::default();
        config.lanes.reverse();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = BoardConfig::from_json_str(r#"{"seed_demo_cards": true}"#).unwrap();
        assert!(config.seed_demo_cards);
        assert_eq!(config.storage_key, "kanban-board");
        assert_eq!(config.lanes.len(), 3);

        let config = BoardConfig::from_json_str(
            r#"{"lanes": [
                {"id": "Done", "title": "Shipped", "label": "0/0"},
                {"id": "Todo", "title": "Backlog"},
                {"id": "InProgress", "title": "Doing"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(config.lanes[0].title, "Shipped");
        assert_eq!(config.lanes[0].label, "0/0");
        assert_eq!(config.lanes[1].label, "");
    }

    #[test]
    fn test_from_json_rejects_bad_lanes() {
        let result = BoardConfig::from_json_str(r#"{"lanes": []}"#);
        assert!(result.is_err());

        let result = BoardConfig::from_json_str(r#"{"storage_key": ""}"#);
        assert!(result.is_err());
    }
}
