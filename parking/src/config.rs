//! Search configuration.
//!
//! The defaults reproduce the plain behaviour: neighbors are always visited up, right, down, left
//! and occupied cells never block the traversal.

use serde::{Deserialize, Serialize};

/// The order in which the four neighbors of a cell are expanded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum NeighborOrder {
    /// Always up, right, down, left
    #[default]
    Fixed,
    /// Shuffled on every expansion, reproducible for a given seed
    Shuffled { seed: u64 },
}

/// Which cells the traversal is allowed to move through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Passage {
    /// Occupied cells are walked through like empty ones
    #[default]
    Unrestricted,
    /// Occupied cells can be reached but are never expanded. The start cell is always expanded.
    OpenCellsOnly,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)] // missing fields fall back to the defaults above
pub struct SearchConfig {
    pub neighbor_order: NeighborOrder,
    pub passage: Passage,
}

impl SearchConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.neighbor_order = NeighborOrder::Shuffled { seed };
        self
    }

    pub fn with_passage(mut self, passage: Passage) -> Self {
        self.passage = passage;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(SearchConfig::from_json("{}").unwrap(), SearchConfig::default());
    }

    #[test]
    fn test_json_fields() {
        let config = SearchConfig::from_json(
            r#"{ "neighbor_order": { "kind": "shuffled", "seed": 42 }, "passage": "open_cells_only" }"#,
        )
        .unwrap();

        assert_eq!(config.neighbor_order, NeighborOrder::Shuffled { seed: 42 });
        assert_eq!(config.passage, Passage::OpenCellsOnly);
        assert_eq!(
            config,
            SearchConfig::default()
                .with_seed(42)
                .with_passage(Passage::OpenCellsOnly)
        );
    }

    #[test]
    fn test_rejects_unknown_passage() {
        assert!(SearchConfig::from_json(r#"{ "passage": "diagonal" }"#).is_err());
    }
}
