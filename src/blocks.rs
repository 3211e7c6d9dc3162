// File: src/blocks.rs
// Recent-blocks table: row list and per-column formatting

use serde::{Deserialize, Serialize};

use crate::data_models::BlockRecord;
use crate::format::unix_to_short_date;
use crate::navigation::Route;

/// A block record as it sits in the table
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRow {
    pub record: BlockRecord,
    pub is_finished: bool,
}

/// Unfinished headers first, then finished blocks tagged as finished.
/// No deduplication or reordering.
pub fn concat_rows(unfinished: &[BlockRecord], finished: &[BlockRecord]) -> Vec<BlockRow> {
    unfinished
        .iter()
        .map(|record| BlockRow {
            record: record.clone(),
            is_finished: false,
        })
        .chain(finished.iter().map(|record| BlockRow {
            record: record.clone(),
            is_finished: true,
        }))
        .collect()
}

/// Status dot next to the hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DotColor {
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashCell {
    pub hash: String,
    pub dot: DotColor,
    pub tooltip: String,
}

/// Height column value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "height", rename_all = "snake_case")]
pub enum HeightCell {
    /// In-progress header height, if the header carries one
    Unfinished(Option<u64>),
    /// Finished record without a foliage block
    SubBlock(u64),
    /// Finished full block
    Block(u64),
    /// Finished record without a reward chain sub-block
    Missing,
}

impl HeightCell {
    pub fn is_italic(&self) -> bool {
        matches!(self, HeightCell::Unfinished(_) | HeightCell::SubBlock(_))
    }

    pub fn display(&self) -> String {
        match self {
            HeightCell::Unfinished(Some(height))
            | HeightCell::SubBlock(height)
            | HeightCell::Block(height) => height.to_string(),
            HeightCell::Unfinished(None) | HeightCell::Missing => "-".to_string(),
        }
    }
}

impl BlockRow {
    pub fn hash_cell(&self) -> HashCell {
        let hash = if self.is_finished {
            self.record.header_hash.clone()
        } else {
            self.record
                .foliage_sub_block
                .as_ref()
                .and_then(|sub| sub.foliage_block_hash.clone())
        };

        HashCell {
            hash: hash.unwrap_or_default(),
            dot: if self.is_finished { DotColor::Success } else { DotColor::Warning },
            tooltip: if self.is_finished { "Finished" } else { "In Progress" }.to_string(),
        }
    }

    pub fn height_cell(&self) -> HeightCell {
        let record = &self.record;
        if !self.is_finished {
            return HeightCell::Unfinished(record.foliage_sub_block.as_ref().and_then(|sub| sub.height));
        }

        match (&record.foliage_block, &record.reward_chain_sub_block) {
            (_, None) => HeightCell::Missing,
            (None, Some(reward)) => HeightCell::SubBlock(reward.height),
            (Some(_), Some(reward)) => HeightCell::Block(reward.height),
        }
    }

    pub fn time_cell(&self) -> String {
        unix_to_short_date(self.record.foliage_block.as_ref().and_then(|foliage| foliage.timestamp))
    }

    pub fn state_label(&self) -> &'static str {
        if self.is_finished { "Finished" } else { "Unfinished" }
    }

    /// Whether a block page for `hash` refers to this row. Finished rows match
    /// on `header_hash`, unfinished ones on their foliage block hash; an empty
    /// hash never matches.
    pub fn matches_hash(&self, hash: &str) -> bool {
        if hash.is_empty() {
            return false;
        }
        let key = if self.is_finished {
            self.record.header_hash.as_deref()
        } else {
            self.record
                .foliage_sub_block
                .as_ref()
                .and_then(|sub| sub.foliage_block_hash.as_deref())
        };
        key == Some(hash)
    }

    /// Route opened by clicking this row; unfinished rows go nowhere
    pub fn click_route(&self) -> Option<Route> {
        if !self.is_finished {
            return None;
        }
        self.record
            .header_hash
            .as_ref()
            .filter(|hash| !hash.is_empty())
            .map(|hash| Route::Block(hash.clone()))
    }
}
