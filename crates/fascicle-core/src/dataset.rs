//! Serializable tract dataset descriptor persisted as `tracts.ron`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TractError;
use crate::index::{RegionId, TractIndex};

/// File name of the dataset descriptor inside a dataset directory.
pub const DATASET_FILE: &str = "tracts.ron";

/// File name of the vertex array inside a dataset directory.
pub const VERTICES_FILE: &str = "vertices.bin";

/// Errors that can occur when loading or saving a [`TractDataset`].
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Failed to read the descriptor from disk.
    #[error("failed to read dataset: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to write the descriptor to disk.
    #[error("failed to write dataset: {0}")]
    WriteError(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse dataset: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// Failed to serialize the descriptor to RON.
    #[error("failed to serialize dataset: {0}")]
    SerializeError(#[source] ron::Error),
}

/// Tract-offset and region-label tables of a tractography dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TractDataset {
    /// `N + 1` vertex offsets; tract `i` spans `[start[i], start[i + 1])`.
    pub tract_start_idx: Vec<u64>,
    /// Region id of each of the `N` tracts.
    pub tract_region: Vec<RegionId>,
}

impl TractDataset {
    /// Build a descriptor from per-tract vertex counts and region labels.
    pub fn from_lengths(lengths: &[u64], regions: Vec<RegionId>) -> Self {
        let mut tract_start_idx = Vec::with_capacity(lengths.len() + 1);
        let mut offset = 0;
        tract_start_idx.push(offset);
        for len in lengths {
            offset += len;
            tract_start_idx.push(offset);
        }
        Self {
            tract_start_idx,
            tract_region: regions,
        }
    }

    /// Validate the tables and turn them into a [`TractIndex`].
    pub fn into_index(self) -> Result<TractIndex, TractError> {
        TractIndex::new(self.tract_start_idx, self.tract_region)
    }

    /// Load `tracts.ron` from `dir`.
    pub fn load(dir: &Path) -> Result<Self, DatasetError> {
        let path = dir.join(DATASET_FILE);
        let contents = std::fs::read_to_string(&path).map_err(DatasetError::ReadError)?;
        let dataset: TractDataset = ron::from_str(&contents).map_err(DatasetError::ParseError)?;
        tracing::info!(
            path = %path.display(),
            tracts = dataset.tract_region.len(),
            "loaded tract dataset"
        );
        Ok(dataset)
    }

    /// Save as `tracts.ron` inside `dir`, creating the directory if needed.
    pub fn save(&self, dir: &Path) -> Result<(), DatasetError> {
        std::fs::create_dir_all(dir).map_err(DatasetError::WriteError)?;
        let serialized = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())
            .map_err(DatasetError::SerializeError)?;
        std::fs::write(dir.join(DATASET_FILE), serialized).map_err(DatasetError::WriteError)?;
        Ok(())
    }
}

impl From<&TractIndex> for TractDataset {
    fn from(index: &TractIndex) -> Self {
        Self {
            tract_start_idx: index.offsets().to_vec(),
            tract_region: index.labels().to_vec(),
        }
    }
}
