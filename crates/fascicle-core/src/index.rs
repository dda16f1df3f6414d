//! Read-only view over a dataset's tract-offset table and region labels.

use std::collections::BTreeSet;
use std::ops::Range;

use crate::error::{IndexKind, TractError};

/// Index of a tract in the offset table.
pub type TractId = usize;

/// Region label attached to each tract.
pub type RegionId = i32;

/// Tract-offset table plus per-tract region labels.
///
/// Tract `i` occupies vertices `offsets[i]..offsets[i + 1]` of the global
/// vertex array. Both tables are validated once at construction and never
/// change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TractIndex {
    offsets: Vec<u64>,
    labels: Vec<RegionId>,
}

impl TractIndex {
    /// Build an index from an `N + 1` entry offset table and `N` region labels.
    ///
    /// # Errors
    ///
    /// Returns [`TractError::InvalidDataset`] if the offset table is empty,
    /// decreases anywhere, or does not have exactly one more entry than the
    /// label table.
    pub fn new(offsets: Vec<u64>, labels: Vec<RegionId>) -> Result<Self, TractError> {
        if offsets.is_empty() {
            return Err(TractError::InvalidDataset(
                "offset table must contain at least one entry".to_string(),
            ));
        }
        if let Some(i) = offsets.windows(2).position(|w| w[0] > w[1]) {
            return Err(TractError::InvalidDataset(format!(
                "offset table decreases at entry {}: {} > {}",
                i + 1,
                offsets[i],
                offsets[i + 1]
            )));
        }
        if labels.len() + 1 != offsets.len() {
            return Err(TractError::InvalidDataset(format!(
                "{} region labels for {} tracts",
                labels.len(),
                offsets.len() - 1
            )));
        }
        Ok(Self { offsets, labels })
    }

    /// Number of tracts.
    pub fn tract_count(&self) -> usize {
        self.labels.len()
    }

    /// Total number of vertices addressed by the offset table.
    pub fn vertex_count(&self) -> u64 {
        // Non-empty by construction.
        self.offsets[self.offsets.len() - 1]
    }

    /// All tract ids labelled `region`, ascending. Unknown regions yield an
    /// empty list.
    pub fn tracts_in_region(&self, region: RegionId) -> Vec<TractId> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == region)
            .map(|(tract, _)| tract)
            .collect()
    }

    /// Half-open vertex range of `tract` in the global vertex array.
    pub fn tract_range(&self, tract: TractId) -> Result<Range<u64>, TractError> {
        if tract >= self.tract_count() {
            return Err(TractError::IndexOutOfRange {
                kind: IndexKind::Tract,
                index: tract as u64,
                len: self.tract_count() as u64,
            });
        }
        Ok(self.offsets[tract]..self.offsets[tract + 1])
    }

    /// Number of vertices in `tract`.
    pub fn tract_len(&self, tract: TractId) -> Result<u64, TractError> {
        let range = self.tract_range(tract)?;
        Ok(range.end - range.start)
    }

    /// Region label of `tract`.
    pub fn region_of(&self, tract: TractId) -> Result<RegionId, TractError> {
        self.labels
            .get(tract)
            .copied()
            .ok_or(TractError::IndexOutOfRange {
                kind: IndexKind::Tract,
                index: tract as u64,
                len: self.tract_count() as u64,
            })
    }

    /// Distinct region ids present in the dataset, ascending.
    pub fn regions(&self) -> Vec<RegionId> {
        self.labels
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The raw offset table.
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// The raw region-label table.
    pub fn labels(&self) -> &[RegionId] {
        &self.labels
    }
}
