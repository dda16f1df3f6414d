//! Greedy, order-preserving partitioning of a region's tracts into chunks.
//!
//! A renderer using 16-bit element indices can address at most 65536 vertices
//! per draw call. The planner walks a region's tracts in dataset order and
//! packs whole tracts into chunks whose vertex total stays strictly below that
//! limit. A chunk is never reopened once closed, so tract order is preserved
//! within and across chunks. Packing density is not optimized.

use crate::error::TractError;
use crate::index::{RegionId, TractId, TractIndex};

/// Vertices addressable by one draw call with `u16` indices.
pub const DEFAULT_VERTEX_LIMIT: u32 = u16::MAX as u32 + 1;

/// An ordered group of whole tracts whose combined vertex count is below the
/// planner's limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk {
    tracts: Vec<TractId>,
    vertex_count: u32,
}

impl Chunk {
    /// Tract ids in this chunk, in dataset order.
    pub fn tract_ids(&self) -> &[TractId] {
        &self.tracts
    }

    /// Total vertices across all tracts in the chunk.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Number of tracts in the chunk.
    pub fn len(&self) -> usize {
        self.tracts.len()
    }

    /// Returns `true` if the chunk holds no tracts.
    pub fn is_empty(&self) -> bool {
        self.tracts.is_empty()
    }

    /// Consume the chunk, returning its tract ids.
    pub fn into_tract_ids(self) -> Vec<TractId> {
        self.tracts
    }
}

/// Splits tract sequences into [`Chunk`]s bounded by a vertex limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlanner {
    limit: u32,
}

impl ChunkPlanner {
    /// A planner using [`DEFAULT_VERTEX_LIMIT`].
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_VERTEX_LIMIT)
    }

    /// A planner with a custom exclusive per-chunk vertex limit.
    pub fn with_limit(limit: u32) -> Self {
        Self { limit }
    }

    /// The exclusive per-chunk vertex limit.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Plan the chunks for every tract labelled `region`.
    ///
    /// A region without tracts yields no chunks.
    pub fn plan_chunks(
        &self,
        index: &TractIndex,
        region: RegionId,
    ) -> Result<Vec<Chunk>, TractError> {
        let tracts = index.tracts_in_region(region);
        let chunks = self.plan_tracts(index, &tracts)?;
        tracing::debug!(
            region,
            tracts = tracts.len(),
            chunks = chunks.len(),
            limit = self.limit,
            "planned tract chunks"
        );
        Ok(chunks)
    }

    /// Plan chunks over an explicit tract sequence, keeping its order.
    ///
    /// # Errors
    ///
    /// Fails with [`TractError::OversizedTract`] as soon as a tract with at
    /// least `limit` vertices is met, and with
    /// [`TractError::IndexOutOfRange`] for an unknown tract id. Nothing is
    /// returned for the tracts planned before the failure.
    pub fn plan_tracts(
        &self,
        index: &TractIndex,
        tracts: &[TractId],
    ) -> Result<Vec<Chunk>, TractError> {
        let limit = u64::from(self.limit);
        let mut chunks = Vec::new();
        let mut current = Chunk::default();
        let mut count: u64 = 0;

        let mut i = 0;
        while i < tracts.len() {
            let tract = tracts[i];
            let len = index.tract_len(tract)?;
            if len >= limit {
                return Err(TractError::OversizedTract {
                    tract,
                    len,
                    limit: self.limit,
                });
            }

            if count + len < limit {
                count += len;
                current.tracts.push(tract);
                current.vertex_count = count as u32;
                i += 1;
            } else {
                // Close the chunk and retry this tract against an empty one.
                chunks.push(std::mem::take(&mut current));
                count = 0;
            }
        }

        if !current.is_empty() {
            chunks.push(current);
        }
        Ok(chunks)
    }
}

impl Default for ChunkPlanner {
    fn default() -> Self {
        Self::new()
    }
}
