//! Consumer-facing surface: chunk counts, vertex buffers, and line starts per
//! region, recomputed on every call.

use crate::buffer::{build_line_indices, build_line_starts, build_vertex_buffer, flatten_vertices};
use crate::error::{IndexKind, TractError};
use crate::index::{RegionId, TractId, TractIndex};
use crate::planner::{Chunk, ChunkPlanner};
use crate::source::VertexSource;
use crate::vertex::TractVertex;

/// Serves draw-call sized tract chunks out of a dataset and a vertex source.
///
/// Nothing is cached between calls. Operations that read vertices take
/// `&mut self` because they drive the source; the rest only need `&self`.
pub struct TractChunker<S> {
    index: TractIndex,
    planner: ChunkPlanner,
    source: S,
}

impl<S: VertexSource> TractChunker<S> {
    /// Create a chunker using the default 16-bit vertex limit.
    pub fn new(index: TractIndex, source: S) -> Result<Self, TractError> {
        Self::with_planner(index, ChunkPlanner::new(), source)
    }

    /// Create a chunker with an explicit planner.
    ///
    /// # Errors
    ///
    /// Returns [`TractError::VertexCountMismatch`] if `source` holds fewer
    /// vertices than the offset table addresses.
    pub fn with_planner(
        index: TractIndex,
        planner: ChunkPlanner,
        source: S,
    ) -> Result<Self, TractError> {
        let expected = index.vertex_count();
        let actual = source.vertex_count();
        if actual < expected {
            return Err(TractError::VertexCountMismatch { expected, actual });
        }
        Ok(Self {
            index,
            planner,
            source,
        })
    }

    /// The underlying tract index.
    pub fn index(&self) -> &TractIndex {
        &self.index
    }

    /// The planner in use.
    pub fn planner(&self) -> &ChunkPlanner {
        &self.planner
    }

    /// The vertex source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Consume the chunker, returning the vertex source.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Distinct region ids in the dataset, ascending.
    pub fn regions(&self) -> Vec<RegionId> {
        self.index.regions()
    }

    /// Planned chunks for `region`.
    pub fn chunks(&self, region: RegionId) -> Result<Vec<Chunk>, TractError> {
        self.planner.plan_chunks(&self.index, region)
    }

    /// Number of chunks `region` splits into. Zero for an empty region.
    pub fn chunk_count(&self, region: RegionId) -> Result<usize, TractError> {
        Ok(self.chunks(region)?.len())
    }

    /// Vertices of chunk `chunk_index` of `region`, concatenated in tract order.
    pub fn chunk_vertices(
        &mut self,
        region: RegionId,
        chunk_index: usize,
    ) -> Result<Vec<TractVertex>, TractError> {
        let chunk = self.chunk(region, chunk_index)?;
        build_vertex_buffer(chunk.tract_ids(), &self.index, &mut self.source)
    }

    /// Flattened `[x, y, z, ...]` vertex buffer of chunk `chunk_index` of
    /// `region`, ready for upload.
    pub fn vertex_buffer(
        &mut self,
        region: RegionId,
        chunk_index: usize,
    ) -> Result<Vec<f32>, TractError> {
        let vertices = self.chunk_vertices(region, chunk_index)?;
        Ok(flatten_vertices(&vertices))
    }

    /// One line-start table per chunk of `region`, in chunk order.
    pub fn line_starts(&self, region: RegionId) -> Result<Vec<Vec<u32>>, TractError> {
        self.chunks(region)?
            .iter()
            .map(|chunk| build_line_starts(chunk.tract_ids(), &self.index))
            .collect()
    }

    /// Line-list element indices for chunk `chunk_index` of `region`.
    pub fn line_indices(
        &self,
        region: RegionId,
        chunk_index: usize,
    ) -> Result<Vec<u16>, TractError> {
        let chunk = self.chunk(region, chunk_index)?;
        let starts = build_line_starts(chunk.tract_ids(), &self.index)?;
        build_line_indices(&starts)
    }

    /// Vertices of a single tract.
    pub fn tract_vertices(&mut self, tract: TractId) -> Result<Vec<TractVertex>, TractError> {
        build_vertex_buffer(&[tract], &self.index, &mut self.source)
    }

    fn chunk(&self, region: RegionId, chunk_index: usize) -> Result<Chunk, TractError> {
        let mut chunks = self.chunks(region)?;
        if chunk_index >= chunks.len() {
            return Err(TractError::IndexOutOfRange {
                kind: IndexKind::Chunk,
                index: chunk_index as u64,
                len: chunks.len() as u64,
            });
        }
        Ok(chunks.swap_remove(chunk_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::DEFAULT_VERTEX_LIMIT;
    use crate::source::MemoryVertexSource;

    fn ramp(n: u64) -> MemoryVertexSource {
        MemoryVertexSource::new(
            (0..n)
                .map(|i| TractVertex::new(i as f32, 0.0, 0.0))
                .collect(),
        )
    }

    fn small() -> TractChunker<MemoryVertexSource> {
        let index = TractIndex::new(vec![0, 3, 3, 10], vec![5, 5, 5]).unwrap();
        TractChunker::with_planner(index, ChunkPlanner::with_limit(8), ramp(10)).unwrap()
    }

    #[test]
    fn test_chunk_count() {
        let chunker = small();
        assert_eq!(chunker.chunk_count(5).unwrap(), 2);
        assert_eq!(chunker.chunk_count(0).unwrap(), 0);
    }

    #[test]
    fn test_vertex_buffer_per_chunk() {
        let mut chunker = small();
        let first = chunker.vertex_buffer(5, 0).unwrap();
        assert_eq!(first, vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0]);
        let second = chunker.vertex_buffer(5, 1).unwrap();
        assert_eq!(second.len(), 7 * 3);
        assert_eq!(second[0], 3.0);
        assert_eq!(chunker.source().release_count(), 2);
    }

    #[test]
    fn test_chunk_index_out_of_range() {
        let mut chunker = small();
        assert!(matches!(
            chunker.vertex_buffer(5, 2),
            Err(TractError::IndexOutOfRange {
                kind: IndexKind::Chunk,
                index: 2,
                len: 2
            })
        ));
        assert!(matches!(
            chunker.vertex_buffer(42, 0),
            Err(TractError::IndexOutOfRange {
                kind: IndexKind::Chunk,
                index: 0,
                len: 0
            })
        ));
        // Rejected before any vertex was touched.
        assert_eq!(chunker.source().fetch_count(), 0);
    }

    #[test]
    fn test_line_starts_per_chunk() {
        let chunker = small();
        assert_eq!(chunker.line_starts(5).unwrap(), vec![vec![0, 3, 3], vec![0, 7]]);
        assert!(chunker.line_starts(1).unwrap().is_empty());
    }

    #[test]
    fn test_buffers_agree_with_line_starts() {
        let mut chunker = small();
        let starts = chunker.line_starts(5).unwrap();
        for (i, table) in starts.iter().enumerate() {
            let buffer = chunker.vertex_buffer(5, i).unwrap();
            assert_eq!(
                buffer.len(),
                *table.last().unwrap() as usize * TractVertex::COMPONENTS
            );
        }
    }

    #[test]
    fn test_line_indices() {
        let chunker = small();
        assert_eq!(chunker.line_indices(5, 0).unwrap(), vec![0, 1, 1, 2]);
        assert_eq!(chunker.line_indices(5, 1).unwrap().len(), 12);
    }

    #[test]
    fn test_tract_vertices() {
        let mut chunker = small();
        let tract = chunker.tract_vertices(2).unwrap();
        assert_eq!(tract.len(), 7);
        assert_eq!(tract[6].position[0], 9.0);
        assert!(chunker.tract_vertices(1).unwrap().is_empty());
        assert!(chunker.tract_vertices(3).is_err());
    }

    #[test]
    fn test_source_too_small_rejected() {
        let index = TractIndex::new(vec![0, 3, 3, 10], vec![5, 5, 5]).unwrap();
        assert!(matches!(
            TractChunker::new(index, ramp(9)),
            Err(TractError::VertexCountMismatch {
                expected: 10,
                actual: 9
            })
        ));
    }

    #[test]
    fn test_oversized_tract_surfaces_from_every_operation() {
        let index = TractIndex::new(vec![0, 10, 70_000], vec![1, 1]).unwrap();
        let mut chunker = TractChunker::new(index, ramp(70_000)).unwrap();
        assert_eq!(chunker.planner().limit(), DEFAULT_VERTEX_LIMIT);
        assert!(matches!(
            chunker.chunk_count(1),
            Err(TractError::OversizedTract { tract: 1, .. })
        ));
        assert!(chunker.line_starts(1).is_err());
        assert!(chunker.vertex_buffer(1, 0).is_err());
        assert_eq!(chunker.source().fetch_count(), 0);
    }

    #[test]
    fn test_regions() {
        let index = TractIndex::new(vec![0, 1, 2, 3], vec![9, -1, 9]).unwrap();
        let chunker = TractChunker::new(index, ramp(3)).unwrap();
        assert_eq!(chunker.regions(), vec![-1, 9]);
    }
}
