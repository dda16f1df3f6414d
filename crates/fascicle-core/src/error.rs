//! Error types for tract indexing, chunk planning, and buffer assembly.

use std::fmt;

/// What kind of index a [`TractError::IndexOutOfRange`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// A tract id into the offset table.
    Tract,
    /// A chunk index into a region's chunk set.
    Chunk,
    /// A vertex index into the global vertex array.
    Vertex,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndexKind::Tract => "tract",
            IndexKind::Chunk => "chunk",
            IndexKind::Vertex => "vertex",
        };
        f.write_str(name)
    }
}

/// Errors reported by a [`crate::VertexSource`].
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The backing storage could not be opened or read.
    #[error("vertex source I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The requested half-open range is not inside the source.
    #[error("vertex range {start}..{end} out of bounds for {len} vertices")]
    RangeOutOfBounds {
        /// First requested vertex.
        start: u64,
        /// One past the last requested vertex.
        end: u64,
        /// Vertices available in the source.
        len: u64,
    },
}

/// Errors surfaced by the tract chunking core.
///
/// Every error is reported at the point of detection. No operation returns a
/// partial result alongside an error.
#[derive(Debug, thiserror::Error)]
pub enum TractError {
    /// A single tract has at least as many vertices as the per-chunk limit and
    /// cannot be placed in any chunk.
    #[error("tract {tract} has {len} vertices, at or above the chunk limit of {limit}")]
    OversizedTract {
        /// Offending tract id.
        tract: usize,
        /// Vertex count of that tract.
        len: u64,
        /// Active per-chunk vertex limit.
        limit: u32,
    },

    /// A tract id, chunk index, or vertex range fell outside valid bounds.
    #[error("{kind} index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Which table the index addresses.
        kind: IndexKind,
        /// The rejected index.
        index: u64,
        /// Length of the addressed table.
        len: u64,
    },

    /// The vertex source failed for a reason other than a bad range.
    #[error("vertex source unavailable: {0}")]
    SourceUnavailable(#[source] SourceError),

    /// The offset or region-label tables are malformed.
    #[error("invalid tract dataset: {0}")]
    InvalidDataset(String),

    /// The vertex source holds fewer vertices than the offset table addresses.
    #[error("vertex source holds {actual} vertices, offset table needs {expected}")]
    VertexCountMismatch {
        /// Final entry of the offset table.
        expected: u64,
        /// Vertices reported by the source.
        actual: u64,
    },

    /// A chunk is too large to be addressed with 16-bit indices.
    #[error("chunk of {vertices} vertices cannot be indexed with u16")]
    ChunkExceedsIndexRange {
        /// Total vertices in the chunk.
        vertices: u64,
    },
}

impl From<SourceError> for TractError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::RangeOutOfBounds { end, len, .. } => TractError::IndexOutOfRange {
                kind: IndexKind::Vertex,
                index: end,
                len,
            },
            other => TractError::SourceUnavailable(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_error_maps_to_index_out_of_range() {
        let err: TractError = SourceError::RangeOutOfBounds {
            start: 4,
            end: 12,
            len: 10,
        }
        .into();
        assert!(matches!(
            err,
            TractError::IndexOutOfRange {
                kind: IndexKind::Vertex,
                index: 12,
                len: 10
            }
        ));
    }

    #[test]
    fn test_io_error_maps_to_source_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: TractError = SourceError::from(io).into();
        assert!(matches!(err, TractError::SourceUnavailable(SourceError::Io(_))));
    }

    #[test]
    fn test_display_names_index_kind() {
        let err = TractError::IndexOutOfRange {
            kind: IndexKind::Chunk,
            index: 3,
            len: 2,
        };
        assert_eq!(err.to_string(), "chunk index 3 out of range (len 2)");
    }
}
