//! Tract chunking: splits fiber-tract polylines into draw-call sized chunks and
//! assembles the flat vertex buffers and line-start tables a renderer uploads.

pub mod buffer;
pub mod chunker;
pub mod dataset;
pub mod error;
pub mod index;
pub mod planner;
pub mod source;
pub mod vertex;

pub use buffer::{
    build_line_indices, build_line_starts, build_vertex_buffer, flatten_vertices, vertex_bytes,
};
pub use chunker::TractChunker;
pub use dataset::{DATASET_FILE, DatasetError, TractDataset, VERTICES_FILE};
pub use error::{IndexKind, SourceError, TractError};
pub use index::{RegionId, TractId, TractIndex};
pub use planner::{Chunk, ChunkPlanner, DEFAULT_VERTEX_LIMIT};
pub use source::{FileVertexSource, MemoryVertexSource, VertexSource, write_vertex_file};
pub use vertex::TractVertex;
