//! Assembles per-chunk vertex buffers, line-start tables, and element indices.

use std::ops::{Deref, DerefMut};

use crate::error::{IndexKind, TractError};
use crate::index::{TractId, TractIndex};
use crate::source::VertexSource;
use crate::vertex::TractVertex;

/// Holds a vertex source for the duration of one request and releases it
/// exactly once when dropped, on success and on every error path.
struct ReleaseOnDrop<'a, S: VertexSource + ?Sized> {
    source: &'a mut S,
}

impl<S: VertexSource + ?Sized> Deref for ReleaseOnDrop<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.source
    }
}

impl<S: VertexSource + ?Sized> DerefMut for ReleaseOnDrop<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.source
    }
}

impl<S: VertexSource + ?Sized> Drop for ReleaseOnDrop<'_, S> {
    fn drop(&mut self) {
        self.source.release();
    }
}

/// Concatenate the vertices of `tracts`, in order, into one flat buffer.
///
/// Every range is checked against the source before anything is allocated.
/// The source is released once after the last range has been read, or as
/// soon as a lookup or fetch fails. An empty tract list produces an empty
/// buffer and still releases the source.
pub fn build_vertex_buffer<S: VertexSource + ?Sized>(
    tracts: &[TractId],
    index: &TractIndex,
    source: &mut S,
) -> Result<Vec<TractVertex>, TractError> {
    let mut source = ReleaseOnDrop { source };

    let ranges = tracts
        .iter()
        .map(|&t| index.tract_range(t))
        .collect::<Result<Vec<_>, _>>()?;
    let available = source.vertex_count();
    if let Some(range) = ranges.iter().find(|r| r.end > available) {
        return Err(TractError::IndexOutOfRange {
            kind: IndexKind::Vertex,
            index: range.end,
            len: available,
        });
    }
    let total: u64 = ranges.iter().map(|r| r.end - r.start).sum();

    let mut vertices = Vec::with_capacity(total.min(available) as usize);
    for range in ranges {
        vertices.extend(source.fetch_range(range)?);
    }

    tracing::trace!(
        tracts = tracts.len(),
        vertices = vertices.len(),
        "assembled chunk vertex buffer"
    );
    Ok(vertices)
}

/// Cumulative vertex offsets of `tracts` within their chunk buffer.
///
/// The result starts at 0 and has `tracts.len() + 1` entries; tract `k` of the
/// chunk spans `starts[k]..starts[k + 1]` of the buffer built by
/// [`build_vertex_buffer`].
pub fn build_line_starts(
    tracts: &[TractId],
    index: &TractIndex,
) -> Result<Vec<u32>, TractError> {
    let mut starts = Vec::with_capacity(tracts.len() + 1);
    let mut offset: u64 = 0;
    starts.push(0);
    for &tract in tracts {
        offset += index.tract_len(tract)?;
        let offset = u32::try_from(offset)
            .map_err(|_| TractError::ChunkExceedsIndexRange { vertices: offset })?;
        starts.push(offset);
    }
    Ok(starts)
}

/// Build a line-list element buffer from a chunk's line starts.
///
/// Each tract with `n` vertices contributes `n - 1` segments, two indices per
/// segment. Tracts never connect to their neighbours.
///
/// # Errors
///
/// Returns [`TractError::InvalidDataset`] if the table decreases, and
/// [`TractError::ChunkExceedsIndexRange`] if the chunk holds more vertices
/// than a `u16` index can address.
pub fn build_line_indices(line_starts: &[u32]) -> Result<Vec<u16>, TractError> {
    const MAX_VERTICES: u32 = u16::MAX as u32 + 1;

    if let Some(i) = line_starts.windows(2).position(|w| w[0] > w[1]) {
        return Err(TractError::InvalidDataset(format!(
            "line starts decrease at entry {}: {} > {}",
            i + 1,
            line_starts[i],
            line_starts[i + 1]
        )));
    }
    if let Some(&max) = line_starts.iter().find(|&&s| s > MAX_VERTICES) {
        return Err(TractError::ChunkExceedsIndexRange {
            vertices: u64::from(max),
        });
    }

    let segments: usize = line_starts
        .windows(2)
        .map(|w| (w[1] - w[0]).saturating_sub(1) as usize)
        .sum();
    let mut indices = Vec::with_capacity(segments * 2);
    for w in line_starts.windows(2) {
        for v in w[0] + 1..w[1] {
            indices.push((v - 1) as u16);
            indices.push(v as u16);
        }
    }
    Ok(indices)
}

/// Flatten vertices into `[x0, y0, z0, x1, ...]` for direct buffer upload.
pub fn flatten_vertices(vertices: &[TractVertex]) -> Vec<f32> {
    bytemuck::cast_slice(vertices).to_vec()
}

/// View vertices as raw bytes (zero-copy).
pub fn vertex_bytes(vertices: &[TractVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}
