//! Vertex sources: the collaborators that hand out contiguous vertex ranges.
//!
//! ## `vertices.bin` layout
//!
//! The file backing [`FileVertexSource`] is a headerless array of vertices,
//! each three little-endian `f32` values (x, y, z), 12 bytes per vertex.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::error::SourceError;
use crate::vertex::TractVertex;

const VERTEX_BYTES: u64 = std::mem::size_of::<TractVertex>() as u64;

/// Supplies vertices from the global flat vertex array by index range.
///
/// A source may hold a scoped resource such as an open file. Callers request
/// [`release`](Self::release) once they have read everything they need for a
/// request; a later fetch must reacquire the resource transparently.
pub trait VertexSource {
    /// Total number of vertices the source can serve.
    fn vertex_count(&self) -> u64;

    /// Fetch the vertices in the half-open range `range`.
    fn fetch_range(&mut self, range: Range<u64>) -> Result<Vec<TractVertex>, SourceError>;

    /// Release any scoped resource. Idempotent.
    fn release(&mut self);
}

impl<S: VertexSource + ?Sized> VertexSource for Box<S> {
    fn vertex_count(&self) -> u64 {
        (**self).vertex_count()
    }

    fn fetch_range(&mut self, range: Range<u64>) -> Result<Vec<TractVertex>, SourceError> {
        (**self).fetch_range(range)
    }

    fn release(&mut self) {
        (**self).release();
    }
}

fn check_range(range: &Range<u64>, len: u64) -> Result<(), SourceError> {
    if range.start > range.end || range.end > len {
        return Err(SourceError::RangeOutOfBounds {
            start: range.start,
            end: range.end,
            len,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// In-memory source
// ---------------------------------------------------------------------------

/// A vertex source backed by a `Vec` already in memory.
///
/// Counts fetches and releases so callers can observe the access pattern.
#[derive(Debug, Clone, Default)]
pub struct MemoryVertexSource {
    vertices: Vec<TractVertex>,
    fetches: usize,
    releases: usize,
}

impl MemoryVertexSource {
    /// Wrap an in-memory vertex array.
    pub fn new(vertices: Vec<TractVertex>) -> Self {
        Self {
            vertices,
            fetches: 0,
            releases: 0,
        }
    }

    /// The wrapped vertices.
    pub fn vertices(&self) -> &[TractVertex] {
        &self.vertices
    }

    /// Number of successful [`VertexSource::fetch_range`] calls so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    /// Number of [`VertexSource::release`] calls so far.
    pub fn release_count(&self) -> usize {
        self.releases
    }
}

impl VertexSource for MemoryVertexSource {
    fn vertex_count(&self) -> u64 {
        self.vertices.len() as u64
    }

    fn fetch_range(&mut self, range: Range<u64>) -> Result<Vec<TractVertex>, SourceError> {
        check_range(&range, self.vertex_count())?;
        self.fetches += 1;
        Ok(self.vertices[range.start as usize..range.end as usize].to_vec())
    }

    fn release(&mut self) {
        self.releases += 1;
    }
}

// ---------------------------------------------------------------------------
// File-backed source
// ---------------------------------------------------------------------------

/// A vertex source reading from a `vertices.bin` file.
///
/// The file is opened on the first fetch after construction or release, and
/// closed by [`VertexSource::release`].
#[derive(Debug)]
pub struct FileVertexSource {
    path: PathBuf,
    len: u64,
    reader: Option<BufReader<File>>,
}

impl FileVertexSource {
    /// Prepare a source over `path`. Only the file size is read here.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be inspected or its size is not a whole
    /// number of vertices.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let bytes = std::fs::metadata(&path)?.len();
        if bytes % VERTEX_BYTES != 0 {
            return Err(SourceError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "{} is {bytes} bytes, not a multiple of {VERTEX_BYTES}",
                    path.display()
                ),
            )));
        }
        Ok(Self {
            path,
            len: bytes / VERTEX_BYTES,
            reader: None,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` while the backing file handle is held.
    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    fn reader(&mut self) -> Result<&mut BufReader<File>, SourceError> {
        let reader = match self.reader.take() {
            Some(reader) => reader,
            None => {
                tracing::trace!(path = %self.path.display(), "opening vertex file");
                BufReader::new(File::open(&self.path)?)
            }
        };
        Ok(self.reader.insert(reader))
    }
}

impl VertexSource for FileVertexSource {
    fn vertex_count(&self) -> u64 {
        self.len
    }

    fn fetch_range(&mut self, range: Range<u64>) -> Result<Vec<TractVertex>, SourceError> {
        check_range(&range, self.len)?;
        let count = (range.end - range.start) as usize;
        if count == 0 {
            return Ok(Vec::new());
        }

        let reader = self.reader()?;
        reader.seek(SeekFrom::Start(range.start * VERTEX_BYTES))?;
        let mut raw = vec![0u8; count * VERTEX_BYTES as usize];
        reader.read_exact(&mut raw)?;

        let vertices = raw
            .chunks_exact(VERTEX_BYTES as usize)
            .map(|v| {
                let c = |i: usize| f32::from_le_bytes([v[i], v[i + 1], v[i + 2], v[i + 3]]);
                TractVertex::new(c(0), c(4), c(8))
            })
            .collect();
        Ok(vertices)
    }

    fn release(&mut self) {
        if self.reader.take().is_some() {
            tracing::trace!(path = %self.path.display(), "closed vertex file");
        }
    }
}

/// Write `vertices` to `path` in the `vertices.bin` layout.
pub fn write_vertex_file(
    path: impl AsRef<Path>,
    vertices: &[TractVertex],
) -> Result<(), SourceError> {
    let mut writer = BufWriter::new(File::create(path)?);
    for v in vertices {
        for c in v.position {
            writer.write_all(&c.to_le_bytes())?;
        }
    }
    writer.flush()?;
    Ok(())
}
