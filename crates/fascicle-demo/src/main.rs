//! Demo binary that chunks a tract dataset and reports the result per region.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p fascicle-demo` to chunk a synthetic dataset.
//! Run with `cargo run -p fascicle-demo -- --dataset <dir>` to chunk one on disk.

mod synthetic;

use std::path::Path;

use clap::Parser;
use fascicle_config::{CliArgs, Config};
use fascicle_core::{
    ChunkPlanner, FileVertexSource, MemoryVertexSource, RegionId, TractChunker, TractDataset,
    TractError, TractVertex, VERTICES_FILE, VertexSource, write_vertex_file,
};
use tracing::{info, warn};

type BoxedSource = Box<dyn VertexSource>;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_dir = match &args.config {
        Some(dir) => dir.clone(),
        None => Config::default_dir()?,
    };
    let mut config = Config::load_or_create(&config_dir)?;
    config.apply_cli_overrides(&args);

    let log_dir = dirs::data_local_dir().map(|dir| dir.join("fascicle").join("logs"));
    fascicle_log::init_logging(log_dir.as_deref(), cfg!(debug_assertions), Some(&config));

    let (dataset, mut source) = open_dataset(&config)?;

    if let Some(out_dir) = &args.write_dataset {
        write_dataset(out_dir, &dataset, &mut source)?;
    }

    let index = dataset.into_index()?;
    info!(
        tracts = index.tract_count(),
        vertices = index.vertex_count(),
        limit = config.chunking.vertex_limit,
        "dataset ready"
    );

    let planner = ChunkPlanner::with_limit(config.chunking.vertex_limit);
    let mut chunker = TractChunker::with_planner(index, planner, source)?;

    let regions = match args.region {
        Some(region) => vec![region],
        None => chunker.regions(),
    };

    let mut total_chunks = 0;
    for region in regions {
        match report_region(&mut chunker, region) {
            Ok(chunks) => total_chunks += chunks,
            Err(TractError::OversizedTract { tract, len, limit }) => {
                warn!(region, tract, len, limit, "region cannot be chunked");
            }
            Err(err) => return Err(err.into()),
        }
    }

    info!(total_chunks, "done");
    Ok(())
}

/// Load the dataset named by the config, or synthesize one.
fn open_dataset(
    config: &Config,
) -> Result<(TractDataset, BoxedSource), Box<dyn std::error::Error>> {
    match &config.dataset.directory {
        Some(dir) => {
            let dataset = TractDataset::load(dir)?;
            let source = FileVertexSource::open(dir.join(VERTICES_FILE))?;
            Ok((dataset, Box::new(source)))
        }
        None => {
            let (dataset, vertices) = synthetic::generate(&config.dataset);
            info!(
                tracts = dataset.tract_region.len(),
                seed = config.dataset.seed,
                "generated synthetic dataset"
            );
            Ok((dataset, Box::new(MemoryVertexSource::new(vertices))))
        }
    }
}

/// Persist `dataset` and every vertex of `source` into `dir`.
fn write_dataset(
    dir: &Path,
    dataset: &TractDataset,
    source: &mut BoxedSource,
) -> Result<(), Box<dyn std::error::Error>> {
    dataset.save(dir)?;
    let count = source.vertex_count();
    let vertices = source.fetch_range(0..count);
    source.release();
    write_vertex_file(dir.join(VERTICES_FILE), &vertices?)?;
    info!(path = %dir.display(), "wrote dataset");
    Ok(())
}

/// Build every chunk of `region`, check buffers against line starts, and log
/// per-chunk statistics. Returns the number of chunks.
fn report_region(
    chunker: &mut TractChunker<BoxedSource>,
    region: RegionId,
) -> Result<usize, TractError> {
    let chunks = chunker.chunks(region)?;
    let line_starts = chunker.line_starts(region)?;
    let limit = chunker.planner().limit();

    for (i, (chunk, starts)) in chunks.iter().zip(&line_starts).enumerate() {
        let buffer = chunker.vertex_buffer(region, i)?;
        let indices = chunker.line_indices(region, i)?;

        let expected = starts.last().copied().unwrap_or(0) as usize * TractVertex::COMPONENTS;
        if buffer.len() != expected {
            warn!(
                region,
                chunk = i,
                floats = buffer.len(),
                expected,
                "vertex buffer disagrees with line starts"
            );
        }

        info!(
            region,
            chunk = i,
            tracts = chunk.len(),
            vertices = chunk.vertex_count(),
            fill_pct = (1000.0 * chunk.vertex_count() as f64 / limit as f64).round() / 10.0,
            segments = indices.len() / 2,
            "chunk"
        );
    }

    info!(region, chunks = chunks.len(), "region chunked");
    Ok(chunks.len())
}
