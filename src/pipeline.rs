use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::acquire::Acquirer;
use crate::adapters::{AdapterRegistry, SourceAdapter};
use crate::config::RunConfig;
use crate::dedup::{Collision, dedup_by_sequence};
use crate::domain::{Record, SeqType};
use crate::error::SeqDbError;
use crate::fasta;
use crate::index::{IndexRequest, Indexer};
use crate::store::Store;
use crate::validate::{OrfReport, check_all};

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub source: String,
    pub seq_type: SeqType,
    pub loaded: usize,
    pub orf: OrfReport,
    pub duplicates_removed: usize,
    pub repeated_ids: usize,
    pub written: usize,
    pub output: String,
    pub indexed: bool,
    pub elapsed_ms: u128,
}

#[derive(Debug, Clone)]
pub struct Normalized {
    pub records: Vec<Record>,
    pub loaded: usize,
    pub orf: OrfReport,
    pub collisions: Vec<Collision>,
}

pub fn normalize(adapter: &dyn SourceAdapter, artifact: &Path) -> Result<Normalized, SeqDbError> {
    let mut records = adapter.load(artifact)?;
    let loaded = records.len();
    info!("{}: {loaded} records after header normalization", adapter.name());

    let orf = check_all(&mut records);
    if orf.checked > 0 {
        info!(
            "{}: {} of {} pass the full-gene check ({} repaired, {} failed)",
            adapter.name(),
            orf.passed,
            orf.checked,
            orf.repaired,
            orf.failed
        );
    }

    let (mut records, collisions) = dedup_by_sequence(records);
    if !collisions.is_empty() {
        info!(
            "{}: removed {} duplicate sequences",
            adapter.name(),
            collisions.len()
        );
    }
    records.sort_by(|a, b| a.id.cmp(&b.id));

    Ok(Normalized {
        records,
        loaded,
        orf,
        collisions,
    })
}

pub struct Pipeline<A: Acquirer, I: Indexer> {
    registry: AdapterRegistry,
    acquirer: A,
    indexer: I,
}

impl<A: Acquirer, I: Indexer> Pipeline<A, I> {
    pub fn new(registry: AdapterRegistry, acquirer: A, indexer: I) -> Self {
        Self {
            registry,
            acquirer,
            indexer,
        }
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    pub fn run(&self, config: &RunConfig) -> Result<RunSummary, SeqDbError> {
        let start = Instant::now();
        let store = Store::open(&config.outdir)?;
        let source = config.source;
        let adapter = self.registry.get(source)?;

        let mut plan = adapter.acquisition();
        if let Some(location) = config.sources.location_override(source) {
            debug!("{source}: using configured location {location}");
            plan = plan.with_location(location);
        }
        store.ensure_source_dir(source)?;
        let artifact = self
            .acquirer
            .acquire(source, &plan, &store.raw_dir(source), config.force)?;

        let normalized = normalize(adapter, artifact.as_std_path())?;

        let output = store.sequences_path(source);
        let stats = Store::write_atomic(&output, |writer| {
            fasta::write_records(writer, &normalized.records, source.as_str())
        })?;
        info!("wrote {} sequences to {output}", stats.written);

        if config.index {
            self.indexer.index(&IndexRequest {
                source,
                seq_type: adapter.seq_type(),
                sequences: output.clone(),
                log: store.index_log_path(source),
            })?;
        }

        Ok(RunSummary {
            source: source.to_string(),
            seq_type: adapter.seq_type(),
            loaded: normalized.loaded,
            orf: normalized.orf,
            duplicates_removed: normalized.collisions.len(),
            repeated_ids: stats.repeated_ids,
            written: stats.written,
            output: output.to_string(),
            indexed: config.index,
            elapsed_ms: start.elapsed().as_millis(),
        })
    }
}
