//! The end-to-end export run.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use rxnorm_loader::{
    build_indices, discover_rrf_files, format_bytes, HierarchyBuilder, LoadStats, RrfTable,
};
use rxnorm_types::{IngredientNode, TermType};
use tracing::{debug, info, warn};

use crate::config::{ExportConfig, OutputTarget};
use crate::error::ExportResult;
use crate::output::{sort_ingredients, write_aggregate, write_ndjson, write_partitioned};

/// Counts reported at the end of a successful run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Release date taken from the release directory name, if any.
    pub release_date: Option<String>,
    /// RXNCONSO load statistics.
    pub concepts: LoadStats,
    /// RXNREL load statistics.
    pub relations: LoadStats,
    /// RXNSAT load statistics.
    pub attributes: LoadStats,
    /// Ingredients written.
    pub ingredients: usize,
    /// Ingredients dropped for having no components.
    pub dropped_ingredients: usize,
    /// Dropped ingredients per term type.
    pub dropped_by_term_type: BTreeMap<TermType, usize>,
    /// Total nodes across all written trees.
    pub nodes: usize,
    /// Partition buckets written (0 without a partitioned target).
    pub buckets: usize,
    /// Published outputs, in target order.
    pub outputs: Vec<PathBuf>,
    /// Wall time of the run in milliseconds.
    pub elapsed_ms: u64,
}

impl RunSummary {
    /// Malformed rows skipped across all three tables.
    pub fn malformed_records(&self) -> usize {
        self.concepts.malformed_records
            + self.relations.malformed_records
            + self.attributes.malformed_records
    }

    /// Relationship and attribute rows dropped for unknown RXCUIs.
    pub fn dangling_references(&self) -> usize {
        self.relations.dangling_references + self.attributes.dangling_references
    }

    /// Logs the summary at info level.
    pub fn log(&self) {
        for (table, stats) in [
            (RrfTable::Concepts, &self.concepts),
            (RrfTable::Relationships, &self.relations),
            (RrfTable::Attributes, &self.attributes),
        ] {
            info!(
                "{}: {} rows, {} accepted ({:.1}%), {} filtered, {} malformed, {} dangling in {}ms",
                table,
                stats.total_records,
                stats.accepted_records,
                stats.accept_rate(),
                stats.filtered_records,
                stats.malformed_records,
                stats.dangling_references,
                stats.load_time_ms
            );
        }
        info!(
            "Exported {} ingredients ({} nodes), dropped {} without components, {} buckets",
            self.ingredients, self.nodes, self.dropped_ingredients, self.buckets
        );
        for (tty, count) in &self.dropped_by_term_type {
            info!("Dropped {} {} ingredients without components", count, tty);
        }
        if self.malformed_records() > 0 || self.dangling_references() > 0 {
            warn!(
                "Skipped {} malformed rows and {} dangling references",
                self.malformed_records(),
                self.dangling_references()
            );
        }
        info!("Export finished in {}ms", self.elapsed_ms);
    }
}

/// Loads the release, builds the hierarchy and publishes every output.
///
/// Nothing is written unless all three tables load.
pub fn run(config: &ExportConfig) -> ExportResult<RunSummary> {
    let start = Instant::now();
    let rrf = &config.rrf;

    info!("Loading RxNorm RRF files from: {}", config.rrf_dir.display());
    let files = discover_rrf_files(&config.rrf_dir)?;
    info!(
        "Discovered RRF files in {} (release: {})",
        files.directory.display(),
        files.release_date.as_deref().unwrap_or("unknown")
    );
    for table in [
        RrfTable::Concepts,
        RrfTable::Relationships,
        RrfTable::Attributes,
    ] {
        if let Some(size) = files.path(table).and_then(|p| fs::metadata(p).ok()) {
            debug!("{}: {}", table, format_bytes(size.len()));
        }
    }

    let indices = build_indices(&files, rrf)?;
    info!(
        "Indexed {} concepts ({} ingredients, {} UNII codes), {} edges, codes for {} concepts",
        indices.concepts.len(),
        indices.concepts.ingredient_count(),
        indices.concepts.normalized_id_count(),
        indices.relations.edge_count(),
        indices.attributes.concept_count()
    );

    let hierarchy = HierarchyBuilder::new(&indices, rrf).build();
    let nodes = hierarchy.node_count();
    let mut ingredients: Vec<IngredientNode> = hierarchy.ingredients;
    sort_ingredients(&mut ingredients);

    if ingredients.is_empty() {
        warn!("No ingredients survived filtering; writing empty output");
    }

    let mut summary = RunSummary {
        release_date: files.release_date.clone(),
        concepts: *indices.concepts.stats(),
        relations: *indices.relations.stats(),
        attributes: *indices.attributes.stats(),
        ingredients: ingredients.len(),
        dropped_ingredients: hierarchy.dropped_ingredients,
        dropped_by_term_type: hierarchy.dropped_by_term_type,
        nodes,
        ..Default::default()
    };

    for target in &config.outputs {
        match target {
            OutputTarget::Aggregate(path) => {
                write_aggregate(path, &ingredients)?;
                info!("Wrote aggregate JSON to {}", path.display());
            }
            OutputTarget::Ndjson(path) => {
                write_ndjson(path, &ingredients)?;
                info!("Wrote NDJSON to {}", path.display());
            }
            OutputTarget::Partitioned(dir) => {
                let manifest = write_partitioned(dir, &ingredients)?;
                summary.buckets = manifest.len();
                info!(
                    "Wrote {} partition buckets to {}",
                    manifest.len(),
                    dir.display()
                );
            }
        }
        summary.outputs.push(target.path().to_path_buf());
    }

    summary.elapsed_ms = start.elapsed().as_millis() as u64;
    Ok(summary)
}
