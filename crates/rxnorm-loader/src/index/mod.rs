//! The three lookup indices the hierarchy builder reads.
//!
//! The concept index is built first; the relation and attribute indices
//! need it to classify edge endpoints and to drop rows that point at
//! concepts outside the export. With the `parallel` feature those two are
//! built concurrently, each owning its own storage.

mod attribute;
mod concept;
mod relation;

pub use attribute::AttributeIndex;
pub use concept::ConceptIndex;
pub use relation::{EdgeKey, RelationIndex};

use std::path::Path;

use crate::types::{RrfConfig, RrfError, RrfFiles, RrfResult, RrfTable};

/// All three indices for one run.
#[derive(Debug, Default)]
pub struct Indices {
    /// Concepts by RXCUI.
    pub concepts: ConceptIndex,
    /// Undirected categorized edges.
    pub relations: RelationIndex,
    /// Code lists by RXCUI.
    pub attributes: AttributeIndex,
}

/// Streams the three RRF tables once each and builds the indices.
///
/// Every table is checked before any of them is read, so a missing file is
/// reported up front.
pub fn build_indices(files: &RrfFiles, config: &RrfConfig) -> RrfResult<Indices> {
    let concept_path = required_path(files, RrfTable::Concepts)?;
    let relationship_path = required_path(files, RrfTable::Relationships)?;
    let attribute_path = required_path(files, RrfTable::Attributes)?;

    let concepts = ConceptIndex::load(concept_path, config)?;

    #[cfg(feature = "parallel")]
    let (relations, attributes) = rayon::join(
        || RelationIndex::load(relationship_path, &concepts, config),
        || AttributeIndex::load(attribute_path, &concepts, config),
    );

    #[cfg(not(feature = "parallel"))]
    let (relations, attributes) = (
        RelationIndex::load(relationship_path, &concepts, config),
        AttributeIndex::load(attribute_path, &concepts, config),
    );

    Ok(Indices {
        concepts,
        relations: relations?,
        attributes: attributes?,
    })
}

fn required_path(files: &RrfFiles, table: RrfTable) -> RrfResult<&Path> {
    match files.path(table) {
        Some(path) if path.is_file() => Ok(path.as_path()),
        Some(path) => Err(RrfError::MissingInputFile {
            table,
            path: path.display().to_string(),
        }),
        None => Err(RrfError::MissingInputFile {
            table,
            path: files.directory.join(table.file_name()).display().to_string(),
        }),
    }
}
