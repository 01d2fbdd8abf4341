//! # rxnorm-loader
//!
//! Streaming parser for RxNorm RRF release files and the ingredient
//! hierarchy builder on top of it.
//!
//! Loading runs in three stages:
//!
//! 1. [`discover_rrf_files`] locates `RXNCONSO.RRF`, `RXNREL.RRF` and
//!    `RXNSAT.RRF` in a release directory.
//! 2. [`build_indices`] streams each table once into a [`ConceptIndex`],
//!    a [`RelationIndex`] and an [`AttributeIndex`].
//! 3. [`HierarchyBuilder`] walks the indices from every ingredient and
//!    assembles the five-level trees.
//!
//! ```no_run
//! use rxnorm_loader::{build_indices, discover_rrf_files, HierarchyBuilder, RrfConfig};
//!
//! let config = RrfConfig::default();
//! let files = discover_rrf_files("/data/RxNorm_full_10062025")?;
//! let indices = build_indices(&files, &config)?;
//! let hierarchy = HierarchyBuilder::new(&indices, &config).build();
//! println!("{} ingredients", hierarchy.ingredients.len());
//! # Ok::<(), rxnorm_loader::RrfError>(())
//! ```

#![warn(missing_docs)]

pub mod attribute;
pub mod concept;
pub mod hierarchy;
pub mod index;
pub mod loader;
pub mod parser;
pub mod relationship;
pub mod types;

pub use attribute::AttributeFilter;
pub use concept::ConceptFilter;
pub use hierarchy::{Hierarchy, HierarchyBuilder};
pub use index::{build_indices, AttributeIndex, ConceptIndex, EdgeKey, Indices, RelationIndex};
pub use loader::{discover_rrf_files, format_bytes};
pub use parser::{RrfParser, RrfRecord};
pub use relationship::RelationshipFilter;
pub use types::{LoadStats, NamePolicy, RrfConfig, RrfError, RrfFiles, RrfResult, RrfTable};

// Re-export rxnorm-types for convenience
pub use rxnorm_types;
