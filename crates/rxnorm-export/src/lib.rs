//! # rxnorm-export
//!
//! Deterministic JSON export of the RxNorm ingredient hierarchy.
//!
//! The export loads a release with `rxnorm-loader`, sorts the ingredient
//! trees, and publishes any mix of three outputs:
//!
//! - an aggregate, pretty-printed JSON array
//! - newline-delimited JSON, one ingredient per line
//! - a partitioned directory: `manifest.json` plus `data/<bucket>.json`
//!   per initial-character bucket, for incremental loading in a browser
//!
//! Every output is written to a temporary sibling and renamed into place.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod publish;

pub use config::{ExportConfig, OutputTarget};
pub use error::{ExportError, ExportResult};
pub use output::{partition, sort_ingredients, Bucket, Manifest, ManifestEntry, SortKey};
pub use pipeline::{run, RunSummary};
