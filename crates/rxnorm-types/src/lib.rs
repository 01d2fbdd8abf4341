//! # rxnorm-types
//!
//! Type definitions for RxNorm drug terminology extracts.
//!
//! This crate provides Rust types for the three RxNorm Rich Release Format
//! (RRF) tables consumed by the ingredient hierarchy export (concepts,
//! relationships, attributes), the coded values they carry, and the node
//! types of the exported hierarchy.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!   The hierarchy nodes serialize to the viewer's JSON layout.
//!
//! ## Usage
//!
//! ```rust
//! use rxnorm_types::{LabelFamily, RelationCategory, Rxcui, TermType};
//!
//! let tty = TermType::from_code("SBD").unwrap();
//! assert!(tty.carries_codes());
//!
//! // Both directions of a label pair resolve to one category.
//! let family = LabelFamily::from_rela("tradename_of").unwrap();
//! let category = RelationCategory::classify(family, TermType::BrandedDrug, TermType::ClinicalDrug);
//! assert_eq!(category, Some(RelationCategory::ClinicalDrugBrandedDrug));
//!
//! let _id: Rxcui = 308191;
//! ```

#![warn(missing_docs)]

mod attribute;
mod concept;
mod enums;
pub mod hierarchy;
mod relationship;
pub mod rxcui;

// Re-export all public types at crate root
pub use attribute::SatRow;
pub use concept::{Concept, ConsoRow};
pub use enums::{LabelFamily, RelationCategory, Suppress, TermType};
pub use hierarchy::{
    BrandNameNode, BrandedDrugNode, ClinicalDrugNode, ComponentNode, IngredientNode, PackNode,
};
pub use relationship::RelRow;
pub use rxcui::Rxcui;
