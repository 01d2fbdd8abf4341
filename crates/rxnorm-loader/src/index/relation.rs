//! Relation index built from RXNREL.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use rxnorm_types::{RelRow, RelationCategory, Rxcui};

use crate::index::ConceptIndex;
use crate::parser::RrfParser;
use crate::relationship::RelationshipFilter;
use crate::types::{LoadStats, RrfConfig, RrfResult};

/// Identity of one undirected edge: the unordered RXCUI pair plus category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    /// Smaller RXCUI of the pair.
    pub low: Rxcui,
    /// Larger RXCUI of the pair.
    pub high: Rxcui,
    /// Canonical category.
    pub category: RelationCategory,
}

impl EdgeKey {
    /// Creates the key for an edge; endpoint order does not matter.
    pub fn new(a: Rxcui, b: Rxcui, category: RelationCategory) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
            category,
        }
    }
}

/// Undirected, categorized edges between hierarchy concepts.
///
/// Each edge is stored once in the edge set and in both adjacency
/// directions, so traversal can start from either endpoint. Neighbor lists
/// keep first-seen file order and never hold the same RXCUI twice.
#[derive(Debug, Default)]
pub struct RelationIndex {
    adjacency: HashMap<(Rxcui, RelationCategory), Vec<Rxcui>>,
    edges: HashSet<EdgeKey>,
    stats: LoadStats,
}

impl RelationIndex {
    /// Loads the index from an RXNREL.RRF file.
    pub fn load<P: AsRef<Path>>(
        path: P,
        concepts: &ConceptIndex,
        config: &RrfConfig,
    ) -> RrfResult<Self> {
        let parser = RrfParser::<_, RelRow>::from_path(path)?;
        Self::from_parser(parser, concepts, config)
    }

    /// Builds the index from an open parser, streaming it once.
    pub fn from_parser<R: Read>(
        mut parser: RrfParser<R, RelRow>,
        concepts: &ConceptIndex,
        config: &RrfConfig,
    ) -> RrfResult<Self> {
        let start = Instant::now();
        let mut index = Self::default();

        for row in parser.by_ref() {
            index.push(&row?, concepts, config);
        }

        index.stats.total_records = parser.records_read();
        index.stats.malformed_records = parser.malformed_records();
        index.stats.load_time_ms = start.elapsed().as_millis() as u64;
        Ok(index)
    }

    /// Builds the index from already parsed rows.
    pub fn from_rows<'a>(
        rows: impl IntoIterator<Item = &'a RelRow>,
        concepts: &ConceptIndex,
        config: &RrfConfig,
    ) -> Self {
        let mut index = Self::default();
        for row in rows {
            index.push(row, concepts, config);
            index.stats.total_records += 1;
        }
        index
    }

    fn push(&mut self, row: &RelRow, concepts: &ConceptIndex, config: &RrfConfig) {
        let Some(family) = row.candidate_family(config) else {
            self.stats.filtered_records += 1;
            return;
        };
        if row.rxcui1 == row.rxcui2 {
            self.stats.filtered_records += 1;
            return;
        }

        let (Some(a), Some(b)) = (concepts.term_type(row.rxcui1), concepts.term_type(row.rxcui2))
        else {
            self.stats.dangling_references += 1;
            return;
        };

        match RelationCategory::classify(family, a, b) {
            Some(category) => {
                self.insert_edge(row.rxcui1, row.rxcui2, category);
                self.stats.accepted_records += 1;
            }
            None => self.stats.filtered_records += 1,
        }
    }

    /// Inserts an undirected edge. Returns false if it was already present.
    fn insert_edge(&mut self, a: Rxcui, b: Rxcui, category: RelationCategory) -> bool {
        if !self.edges.insert(EdgeKey::new(a, b, category)) {
            return false;
        }
        self.adjacency.entry((a, category)).or_default().push(b);
        self.adjacency.entry((b, category)).or_default().push(a);
        true
    }

    /// Returns the neighbors of an RXCUI under a category, in first-seen
    /// order.
    pub fn neighbors(&self, rxcui: Rxcui, category: RelationCategory) -> &[Rxcui] {
        self.adjacency
            .get(&(rxcui, category))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns true if the two concepts are linked under the category.
    pub fn contains_edge(&self, a: Rxcui, b: Rxcui, category: RelationCategory) -> bool {
        self.edges.contains(&EdgeKey::new(a, b, category))
    }

    /// Returns the number of distinct undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the load statistics.
    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxnorm_types::{ConsoRow, Suppress};

    fn concept(rxcui: Rxcui, tty: &str) -> ConsoRow {
        ConsoRow {
            rxcui,
            language: "ENG".to_string(),
            term_status: "P".to_string(),
            sab: "RXNORM".to_string(),
            tty: tty.to_string(),
            code: rxcui.to_string(),
            name: format!("concept {}", rxcui),
            suppress: Suppress::NotSuppressed,
        }
    }

    fn rel(rxcui1: Rxcui, rela: &str, rxcui2: Rxcui) -> RelRow {
        RelRow {
            rxcui1,
            stype1: "CUI".to_string(),
            rel: "RO".to_string(),
            rxcui2,
            stype2: "CUI".to_string(),
            rela: rela.to_string(),
            sab: "RXNORM".to_string(),
            suppress: String::new(),
        }
    }

    fn concepts() -> ConceptIndex {
        ConceptIndex::from_rows(
            vec![
                concept(1, "IN"),
                concept(2, "SCDC"),
                concept(3, "SCD"),
                concept(4, "GPCK"),
                concept(5, "SBD"),
                concept(6, "BN"),
            ],
            &RrfConfig::default(),
        )
    }

    #[test]
    fn test_reciprocal_rows_make_one_edge() {
        let concepts = concepts();
        let rows = vec![
            rel(2, "has_ingredient", 1),
            rel(1, "ingredient_of", 2),
        ];

        let index = RelationIndex::from_rows(&rows, &concepts, &RrfConfig::default());
        assert_eq!(index.edge_count(), 1);
        assert_eq!(index.neighbors(1, RelationCategory::IngredientComponent), &[2]);
        assert_eq!(index.neighbors(2, RelationCategory::IngredientComponent), &[1]);
        assert_eq!(index.stats().accepted_records, 2);
    }

    #[test]
    fn test_same_label_twice_is_idempotent() {
        let concepts = concepts();
        let rows = vec![rel(3, "consists_of", 2), rel(3, "consists_of", 2)];

        let index = RelationIndex::from_rows(&rows, &concepts, &RrfConfig::default());
        assert_eq!(index.edge_count(), 1);
        assert_eq!(index.neighbors(2, RelationCategory::ComponentClinicalDrug), &[3]);
        assert!(index.contains_edge(2, 3, RelationCategory::ComponentClinicalDrug));
        assert!(index.contains_edge(3, 2, RelationCategory::ComponentClinicalDrug));
    }

    #[test]
    fn test_shared_label_split_by_endpoint_types() {
        let concepts = concepts();
        let rows = vec![rel(2, "has_ingredient", 1), rel(5, "has_ingredient", 6)];

        let index = RelationIndex::from_rows(&rows, &concepts, &RrfConfig::default());
        assert_eq!(index.neighbors(5, RelationCategory::BrandedDrugBrandName), &[6]);
        assert!(index.neighbors(5, RelationCategory::IngredientComponent).is_empty());
        assert_eq!(index.edge_count(), 2);
    }

    #[test]
    fn test_neighbor_order_is_first_seen() {
        let concepts = ConceptIndex::from_rows(
            vec![
                concept(3, "SCD"),
                concept(40, "GPCK"),
                concept(41, "BPCK"),
                concept(42, "GPCK"),
            ],
            &RrfConfig::default(),
        );
        let rows = vec![
            rel(42, "contained_in", 3),
            rel(3, "contains", 40),
            rel(3, "contains", 42),
            rel(41, "contained_in", 3),
        ];

        let index = RelationIndex::from_rows(&rows, &concepts, &RrfConfig::default());
        assert_eq!(index.neighbors(3, RelationCategory::ClinicalDrugPack), &[42, 40, 41]);
    }

    #[test]
    fn test_dangling_and_filtered_rows() {
        let concepts = concepts();
        let rows = vec![
            // 99 is not in the concept index.
            rel(99, "has_ingredient", 1),
            // Unrecognized label.
            rel(3, "has_dose_form", 2),
            // Recognized label, wrong pairing.
            rel(3, "has_tradename", 6),
            // Wrong source vocabulary.
            RelRow {
                sab: "VANDF".to_string(),
                ..rel(2, "has_ingredient", 1)
            },
        ];

        let index = RelationIndex::from_rows(&rows, &concepts, &RrfConfig::default());
        assert_eq!(index.edge_count(), 0);
        assert_eq!(index.stats().dangling_references, 1);
        assert_eq!(index.stats().filtered_records, 3);
        assert!(index.neighbors(1, RelationCategory::IngredientComponent).is_empty());
    }
}
