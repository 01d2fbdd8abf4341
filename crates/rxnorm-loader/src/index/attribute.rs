//! Attribute index built from RXNSAT.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use rxnorm_types::{Rxcui, SatRow};

use crate::attribute::AttributeFilter;
use crate::index::ConceptIndex;
use crate::parser::RrfParser;
use crate::types::{LoadStats, RrfConfig, RrfResult};

/// Code lists (NDCs) per code-bearing concept.
///
/// Codes are deduplicated per RXCUI and kept in first-seen file order.
#[derive(Debug, Default)]
pub struct AttributeIndex {
    codes: HashMap<Rxcui, Vec<String>>,
    seen: HashSet<(Rxcui, String)>,
    stats: LoadStats,
}

impl AttributeIndex {
    /// Loads the index from an RXNSAT.RRF file.
    pub fn load<P: AsRef<Path>>(
        path: P,
        concepts: &ConceptIndex,
        config: &RrfConfig,
    ) -> RrfResult<Self> {
        let parser = RrfParser::<_, SatRow>::from_path(path)?;
        Self::from_parser(parser, concepts, config)
    }

    /// Builds the index from an open parser, streaming it once.
    pub fn from_parser<R: Read>(
        mut parser: RrfParser<R, SatRow>,
        concepts: &ConceptIndex,
        config: &RrfConfig,
    ) -> RrfResult<Self> {
        let start = Instant::now();
        let mut index = Self::default();

        for row in parser.by_ref() {
            index.push(row?, concepts, config);
        }

        index.stats.total_records = parser.records_read();
        index.stats.malformed_records = parser.malformed_records();
        index.stats.load_time_ms = start.elapsed().as_millis() as u64;
        Ok(index)
    }

    /// Builds the index from already parsed rows.
    pub fn from_rows(
        rows: impl IntoIterator<Item = SatRow>,
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

    fn push(&mut self, row: SatRow, concepts: &ConceptIndex, config: &RrfConfig) {
        if !row.passes_attribute_filter(config) {
            self.stats.filtered_records += 1;
            return;
        }

        match concepts.term_type(row.rxcui) {
            None => self.stats.dangling_references += 1,
            Some(tty) if !tty.carries_codes() => self.stats.filtered_records += 1,
            Some(_) => {
                if self.seen.insert((row.rxcui, row.atv.clone())) {
                    self.codes.entry(row.rxcui).or_default().push(row.atv);
                }
                self.stats.accepted_records += 1;
            }
        }
    }

    /// Returns the code list for an RXCUI; empty if it has none.
    pub fn codes_for(&self, rxcui: Rxcui) -> &[String] {
        self.codes.get(&rxcui).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the number of concepts with at least one code.
    pub fn concept_count(&self) -> usize {
        self.codes.len()
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

    fn concepts() -> ConceptIndex {
        let row = |rxcui: Rxcui, tty: &str| ConsoRow {
            rxcui,
            language: "ENG".to_string(),
            term_status: "P".to_string(),
            sab: "RXNORM".to_string(),
            tty: tty.to_string(),
            code: rxcui.to_string(),
            name: format!("concept {}", rxcui),
            suppress: Suppress::NotSuppressed,
        };
        ConceptIndex::from_rows(
            vec![row(2, "SCDC"), row(3, "SCD"), row(5, "SBD")],
            &RrfConfig::default(),
        )
    }

    fn ndc(rxcui: Rxcui, code: &str) -> SatRow {
        SatRow {
            rxcui,
            atn: "NDC".to_string(),
            sab: "RXNORM".to_string(),
            atv: code.to_string(),
            suppress: Suppress::NotSuppressed,
        }
    }

    #[test]
    fn test_codes_dedup_in_source_order() {
        let rows = vec![
            ndc(3, "00000-000-02"),
            ndc(3, "00000-000-01"),
            ndc(3, "00000-000-02"),
            ndc(5, "00000-000-09"),
        ];

        let index = AttributeIndex::from_rows(rows, &concepts(), &RrfConfig::default());
        assert_eq!(index.codes_for(3), &["00000-000-02", "00000-000-01"]);
        assert_eq!(index.codes_for(5), &["00000-000-09"]);
        assert!(index.codes_for(2).is_empty());
        assert_eq!(index.concept_count(), 2);
        assert_eq!(index.stats().accepted_records, 4);
    }

    #[test]
    fn test_filtered_and_dangling_rows() {
        let rows = vec![
            // Components do not carry codes.
            ndc(2, "00000-000-03"),
            // Unknown concept.
            ndc(77, "00000-000-04"),
            SatRow {
                suppress: Suppress::Suppressible,
                ..ndc(3, "00000-000-05")
            },
        ];

        let index = AttributeIndex::from_rows(rows, &concepts(), &RrfConfig::default());
        assert_eq!(index.concept_count(), 0);
        assert_eq!(index.stats().filtered_records, 2);
        assert_eq!(index.stats().dangling_references, 1);
    }

    #[test]
    fn test_dedup_is_per_concept() {
        let mut rows: Vec<SatRow> = (0..500)
            .map(|i| ndc(3, &format!("00000-{:03}-01", i % 250)))
            .collect();
        rows.push(ndc(5, "00000-000-01"));
        rows.push(ndc(3, "99999-999-99"));

        let index = AttributeIndex::from_rows(rows, &concepts(), &RrfConfig::default());
        let codes = index.codes_for(3);
        assert_eq!(codes.len(), 251);
        assert_eq!(codes[0], "00000-000-01");
        assert_eq!(codes[249], "00000-249-01");
        assert_eq!(codes[250], "99999-999-99");
        // The same code on another concept is kept there too.
        assert_eq!(index.codes_for(5), &["00000-000-01"]);
    }
}
