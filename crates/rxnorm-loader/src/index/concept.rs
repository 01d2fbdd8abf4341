//! Concept index built from RXNCONSO.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use rxnorm_types::{Concept, ConsoRow, Rxcui, TermType};

use crate::concept::ConceptFilter;
use crate::parser::RrfParser;
use crate::types::{LoadStats, NamePolicy, RrfConfig, RrfResult};

/// Resolves an RXCUI to its hierarchy concept.
///
/// Holds one [`Concept`] per RXCUI that has at least one eligible row in
/// the target vocabulary, plus the normalized identifiers (UNII) found on
/// the supplemental vocabulary rows. Immutable once built.
#[derive(Debug, Default)]
pub struct ConceptIndex {
    concepts: HashMap<Rxcui, Concept>,
    /// Ingredient-level RXCUIs in first-seen file order.
    ingredients: Vec<Rxcui>,
    normalized_ids: HashMap<Rxcui, String>,
    stats: LoadStats,
}

impl ConceptIndex {
    /// Loads the index from an RXNCONSO.RRF file.
    pub fn load<P: AsRef<Path>>(path: P, config: &RrfConfig) -> RrfResult<Self> {
        let parser = RrfParser::<_, ConsoRow>::from_path(path)?;
        Self::from_parser(parser, config)
    }

    /// Builds the index from an open parser, streaming it once.
    pub fn from_parser<R: Read>(
        mut parser: RrfParser<R, ConsoRow>,
        config: &RrfConfig,
    ) -> RrfResult<Self> {
        let start = Instant::now();
        let mut builder = Builder::new(config);

        for row in parser.by_ref() {
            builder.push(row?);
        }

        let mut index = builder.finish();
        index.stats.total_records = parser.records_read();
        index.stats.malformed_records = parser.malformed_records();
        index.stats.load_time_ms = start.elapsed().as_millis() as u64;
        Ok(index)
    }

    /// Builds the index from already parsed rows.
    pub fn from_rows(rows: impl IntoIterator<Item = ConsoRow>, config: &RrfConfig) -> Self {
        let mut builder = Builder::new(config);
        let mut total = 0;
        for row in rows {
            builder.push(row);
            total += 1;
        }
        let mut index = builder.finish();
        index.stats.total_records = total;
        index
    }

    /// Returns the concept for an RXCUI, if it passed the filters.
    pub fn resolve(&self, rxcui: Rxcui) -> Option<&Concept> {
        self.concepts.get(&rxcui)
    }

    /// Returns the term type of an indexed concept.
    pub fn term_type(&self, rxcui: Rxcui) -> Option<TermType> {
        self.concepts.get(&rxcui).map(|c| c.tty)
    }

    /// Returns the normalized identifier (UNII) for an RXCUI.
    pub fn normalized_id(&self, rxcui: Rxcui) -> Option<&str> {
        self.normalized_ids.get(&rxcui).map(String::as_str)
    }

    /// Returns the ingredient-level concepts (IN, PIN, MIN) in file order.
    pub fn ingredients(&self) -> impl Iterator<Item = &Concept> + '_ {
        self.ingredients
            .iter()
            .filter_map(move |rxcui| self.concepts.get(rxcui))
    }

    /// Returns the number of indexed concepts.
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    /// Returns true if no concept passed the filters.
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Returns the number of ingredient-level concepts.
    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
    }

    /// Returns the number of normalized identifiers found.
    pub fn normalized_id_count(&self) -> usize {
        self.normalized_ids.len()
    }

    /// Returns the load statistics.
    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }
}

struct Builder<'a> {
    config: &'a RrfConfig,
    index: ConceptIndex,
    /// RXCUIs whose name already comes from a TS = `P` row.
    preferred: HashSet<Rxcui>,
}

impl<'a> Builder<'a> {
    fn new(config: &'a RrfConfig) -> Self {
        Self {
            config,
            index: ConceptIndex::default(),
            preferred: HashSet::new(),
        }
    }

    fn push(&mut self, row: ConsoRow) {
        let stats = &mut self.index.stats;

        if row.is_normalized_id(self.config) {
            self.index
                .normalized_ids
                .entry(row.rxcui)
                .or_insert(row.code);
            stats.accepted_records += 1;
            return;
        }

        let Some(tty) = row.hierarchy_term_type(self.config) else {
            stats.filtered_records += 1;
            return;
        };
        stats.accepted_records += 1;

        let is_preferred = row.is_preferred_term();
        match self.index.concepts.entry(row.rxcui) {
            Entry::Vacant(slot) => {
                if tty.is_ingredient() {
                    self.index.ingredients.push(row.rxcui);
                }
                if is_preferred {
                    self.preferred.insert(row.rxcui);
                }
                slot.insert(Concept {
                    rxcui: row.rxcui,
                    name: row.name,
                    tty,
                    sab: row.sab,
                    language: row.language,
                    suppress: row.suppress,
                });
            }
            Entry::Occupied(mut slot) => {
                let upgrade = self.config.name_policy == NamePolicy::PreferTermStatus
                    && is_preferred
                    && slot.get().tty == tty
                    && self.preferred.insert(row.rxcui);
                if upgrade {
                    let concept = slot.get_mut();
                    concept.name = row.name;
                    concept.language = row.language;
                    concept.suppress = row.suppress;
                }
            }
        }
    }

    fn finish(self) -> ConceptIndex {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxnorm_types::Suppress;

    fn row(rxcui: Rxcui, tty: &str, name: &str) -> ConsoRow {
        ConsoRow {
            rxcui,
            language: "ENG".to_string(),
            term_status: "P".to_string(),
            sab: "RXNORM".to_string(),
            tty: tty.to_string(),
            code: rxcui.to_string(),
            name: name.to_string(),
            suppress: Suppress::NotSuppressed,
        }
    }

    #[test]
    fn test_resolve_and_filters() {
        let rows = vec![
            row(1, "IN", "Amoxicillin"),
            row(2, "SCDC", "amoxicillin 500 MG"),
            row(3, "SY", "amox"),
            ConsoRow {
                suppress: Suppress::Obsolete,
                ..row(4, "IN", "Obsolete thing")
            },
            ConsoRow {
                sab: "MMSL".to_string(),
                ..row(5, "IN", "Other source")
            },
        ];

        let index = ConceptIndex::from_rows(rows, &RrfConfig::default());
        assert_eq!(index.len(), 2);
        assert_eq!(index.resolve(1).unwrap().name, "Amoxicillin");
        assert_eq!(index.term_type(2), Some(TermType::Component));
        assert!(index.resolve(3).is_none());
        assert!(index.resolve(4).is_none());
        assert!(index.resolve(5).is_none());
        assert_eq!(index.stats().accepted_records, 2);
        assert_eq!(index.stats().filtered_records, 3);
    }

    #[test]
    fn test_include_suppressed_override() {
        let rows = vec![ConsoRow {
            suppress: Suppress::Obsolete,
            ..row(4, "IN", "Obsolete thing")
        }];
        let config = RrfConfig {
            include_suppressed: true,
            ..Default::default()
        };
        let index = ConceptIndex::from_rows(rows, &config);
        assert!(index.resolve(4).is_some());
    }

    #[test]
    fn test_first_seen_name_wins() {
        let rows = vec![
            ConsoRow {
                term_status: "S".to_string(),
                ..row(1, "IN", "first")
            },
            row(1, "IN", "second"),
        ];

        let index = ConceptIndex::from_rows(rows, &RrfConfig::default());
        assert_eq!(index.resolve(1).unwrap().name, "first");
        assert_eq!(index.ingredient_count(), 1);
    }

    #[test]
    fn test_prefer_term_status_policy() {
        let rows = vec![
            ConsoRow {
                term_status: "S".to_string(),
                ..row(1, "IN", "first")
            },
            row(1, "IN", "preferred"),
            row(1, "IN", "another preferred"),
        ];
        let config = RrfConfig {
            name_policy: NamePolicy::PreferTermStatus,
            ..Default::default()
        };

        let index = ConceptIndex::from_rows(rows, &config);
        assert_eq!(index.resolve(1).unwrap().name, "preferred");
    }

    #[test]
    fn test_language_restriction_can_be_disabled() {
        let rows = vec![ConsoRow {
            language: "SPA".to_string(),
            ..row(1, "IN", "amoxicilina")
        }];

        let restricted = ConceptIndex::from_rows(rows.clone(), &RrfConfig::default());
        assert!(restricted.is_empty());

        let config = RrfConfig {
            language: None,
            ..Default::default()
        };
        let open = ConceptIndex::from_rows(rows, &config);
        assert_eq!(open.resolve(1).unwrap().language, "SPA");
    }

    #[test]
    fn test_ingredients_in_file_order() {
        let rows = vec![
            row(30, "MIN", "c"),
            row(10, "IN", "a"),
            row(11, "SCD", "not an ingredient"),
            row(20, "PIN", "b"),
            row(10, "IN", "a again"),
        ];
        let index = ConceptIndex::from_rows(rows, &RrfConfig::default());
        let ids: Vec<Rxcui> = index.ingredients().map(|c| c.rxcui).collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }

    #[test]
    fn test_normalized_ids() {
        let rows = vec![
            row(1, "IN", "Amoxicillin"),
            ConsoRow {
                sab: "MTHSPL".to_string(),
                code: "804826J2HU".to_string(),
                ..row(1, "SU", "AMOXICILLIN")
            },
            ConsoRow {
                sab: "MTHSPL".to_string(),
                code: "LATER".to_string(),
                ..row(1, "SU", "AMOXICILLIN")
            },
        ];
        let index = ConceptIndex::from_rows(rows, &RrfConfig::default());
        assert_eq!(index.normalized_id(1), Some("804826J2HU"));
        assert_eq!(index.normalized_id_count(), 1);
        // The MTHSPL name never replaces the RxNorm one.
        assert_eq!(index.resolve(1).unwrap().name, "Amoxicillin");
    }

    fn unii_row(rxcui: Rxcui, code: &str, suppress: Suppress) -> ConsoRow {
        ConsoRow {
            sab: "MTHSPL".to_string(),
            code: code.to_string(),
            suppress,
            ..row(rxcui, "SU", "AMOXICILLIN")
        }
    }

    #[test]
    fn test_suppressed_normalized_id_is_skipped() {
        let rows = vec![
            row(1, "IN", "Amoxicillin"),
            unii_row(1, "SUPPRESSED_UNII", Suppress::Obsolete),
            unii_row(1, "ACTIVE_UNII", Suppress::NotSuppressed),
            unii_row(2, "ONLY_SUPPRESSED", Suppress::Suppressible),
        ];

        let index = ConceptIndex::from_rows(rows, &RrfConfig::default());
        assert_eq!(index.normalized_id(1), Some("ACTIVE_UNII"));
        assert_eq!(index.normalized_id(2), None);
        assert_eq!(index.normalized_id_count(), 1);
        assert_eq!(index.stats().filtered_records, 2);
    }

    #[test]
    fn test_include_suppressed_reaches_normalized_ids() {
        let rows = vec![
            row(1, "IN", "Amoxicillin"),
            unii_row(1, "SUPPRESSED_UNII", Suppress::Editor),
            unii_row(1, "ACTIVE_UNII", Suppress::NotSuppressed),
        ];
        let config = RrfConfig {
            include_suppressed: true,
            ..Default::default()
        };

        let index = ConceptIndex::from_rows(rows, &config);
        assert_eq!(index.normalized_id(1), Some("SUPPRESSED_UNII"));
    }

    #[test]
    fn test_from_parser_counts_malformed_lines() {
        let data = "1|ENG|P|L1|PF|S1|Y|A1||||RXNORM|IN|1|Amoxicillin||N|4096|\n\
                    broken line\n\
                    2|ENG|P|L2|PF|S2|Y|A2||||RXNORM|SCDC|2|amoxicillin 500 MG||N|4096|\n";
        let parser = RrfParser::<_, ConsoRow>::from_reader(data.as_bytes());
        let index = ConceptIndex::from_parser(parser, &RrfConfig::default()).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.stats().total_records, 3);
        assert_eq!(index.stats().malformed_records, 1);
    }
}
