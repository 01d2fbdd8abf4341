//! RxNorm relationship file parser.
//!
//! Parses RXNREL.RRF rows.

use csv::StringRecord;
use rxnorm_types::{LabelFamily, RelRow};

use crate::parser::{parse, RrfRecord};
use crate::types::{RrfConfig, RrfResult, RrfTable};

/// RXNREL column positions.
mod col {
    pub const RXCUI1: usize = 0;
    pub const STYPE1: usize = 2;
    pub const REL: usize = 3;
    pub const RXCUI2: usize = 4;
    pub const STYPE2: usize = 6;
    pub const RELA: usize = 7;
    pub const SAB: usize = 10;
    pub const SUPPRESS: usize = 14;
}

impl RrfRecord for RelRow {
    const TABLE: RrfTable = RrfTable::Relationships;
    const MIN_FIELDS: usize = 16;

    fn from_record(record: &StringRecord) -> RrfResult<Self> {
        Ok(RelRow {
            rxcui1: parse::rxcui(parse::field(record, col::RXCUI1))?,
            stype1: parse::field(record, col::STYPE1).to_string(),
            rel: parse::field(record, col::REL).to_string(),
            rxcui2: parse::rxcui(parse::field(record, col::RXCUI2))?,
            stype2: parse::field(record, col::STYPE2).to_string(),
            rela: parse::field(record, col::RELA).to_string(),
            sab: parse::field(record, col::SAB).to_string(),
            suppress: parse::field(record, col::SUPPRESS).to_string(),
        })
    }
}

/// Extended filter for relationship rows.
pub trait RelationshipFilter {
    /// Returns the label family if the row is a candidate hierarchy edge.
    fn candidate_family(&self, config: &RrfConfig) -> Option<LabelFamily>;
}

impl RelationshipFilter for RelRow {
    fn candidate_family(&self, config: &RrfConfig) -> Option<LabelFamily> {
        if self.sab != config.target_sab {
            return None;
        }
        if config.require_cui_stype && !self.links_concepts() {
            return None;
        }
        self.label_family()
    }
}
