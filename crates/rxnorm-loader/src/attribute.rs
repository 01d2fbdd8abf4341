//! RxNorm attribute file parser.
//!
//! Parses RXNSAT.RRF rows.

use csv::StringRecord;
use rxnorm_types::SatRow;

use crate::parser::{parse, RrfRecord};
use crate::types::{RrfConfig, RrfResult, RrfTable};

/// RXNSAT column positions.
mod col {
    pub const RXCUI: usize = 0;
    pub const ATN: usize = 8;
    pub const SAB: usize = 9;
    pub const ATV: usize = 10;
    pub const SUPPRESS: usize = 11;
}

impl RrfRecord for SatRow {
    const TABLE: RrfTable = RrfTable::Attributes;
    const MIN_FIELDS: usize = 13;

    fn from_record(record: &StringRecord) -> RrfResult<Self> {
        Ok(SatRow {
            rxcui: parse::rxcui(parse::field(record, col::RXCUI))?,
            atn: parse::field(record, col::ATN).to_string(),
            sab: parse::field(record, col::SAB).to_string(),
            atv: parse::field(record, col::ATV).to_string(),
            suppress: parse::suppress(parse::field(record, col::SUPPRESS))?,
        })
    }
}

/// Extended filter for attribute rows.
pub trait AttributeFilter {
    /// Returns true if the row carries a code for the configured attribute.
    fn passes_attribute_filter(&self, config: &RrfConfig) -> bool;
}

impl AttributeFilter for SatRow {
    fn passes_attribute_filter(&self, config: &RrfConfig) -> bool {
        self.sab == config.target_sab
            && self.atn == config.code_attribute
            && config.accepts_suppress(self.suppress)
            && !self.atv.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxnorm_types::Suppress;

    fn make_record(fields: &[&str]) -> StringRecord {
        let mut record = StringRecord::new();
        for field in fields {
            record.push_field(field);
        }
        record
    }

    fn make_row() -> SatRow {
        SatRow {
            rxcui: 308191,
            atn: "NDC".to_string(),
            sab: "RXNORM".to_string(),
            atv: "00093310905".to_string(),
            suppress: Suppress::NotSuppressed,
        }
    }

    #[test]
    fn test_parse_attribute_record() {
        let record = make_record(&[
            "308191", "", "", "", "CUI", "", "AT1", "", "NDC", "RXNORM", "00093310905", "N",
            "4096", "",
        ]);

        let row = SatRow::from_record(&record).unwrap();
        assert_eq!(row.rxcui, 308191);
        assert_eq!(row.atn, "NDC");
        assert_eq!(row.atv, "00093310905");
        assert_eq!(row, make_row());
    }

    #[test]
    fn test_attribute_filter() {
        let config = RrfConfig::default();
        assert!(make_row().passes_attribute_filter(&config));

        let other_attribute = SatRow {
            atn: "DM_SPL_ID".to_string(),
            ..make_row()
        };
        assert!(!other_attribute.passes_attribute_filter(&config));

        let other_source = SatRow {
            sab: "VANDF".to_string(),
            ..make_row()
        };
        assert!(!other_source.passes_attribute_filter(&config));

        let suppressed = SatRow {
            suppress: Suppress::Obsolete,
            ..make_row()
        };
        assert!(!suppressed.passes_attribute_filter(&config));

        let empty = SatRow {
            atv: String::new(),
            ..make_row()
        };
        assert!(!empty.passes_attribute_filter(&config));
    }
}
