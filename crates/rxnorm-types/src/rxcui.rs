//! RxNorm concept identifier (RXCUI) type.
//!
//! RXCUIs are positive integers in the RRF tables. They are held as `u64`
//! so that parsing doubles as validation, and written back out as strings
//! to match the layout RxNorm consumers expect.

/// An RxNorm concept unique identifier (RXCUI).
///
/// # Examples
///
/// ```
/// use rxnorm_types::Rxcui;
///
/// let amoxicillin: Rxcui = 723;
/// let amoxicillin_500mg_capsule: Rxcui = 308191;
/// ```
pub type Rxcui = u64;

/// Serde helpers that encode an [`Rxcui`] as a JSON string.
///
/// Use with `#[serde(with = "rxnorm_types::rxcui::as_string")]`.
#[cfg(feature = "serde")]
pub mod as_string {
    use super::Rxcui;
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Serializes the identifier as its decimal string.
    pub fn serialize<S: Serializer>(value: &Rxcui, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    /// Deserializes an identifier from its decimal string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rxcui, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<Rxcui>().map_err(de::Error::custom)
    }
}
