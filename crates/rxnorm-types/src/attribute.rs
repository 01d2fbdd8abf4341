//! RxNorm attribute row type.

use crate::{Rxcui, Suppress};

/// A row from the RxNorm simple attribute table (RXNSAT).
///
/// # Examples
///
/// ```
/// use rxnorm_types::{SatRow, Suppress};
///
/// let row = SatRow {
///     rxcui: 308191,
///     atn: "NDC".to_string(),
///     sab: "RXNORM".to_string(),
///     atv: "00093310905".to_string(),
///     suppress: Suppress::NotSuppressed,
/// };
///
/// assert!(row.suppress.is_active());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SatRow {
    /// Concept the attribute belongs to.
    pub rxcui: Rxcui,
    /// Attribute name (ATN), e.g. `NDC`.
    pub atn: String,
    /// Source vocabulary abbreviation (SAB).
    pub sab: String,
    /// Attribute value (ATV).
    pub atv: String,
    /// Suppression flag.
    pub suppress: Suppress,
}
