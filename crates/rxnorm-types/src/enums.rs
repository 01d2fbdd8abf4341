//! RxNorm enumeration types.
//!
//! This module provides enum representations for the coded values the
//! hierarchy export cares about: term types (TTY), suppression flags, and
//! relationship label families and categories.

/// RxNorm term type (TTY) of a concept row.
///
/// Only the term types that take part in the ingredient hierarchy, plus the
/// `SU` rows that carry UNII codes, are modelled. Everything else in
/// `RXNCONSO.RRF` is outside the export.
///
/// # Examples
///
/// ```
/// use rxnorm_types::TermType;
///
/// assert_eq!(TermType::from_code("SCD"), Some(TermType::ClinicalDrug));
/// assert_eq!(TermType::BrandName.code(), "BN");
/// assert_eq!(TermType::from_code("SY"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TermType {
    /// Ingredient (IN).
    #[cfg_attr(feature = "serde", serde(rename = "IN"))]
    Ingredient,
    /// Precise ingredient, usually a salt or ester form (PIN).
    #[cfg_attr(feature = "serde", serde(rename = "PIN"))]
    PreciseIngredient,
    /// Multiple ingredients (MIN).
    #[cfg_attr(feature = "serde", serde(rename = "MIN"))]
    MultipleIngredients,
    /// Semantic clinical drug component: ingredient plus strength (SCDC).
    #[cfg_attr(feature = "serde", serde(rename = "SCDC"))]
    Component,
    /// Semantic clinical drug (SCD).
    #[cfg_attr(feature = "serde", serde(rename = "SCD"))]
    ClinicalDrug,
    /// Generic pack (GPCK).
    #[cfg_attr(feature = "serde", serde(rename = "GPCK"))]
    GenericPack,
    /// Branded pack (BPCK).
    #[cfg_attr(feature = "serde", serde(rename = "BPCK"))]
    BrandedPack,
    /// Semantic branded drug (SBD).
    #[cfg_attr(feature = "serde", serde(rename = "SBD"))]
    BrandedDrug,
    /// Brand name (BN).
    #[cfg_attr(feature = "serde", serde(rename = "BN"))]
    BrandName,
    /// Substance row carrying a UNII code (SU, from the MTHSPL vocabulary).
    #[cfg_attr(feature = "serde", serde(rename = "SU"))]
    Substance,
}

impl TermType {
    /// Every term type that appears as a node in the ingredient hierarchy.
    pub const HIERARCHY: [TermType; 9] = [
        TermType::Ingredient,
        TermType::PreciseIngredient,
        TermType::MultipleIngredients,
        TermType::Component,
        TermType::ClinicalDrug,
        TermType::GenericPack,
        TermType::BrandedPack,
        TermType::BrandedDrug,
        TermType::BrandName,
    ];

    /// Creates a TermType from its RRF code.
    ///
    /// Returns `None` for term types outside the hierarchy.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "IN" => Some(Self::Ingredient),
            "PIN" => Some(Self::PreciseIngredient),
            "MIN" => Some(Self::MultipleIngredients),
            "SCDC" => Some(Self::Component),
            "SCD" => Some(Self::ClinicalDrug),
            "GPCK" => Some(Self::GenericPack),
            "BPCK" => Some(Self::BrandedPack),
            "SBD" => Some(Self::BrandedDrug),
            "BN" => Some(Self::BrandName),
            "SU" => Some(Self::Substance),
            _ => None,
        }
    }

    /// Returns the RRF code for this term type.
    pub fn code(self) -> &'static str {
        match self {
            Self::Ingredient => "IN",
            Self::PreciseIngredient => "PIN",
            Self::MultipleIngredients => "MIN",
            Self::Component => "SCDC",
            Self::ClinicalDrug => "SCD",
            Self::GenericPack => "GPCK",
            Self::BrandedPack => "BPCK",
            Self::BrandedDrug => "SBD",
            Self::BrandName => "BN",
            Self::Substance => "SU",
        }
    }

    /// Returns true for the three root-level ingredient types.
    pub fn is_ingredient(self) -> bool {
        matches!(
            self,
            Self::Ingredient | Self::PreciseIngredient | Self::MultipleIngredients
        )
    }

    /// Returns true for the two pack types.
    pub fn is_pack(self) -> bool {
        matches!(self, Self::GenericPack | Self::BrandedPack)
    }

    /// Returns true if nodes of this type carry a code list (NDCs).
    pub fn carries_codes(self) -> bool {
        matches!(
            self,
            Self::ClinicalDrug | Self::GenericPack | Self::BrandedPack | Self::BrandedDrug
        )
    }
}

impl std::fmt::Display for TermType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Suppression flag (SUPPRESS column) on concept and attribute rows.
///
/// # Examples
///
/// ```
/// use rxnorm_types::Suppress;
///
/// let flag = Suppress::from_code("N");
/// assert_eq!(flag, Some(Suppress::NotSuppressed));
/// assert!(flag.unwrap().is_active());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Suppress {
    /// Not suppressed (N).
    NotSuppressed,
    /// Obsolete content (O).
    Obsolete,
    /// Suppressed by an editor (E).
    Editor,
    /// Suppressible by the source (Y).
    Suppressible,
}

impl Suppress {
    /// Creates a Suppress flag from its RRF code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "N" => Some(Self::NotSuppressed),
            "O" => Some(Self::Obsolete),
            "E" => Some(Self::Editor),
            "Y" => Some(Self::Suppressible),
            _ => None,
        }
    }

    /// Returns the RRF code for this flag.
    pub fn code(self) -> &'static str {
        match self {
            Self::NotSuppressed => "N",
            Self::Obsolete => "O",
            Self::Editor => "E",
            Self::Suppressible => "Y",
        }
    }

    /// Returns true if the row is in active use.
    pub fn is_active(self) -> bool {
        self == Self::NotSuppressed
    }
}

/// A family of relationship labels (RELA values).
///
/// RXNREL stores every relationship twice, once per direction, under two
/// inverse labels. A family groups both labels so that either row maps to
/// the same undirected edge.
///
/// # Examples
///
/// ```
/// use rxnorm_types::LabelFamily;
///
/// assert_eq!(LabelFamily::from_rela("has_tradename"), Some(LabelFamily::Tradename));
/// assert_eq!(LabelFamily::from_rela("tradename_of"), Some(LabelFamily::Tradename));
/// assert_eq!(LabelFamily::from_rela("has_dose_form"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelFamily {
    /// `has_ingredient` / `ingredient_of`.
    Ingredient,
    /// `has_precise_ingredient` / `precise_ingredient_of`.
    PreciseIngredient,
    /// `constitutes` / `consists_of`.
    Constitutes,
    /// `contains` / `contained_in`.
    Contains,
    /// `has_tradename` / `tradename_of`.
    Tradename,
    /// `has_ingredients` / `ingredients_of`.
    MultipleIngredients,
}

impl LabelFamily {
    /// Maps a RELA value to its family.
    pub fn from_rela(rela: &str) -> Option<Self> {
        match rela {
            "has_ingredient" | "ingredient_of" => Some(Self::Ingredient),
            "has_precise_ingredient" | "precise_ingredient_of" => Some(Self::PreciseIngredient),
            "constitutes" | "consists_of" => Some(Self::Constitutes),
            "contains" | "contained_in" => Some(Self::Contains),
            "has_tradename" | "tradename_of" => Some(Self::Tradename),
            "has_ingredients" | "ingredients_of" => Some(Self::MultipleIngredients),
            _ => None,
        }
    }
}

/// The canonical, undirected edge category between two hierarchy concepts.
///
/// A category is resolved once, when a relationship row is ingested, from
/// its label family and the term types of both endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationCategory {
    /// IN or MIN to SCDC.
    IngredientComponent,
    /// PIN to SCDC.
    PreciseIngredientComponent,
    /// SCDC to SCD.
    ComponentClinicalDrug,
    /// SCD to GPCK or BPCK.
    ClinicalDrugPack,
    /// SCD to SBD.
    ClinicalDrugBrandedDrug,
    /// SBD to BN.
    BrandedDrugBrandName,
    /// IN to PIN.
    IngredientPreciseIngredient,
    /// MIN to IN.
    MultipleIngredientIngredient,
    /// MIN to SCD.
    MultipleIngredientClinicalDrug,
}

impl RelationCategory {
    /// Resolves the category for a relationship between two typed endpoints.
    ///
    /// Endpoint order does not matter. Returns `None` when the family does
    /// not link these two types in the hierarchy.
    ///
    /// # Examples
    ///
    /// ```
    /// use rxnorm_types::{LabelFamily, RelationCategory, TermType};
    ///
    /// let forward = RelationCategory::classify(
    ///     LabelFamily::Ingredient, TermType::Ingredient, TermType::Component);
    /// let reverse = RelationCategory::classify(
    ///     LabelFamily::Ingredient, TermType::Component, TermType::Ingredient);
    /// assert_eq!(forward, Some(RelationCategory::IngredientComponent));
    /// assert_eq!(forward, reverse);
    /// ```
    pub fn classify(family: LabelFamily, a: TermType, b: TermType) -> Option<Self> {
        Self::classify_ordered(family, a, b).or_else(|| Self::classify_ordered(family, b, a))
    }

    fn classify_ordered(family: LabelFamily, a: TermType, b: TermType) -> Option<Self> {
        use LabelFamily as F;
        use TermType as T;

        match (family, a, b) {
            (F::Ingredient, T::Ingredient | T::MultipleIngredients, T::Component) => {
                Some(Self::IngredientComponent)
            }
            (F::Ingredient, T::BrandedDrug, T::BrandName) => Some(Self::BrandedDrugBrandName),
            (F::PreciseIngredient, T::PreciseIngredient, T::Component) => {
                Some(Self::PreciseIngredientComponent)
            }
            (F::PreciseIngredient, T::Ingredient, T::PreciseIngredient) => {
                Some(Self::IngredientPreciseIngredient)
            }
            (F::Constitutes, T::Component, T::ClinicalDrug) => Some(Self::ComponentClinicalDrug),
            (F::Contains, T::ClinicalDrug, T::GenericPack | T::BrandedPack) => {
                Some(Self::ClinicalDrugPack)
            }
            (F::Tradename, T::ClinicalDrug, T::BrandedDrug) => Some(Self::ClinicalDrugBrandedDrug),
            (F::Ingredient | F::MultipleIngredients, T::MultipleIngredients, T::Ingredient) => {
                Some(Self::MultipleIngredientIngredient)
            }
            (F::Ingredient | F::MultipleIngredients, T::MultipleIngredients, T::ClinicalDrug) => {
                Some(Self::MultipleIngredientClinicalDrug)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_type_roundtrip_codes() {
        for tty in TermType::HIERARCHY {
            assert_eq!(TermType::from_code(tty.code()), Some(tty));
        }
        assert_eq!(TermType::from_code("TMSY"), None);
    }

    #[test]
    fn test_term_type_groups() {
        assert!(TermType::PreciseIngredient.is_ingredient());
        assert!(!TermType::Component.is_ingredient());
        assert!(TermType::BrandedPack.is_pack());
        assert!(TermType::BrandedDrug.carries_codes());
        assert!(!TermType::BrandName.carries_codes());
        assert!(!TermType::Component.carries_codes());
    }

    #[test]
    fn test_suppress_flags() {
        assert_eq!(Suppress::from_code("O"), Some(Suppress::Obsolete));
        assert!(!Suppress::Suppressible.is_active());
        assert_eq!(Suppress::from_code("X"), None);
    }

    #[test]
    fn test_shared_label_resolves_by_endpoint_types() {
        // has_ingredient links both IN-SCDC and SBD-BN.
        assert_eq!(
            RelationCategory::classify(
                LabelFamily::Ingredient,
                TermType::BrandName,
                TermType::BrandedDrug
            ),
            Some(RelationCategory::BrandedDrugBrandName)
        );
        assert_eq!(
            RelationCategory::classify(
                LabelFamily::Ingredient,
                TermType::Component,
                TermType::MultipleIngredients
            ),
            Some(RelationCategory::IngredientComponent)
        );
    }

    #[test]
    fn test_unrelated_pairing_is_rejected() {
        assert_eq!(
            RelationCategory::classify(
                LabelFamily::Tradename,
                TermType::Component,
                TermType::BrandName
            ),
            None
        );
        assert_eq!(
            RelationCategory::classify(
                LabelFamily::PreciseIngredient,
                TermType::MultipleIngredients,
                TermType::Component
            ),
            None
        );
    }
}
