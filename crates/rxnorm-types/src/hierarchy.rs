//! Ingredient hierarchy node types.
//!
//! The exported hierarchy has a fixed shape, one node type per level:
//!
//! ```text
//! IngredientNode (IN | PIN | MIN)
//! └─ ComponentNode (SCDC)
//!    └─ ClinicalDrugNode (SCD)          NDCs
//!       ├─ PackNode (GPCK | BPCK)       NDCs
//!       └─ BrandedDrugNode (SBD)        NDCs
//!          └─ BrandNameNode (BN)
//! ```
//!
//! With the `serde` feature the nodes serialize to the JSON layout the web
//! viewer reads: `Name`, `RXCUI` (as a string), `TTY`, then the level's
//! optional codes and children. Empty lists and missing values are left out.

use crate::{Rxcui, TermType};

/// Root of one ingredient tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IngredientNode {
    /// Display name.
    #[cfg_attr(feature = "serde", serde(rename = "Name"))]
    pub name: String,
    /// Concept identifier.
    #[cfg_attr(feature = "serde", serde(rename = "RXCUI", with = "crate::rxcui::as_string"))]
    pub rxcui: Rxcui,
    /// IN, PIN or MIN.
    #[cfg_attr(feature = "serde", serde(rename = "TTY"))]
    pub tty: TermType,
    /// UNII cross-reference code, when one is known.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "UNII", default, skip_serializing_if = "Option::is_none")
    )]
    pub unii: Option<String>,
    /// Components (SCDC); never empty in exported output.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "SCDCs", default, skip_serializing_if = "Vec::is_empty")
    )]
    pub components: Vec<ComponentNode>,
}

/// A clinical drug component (SCDC).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentNode {
    /// Display name.
    #[cfg_attr(feature = "serde", serde(rename = "Name"))]
    pub name: String,
    /// Concept identifier.
    #[cfg_attr(feature = "serde", serde(rename = "RXCUI", with = "crate::rxcui::as_string"))]
    pub rxcui: Rxcui,
    /// Always SCDC.
    #[cfg_attr(feature = "serde", serde(rename = "TTY"))]
    pub tty: TermType,
    /// Clinical drugs (SCD) built from this component.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "SCDs", default, skip_serializing_if = "Vec::is_empty")
    )]
    pub clinical_drugs: Vec<ClinicalDrugNode>,
}

/// A clinical drug (SCD).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClinicalDrugNode {
    /// Display name.
    #[cfg_attr(feature = "serde", serde(rename = "Name"))]
    pub name: String,
    /// Concept identifier.
    #[cfg_attr(feature = "serde", serde(rename = "RXCUI", with = "crate::rxcui::as_string"))]
    pub rxcui: Rxcui,
    /// Always SCD.
    #[cfg_attr(feature = "serde", serde(rename = "TTY"))]
    pub tty: TermType,
    /// Product codes, in source order.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "NDCs", default, skip_serializing_if = "Vec::is_empty")
    )]
    pub ndcs: Vec<String>,
    /// Generic packs (GPCK) containing this drug.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "GPCKs", default, skip_serializing_if = "Vec::is_empty")
    )]
    pub generic_packs: Vec<PackNode>,
    /// Branded packs (BPCK) containing this drug.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "BPCKs", default, skip_serializing_if = "Vec::is_empty")
    )]
    pub branded_packs: Vec<PackNode>,
    /// Branded drugs (SBD) that are tradenames of this drug.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "SBDs", default, skip_serializing_if = "Vec::is_empty")
    )]
    pub branded_drugs: Vec<BrandedDrugNode>,
}

/// A generic or branded pack (GPCK or BPCK).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackNode {
    /// Display name.
    #[cfg_attr(feature = "serde", serde(rename = "Name"))]
    pub name: String,
    /// Concept identifier.
    #[cfg_attr(feature = "serde", serde(rename = "RXCUI", with = "crate::rxcui::as_string"))]
    pub rxcui: Rxcui,
    /// GPCK or BPCK.
    #[cfg_attr(feature = "serde", serde(rename = "TTY"))]
    pub tty: TermType,
    /// Product codes, in source order.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "NDCs", default, skip_serializing_if = "Vec::is_empty")
    )]
    pub ndcs: Vec<String>,
}

/// A branded drug (SBD).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BrandedDrugNode {
    /// Display name.
    #[cfg_attr(feature = "serde", serde(rename = "Name"))]
    pub name: String,
    /// Concept identifier.
    #[cfg_attr(feature = "serde", serde(rename = "RXCUI", with = "crate::rxcui::as_string"))]
    pub rxcui: Rxcui,
    /// Always SBD.
    #[cfg_attr(feature = "serde", serde(rename = "TTY"))]
    pub tty: TermType,
    /// Product codes, in source order.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "NDCs", default, skip_serializing_if = "Vec::is_empty")
    )]
    pub ndcs: Vec<String>,
    /// Brand names (BN).
    #[cfg_attr(
        feature = "serde",
        serde(rename = "BNs", default, skip_serializing_if = "Vec::is_empty")
    )]
    pub brand_names: Vec<BrandNameNode>,
}

/// A brand name (BN). Leaf level, no codes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BrandNameNode {
    /// Display name.
    #[cfg_attr(feature = "serde", serde(rename = "Name"))]
    pub name: String,
    /// Concept identifier.
    #[cfg_attr(feature = "serde", serde(rename = "RXCUI", with = "crate::rxcui::as_string"))]
    pub rxcui: Rxcui,
    /// Always BN.
    #[cfg_attr(feature = "serde", serde(rename = "TTY"))]
    pub tty: TermType,
}

impl IngredientNode {
    /// Counts every node in this tree, the root included.
    pub fn node_count(&self) -> usize {
        1 + self
            .components
            .iter()
            .map(|c| {
                1 + c
                    .clinical_drugs
                    .iter()
                    .map(ClinicalDrugNode::node_count)
                    .sum::<usize>()
            })
            .sum::<usize>()
    }
}

impl ClinicalDrugNode {
    fn node_count(&self) -> usize {
        1 + self.generic_packs.len()
            + self.branded_packs.len()
            + self
                .branded_drugs
                .iter()
                .map(|b| 1 + b.brand_names.len())
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clinical_drug(rxcui: Rxcui) -> ClinicalDrugNode {
        ClinicalDrugNode {
            name: "amoxicillin 500 MG Oral Capsule".to_string(),
            rxcui,
            tty: TermType::ClinicalDrug,
            ndcs: vec![],
            generic_packs: vec![],
            branded_packs: vec![],
            branded_drugs: vec![],
        }
    }

    #[test]
    fn test_node_count() {
        let mut scd = clinical_drug(3);
        scd.branded_drugs.push(BrandedDrugNode {
            name: "Amoxil 500 MG Oral Capsule".to_string(),
            rxcui: 4,
            tty: TermType::BrandedDrug,
            ndcs: vec![],
            brand_names: vec![BrandNameNode {
                name: "Amoxil".to_string(),
                rxcui: 5,
                tty: TermType::BrandName,
            }],
        });

        let ingredient = IngredientNode {
            name: "amoxicillin".to_string(),
            rxcui: 1,
            tty: TermType::Ingredient,
            unii: None,
            components: vec![ComponentNode {
                name: "amoxicillin 500 MG".to_string(),
                rxcui: 2,
                tty: TermType::Component,
                clinical_drugs: vec![scd],
            }],
        };

        assert_eq!(ingredient.node_count(), 5);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialized_field_layout() {
        let mut scd = clinical_drug(308191);
        scd.ndcs.push("00093310905".to_string());

        let json = serde_json::to_value(&scd).unwrap();
        assert_eq!(json["RXCUI"], "308191");
        assert_eq!(json["TTY"], "SCD");
        assert_eq!(json["NDCs"][0], "00093310905");
        // Empty child lists are omitted, not null.
        assert!(json.get("GPCKs").is_none());
        assert!(json.get("SBDs").is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_ingredient_field_order() {
        let ingredient = IngredientNode {
            name: "amoxicillin".to_string(),
            rxcui: 723,
            tty: TermType::Ingredient,
            unii: Some("804826J2HU".to_string()),
            components: vec![],
        };

        let json = serde_json::to_string(&ingredient).unwrap();
        assert_eq!(
            json,
            r#"{"Name":"amoxicillin","RXCUI":"723","TTY":"IN","UNII":"804826J2HU"}"#
        );
    }
}
