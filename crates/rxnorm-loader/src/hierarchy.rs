//! Ingredient hierarchy construction.
//!
//! Walks a fixed five-level schema from every ingredient concept:
//!
//! ```text
//! IN | PIN | MIN ─► SCDC ─► SCD ─┬─► GPCK | BPCK
//!                                └─► SBD ─► BN
//! ```
//!
//! Each level is a [`Step`]: the edge category to follow and the term types
//! accepted at the far end. Children keep first-discovery order and are
//! deduplicated by RXCUI. Only ingredients without components are dropped.

use std::collections::{BTreeMap, HashSet};

use rxnorm_types::{
    BrandNameNode, BrandedDrugNode, ClinicalDrugNode, ComponentNode, Concept, IngredientNode,
    PackNode, RelationCategory, Rxcui, TermType,
};

use crate::index::{AttributeIndex, ConceptIndex, Indices, RelationIndex};
use crate::types::RrfConfig;

/// One edge of the schema walk.
#[derive(Debug, Clone, Copy)]
struct Step {
    category: RelationCategory,
    child_types: &'static [TermType],
}

const INGREDIENT_COMPONENTS: Step = Step {
    category: RelationCategory::IngredientComponent,
    child_types: &[TermType::Component],
};

const PRECISE_INGREDIENT_COMPONENTS: Step = Step {
    category: RelationCategory::PreciseIngredientComponent,
    child_types: &[TermType::Component],
};

const COMPONENT_CLINICAL_DRUGS: Step = Step {
    category: RelationCategory::ComponentClinicalDrug,
    child_types: &[TermType::ClinicalDrug],
};

const CLINICAL_DRUG_GENERIC_PACKS: Step = Step {
    category: RelationCategory::ClinicalDrugPack,
    child_types: &[TermType::GenericPack],
};

const CLINICAL_DRUG_BRANDED_PACKS: Step = Step {
    category: RelationCategory::ClinicalDrugPack,
    child_types: &[TermType::BrandedPack],
};

const CLINICAL_DRUG_BRANDED_DRUGS: Step = Step {
    category: RelationCategory::ClinicalDrugBrandedDrug,
    child_types: &[TermType::BrandedDrug],
};

const BRANDED_DRUG_BRAND_NAMES: Step = Step {
    category: RelationCategory::BrandedDrugBrandName,
    child_types: &[TermType::BrandName],
};

// Inheritance paths for PIN and MIN.

const PRECISE_INGREDIENT_BASES: Step = Step {
    category: RelationCategory::IngredientPreciseIngredient,
    child_types: &[TermType::Ingredient],
};

const MULTIPLE_INGREDIENT_PARTS: Step = Step {
    category: RelationCategory::MultipleIngredientIngredient,
    child_types: &[TermType::Ingredient],
};

const MULTIPLE_INGREDIENT_CLINICAL_DRUGS: Step = Step {
    category: RelationCategory::MultipleIngredientClinicalDrug,
    child_types: &[TermType::ClinicalDrug],
};

const CLINICAL_DRUG_COMPONENTS: Step = Step {
    category: RelationCategory::ComponentClinicalDrug,
    child_types: &[TermType::Component],
};

/// The assembled forest, in ingredient file order (unsorted).
#[derive(Debug, Default)]
pub struct Hierarchy {
    /// Ingredients with at least one component.
    pub ingredients: Vec<IngredientNode>,
    /// Ingredients dropped because no component was reachable.
    pub dropped_ingredients: usize,
    /// Dropped ingredients per term type (IN, PIN, MIN).
    pub dropped_by_term_type: BTreeMap<TermType, usize>,
}

impl Hierarchy {
    /// Counts every node in the forest.
    pub fn node_count(&self) -> usize {
        self.ingredients.iter().map(IngredientNode::node_count).sum()
    }
}

/// Builds ingredient trees from the three indices.
pub struct HierarchyBuilder<'a> {
    concepts: &'a ConceptIndex,
    relations: &'a RelationIndex,
    attributes: &'a AttributeIndex,
    inherit_components: bool,
}

impl<'a> HierarchyBuilder<'a> {
    /// Creates a builder over a set of indices.
    pub fn new(indices: &'a Indices, config: &RrfConfig) -> Self {
        Self::from_parts(
            &indices.concepts,
            &indices.relations,
            &indices.attributes,
            config,
        )
    }

    /// Creates a builder from individual indices.
    pub fn from_parts(
        concepts: &'a ConceptIndex,
        relations: &'a RelationIndex,
        attributes: &'a AttributeIndex,
        config: &RrfConfig,
    ) -> Self {
        Self {
            concepts,
            relations,
            attributes,
            inherit_components: config.inherit_components,
        }
    }

    /// Builds the tree for every ingredient concept.
    pub fn build(&self) -> Hierarchy {
        let mut hierarchy = Hierarchy::default();

        for concept in self.concepts.ingredients() {
            match self.ingredient(concept) {
                Some(node) => hierarchy.ingredients.push(node),
                None => {
                    hierarchy.dropped_ingredients += 1;
                    *hierarchy.dropped_by_term_type.entry(concept.tty).or_default() += 1;
                }
            }
        }

        hierarchy
    }

    /// Builds one ingredient tree; `None` if it has no components.
    pub fn ingredient(&self, concept: &Concept) -> Option<IngredientNode> {
        let components: Vec<ComponentNode> = self
            .component_ids(concept)
            .into_iter()
            .filter_map(|rxcui| self.concepts.resolve(rxcui))
            .map(|component| self.component(component))
            .collect();

        if components.is_empty() {
            return None;
        }

        Some(IngredientNode {
            name: concept.name.clone(),
            rxcui: concept.rxcui,
            tty: concept.tty,
            unii: self.concepts.normalized_id(concept.rxcui).map(str::to_string),
            components,
        })
    }

    /// Collects component RXCUIs for an ingredient, direct ones first.
    fn component_ids(&self, concept: &Concept) -> Vec<Rxcui> {
        let mut ids = OrderedIds::default();

        let direct = match concept.tty {
            TermType::PreciseIngredient => PRECISE_INGREDIENT_COMPONENTS,
            _ => INGREDIENT_COMPONENTS,
        };
        ids.extend(self.child_ids(concept.rxcui, direct));

        if self.inherit_components {
            match concept.tty {
                TermType::PreciseIngredient => {
                    for base in self.child_ids(concept.rxcui, PRECISE_INGREDIENT_BASES) {
                        ids.extend(self.child_ids(base, INGREDIENT_COMPONENTS));
                    }
                }
                TermType::MultipleIngredients => {
                    for part in self.child_ids(concept.rxcui, MULTIPLE_INGREDIENT_PARTS) {
                        ids.extend(self.child_ids(part, INGREDIENT_COMPONENTS));
                    }
                    for scd in self.child_ids(concept.rxcui, MULTIPLE_INGREDIENT_CLINICAL_DRUGS) {
                        ids.extend(self.child_ids(scd, CLINICAL_DRUG_COMPONENTS));
                    }
                }
                _ => {}
            }
        }

        ids.into_vec()
    }

    fn component(&self, concept: &Concept) -> ComponentNode {
        ComponentNode {
            name: concept.name.clone(),
            rxcui: concept.rxcui,
            tty: concept.tty,
            clinical_drugs: self
                .children(concept.rxcui, COMPONENT_CLINICAL_DRUGS)
                .map(|scd| self.clinical_drug(scd))
                .collect(),
        }
    }

    fn clinical_drug(&self, concept: &Concept) -> ClinicalDrugNode {
        ClinicalDrugNode {
            name: concept.name.clone(),
            rxcui: concept.rxcui,
            tty: concept.tty,
            ndcs: self.attributes.codes_for(concept.rxcui).to_vec(),
            generic_packs: self
                .children(concept.rxcui, CLINICAL_DRUG_GENERIC_PACKS)
                .map(|pack| self.pack(pack))
                .collect(),
            branded_packs: self
                .children(concept.rxcui, CLINICAL_DRUG_BRANDED_PACKS)
                .map(|pack| self.pack(pack))
                .collect(),
            branded_drugs: self
                .children(concept.rxcui, CLINICAL_DRUG_BRANDED_DRUGS)
                .map(|sbd| self.branded_drug(sbd))
                .collect(),
        }
    }

    fn pack(&self, concept: &Concept) -> PackNode {
        PackNode {
            name: concept.name.clone(),
            rxcui: concept.rxcui,
            tty: concept.tty,
            ndcs: self.attributes.codes_for(concept.rxcui).to_vec(),
        }
    }

    fn branded_drug(&self, concept: &Concept) -> BrandedDrugNode {
        BrandedDrugNode {
            name: concept.name.clone(),
            rxcui: concept.rxcui,
            tty: concept.tty,
            ndcs: self.attributes.codes_for(concept.rxcui).to_vec(),
            brand_names: self
                .children(concept.rxcui, BRANDED_DRUG_BRAND_NAMES)
                .map(|bn| BrandNameNode {
                    name: bn.name.clone(),
                    rxcui: bn.rxcui,
                    tty: bn.tty,
                })
                .collect(),
        }
    }

    /// Resolved children of a concept along one step.
    fn children(&self, rxcui: Rxcui, step: Step) -> impl Iterator<Item = &'a Concept> + '_ {
        let concepts = self.concepts;
        self.relations
            .neighbors(rxcui, step.category)
            .iter()
            .filter_map(move |id| concepts.resolve(*id))
            .filter(move |concept| step.child_types.contains(&concept.tty))
    }

    fn child_ids(&self, rxcui: Rxcui, step: Step) -> Vec<Rxcui> {
        self.children(rxcui, step).map(|c| c.rxcui).collect()
    }
}

/// Insertion-ordered set of RXCUIs.
#[derive(Default)]
struct OrderedIds {
    order: Vec<Rxcui>,
    seen: HashSet<Rxcui>,
}

impl OrderedIds {
    fn extend(&mut self, ids: impl IntoIterator<Item = Rxcui>) {
        for id in ids {
            if self.seen.insert(id) {
                self.order.push(id);
            }
        }
    }

    fn into_vec(self) -> Vec<Rxcui> {
        self.order
    }
}
