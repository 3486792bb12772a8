// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The area tree: SIA categories, area types and their hierarchy.
//!
//! A [`Taxonomy`] is built once from a scheme's node table. Construction
//! injects the void pseudo types, checks the structural rules of the tree and
//! precomputes the descendant closure of every node, so that all queries are
//! plain lookups afterwards. The taxonomy is immutable once built.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::{AreaType, SiaCategory};

/// A key into the area tree: either a SIA category or an area type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TaxonomyNode {
    Sia(SiaCategory),
    Area(AreaType),
}

impl From<SiaCategory> for TaxonomyNode {
    fn from(c: SiaCategory) -> Self {
        TaxonomyNode::Sia(c)
    }
}

impl From<AreaType> for TaxonomyNode {
    fn from(t: AreaType) -> Self {
        TaxonomyNode::Area(t)
    }
}

impl std::fmt::Display for TaxonomyNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxonomyNode::Sia(c) => write!(f, "{}", c),
            TaxonomyNode::Area(t) => write!(f, "{}", t),
        }
    }
}

/// Depth class of a tree node. Parents always sit on a lower level than
/// their descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AreaTypeLevel {
    SiaCategory = 0,
    BaseAreaType = 1,
    SubAreaType = 2,
}

/// Per-node record of the area tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRecord {
    pub level: AreaTypeLevel,
    /// Direct children only.
    pub children: BTreeSet<AreaType>,
    /// Hex color used by plan renderers.
    pub color: &'static str,
    pub sort_order: u32,
}

impl NodeRecord {
    pub fn new(level: AreaTypeLevel, color: &'static str, sort_order: u32) -> Self {
        Self {
            level,
            children: BTreeSet::new(),
            color,
            sort_order,
        }
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = AreaType>) -> Self {
        self.children.extend(children);
        self
    }
}

/// The full taxonomy mapping.
pub type AreaTree = FxHashMap<TaxonomyNode, NodeRecord>;

/// Pseudo types injected into every tree: (type, sort order, color).
const PSEUDO_TYPES: [(AreaType, u32, &str); 3] = [
    (AreaType::Void, 900, "#FFFFFF"),
    (AreaType::Lightwell, 901, "#F2F2F2"),
    (AreaType::OutdoorVoid, 902, "#E6E6E6"),
];

static NO_CHILDREN: BTreeSet<AreaType> = BTreeSet::new();

/// Validated, immutable area tree with precomputed closures.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    tree: AreaTree,
    descendants: FxHashMap<TaxonomyNode, BTreeSet<AreaType>>,
    parents: FxHashMap<AreaType, TaxonomyNode>,
    sia_categories: FxHashMap<AreaType, SiaCategory>,
}

impl Taxonomy {
    /// Builds a taxonomy from a scheme's node table.
    ///
    /// The void pseudo types are inserted with fixed sort orders, replacing
    /// any record the table may carry for them. Fails with
    /// [`Error::IncompleteScheme`] when:
    /// - a child has no record of its own,
    /// - a child's level is not strictly greater than its parent's,
    /// - an area type has more than one parent,
    /// - a non-void area type cannot be reached from a SIA category,
    /// - a non-void area type is missing from the table.
    pub fn new(scheme: &str, base: AreaTree) -> Result<Self> {
        let incomplete = |reason: String| Error::IncompleteScheme {
            scheme: scheme.to_string(),
            reason,
        };

        let mut tree = base;
        for (area_type, sort_order, color) in PSEUDO_TYPES {
            tree.insert(
                TaxonomyNode::Area(area_type),
                NodeRecord::new(AreaTypeLevel::BaseAreaType, color, sort_order),
            );
        }

        let mut parents: FxHashMap<AreaType, TaxonomyNode> = FxHashMap::default();
        let mut ordered: Vec<(&TaxonomyNode, &NodeRecord)> = tree.iter().collect();
        ordered.sort_by_key(|(node, _)| **node);

        for (node, record) in &ordered {
            for child in &record.children {
                let child_record = tree
                    .get(&TaxonomyNode::Area(*child))
                    .ok_or_else(|| incomplete(format!("{} lists {} without a record", node, child)))?;

                // Strictly increasing levels also rule out cycles.
                if child_record.level <= record.level {
                    return Err(incomplete(format!(
                        "{} ({:?}) is not below its parent {} ({:?})",
                        child, child_record.level, node, record.level
                    )));
                }

                if let Some(previous) = parents.insert(*child, **node) {
                    return Err(incomplete(format!(
                        "{} has two parents: {} and {}",
                        child, previous, node
                    )));
                }
            }
        }

        let mut sia_categories = FxHashMap::default();
        for (node, _) in &ordered {
            let TaxonomyNode::Area(area_type) = node else {
                continue;
            };
            let mut current = TaxonomyNode::Area(*area_type);
            let sia = loop {
                match current {
                    TaxonomyNode::Sia(category) => break Some(category),
                    TaxonomyNode::Area(t) => match parents.get(&t) {
                        Some(parent) => current = *parent,
                        None => break None,
                    },
                }
            };
            match sia {
                Some(category) => {
                    sia_categories.insert(*area_type, category);
                }
                None if area_type.is_void() => {}
                None => {
                    return Err(incomplete(format!(
                        "{} is not reachable from any SIA category",
                        area_type
                    )))
                }
            }
        }

        if let Some(missing) = AreaType::ALL
            .iter()
            .find(|t| !t.is_void() && !sia_categories.contains_key(*t))
        {
            return Err(incomplete(format!(
                "{} is not classified under any SIA category",
                missing
            )));
        }

        let mut descendants = FxHashMap::default();
        for (node, _) in &ordered {
            collect_descendants(&tree, **node, &mut descendants);
        }

        Ok(Self {
            tree,
            descendants,
            parents,
            sia_categories,
        })
    }

    /// The merged tree, pseudo types included.
    pub fn tree(&self) -> &AreaTree {
        &self.tree
    }

    pub fn record(&self, node: impl Into<TaxonomyNode>) -> Option<&NodeRecord> {
        self.tree.get(&node.into())
    }

    pub fn contains(&self, node: impl Into<TaxonomyNode>) -> bool {
        self.tree.contains_key(&node.into())
    }

    /// All descendants (not just direct children) of a node. Unknown nodes
    /// and leaves yield an empty set.
    pub fn children(&self, node: impl Into<TaxonomyNode>) -> &BTreeSet<AreaType> {
        self.descendants.get(&node.into()).unwrap_or(&NO_CHILDREN)
    }

    pub fn parent(&self, area_type: AreaType) -> Option<TaxonomyNode> {
        self.parents.get(&area_type).copied()
    }

    pub fn sia_category(&self, area_type: AreaType) -> Option<SiaCategory> {
        self.sia_categories.get(&area_type).copied()
    }

    /// Nodes whose level equals `level`.
    pub fn nodes_at_level(&self, level: AreaTypeLevel) -> BTreeSet<TaxonomyNode> {
        self.tree
            .iter()
            .filter(|(_, record)| record.level == level)
            .map(|(node, _)| *node)
            .collect()
    }

    /// Every area type without children, ordered by `(sort_order, type)`.
    /// Computed on each call.
    pub fn leaf_area_types(&self) -> Vec<AreaType> {
        let mut leaves: Vec<(u32, AreaType)> = self
            .tree
            .iter()
            .filter_map(|(node, record)| match node {
                TaxonomyNode::Area(t) if record.children.is_empty() => Some((record.sort_order, *t)),
                _ => None,
            })
            .collect();
        leaves.sort();
        leaves.into_iter().map(|(_, t)| t).collect()
    }
}

fn collect_descendants(
    tree: &AreaTree,
    node: TaxonomyNode,
    memo: &mut FxHashMap<TaxonomyNode, BTreeSet<AreaType>>,
) -> BTreeSet<AreaType> {
    if let Some(done) = memo.get(&node) {
        return done.clone();
    }
    let mut out = BTreeSet::new();
    if let Some(record) = tree.get(&node) {
        for child in &record.children {
            out.insert(*child);
            out.extend(collect_descendants(tree, TaxonomyNode::Area(*child), memo));
        }
    }
    memo.insert(node, out.clone());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> AreaTree {
        let mut tree = AreaTree::default();
        tree.insert(
            SiaCategory::Hnf.into(),
            NodeRecord::new(AreaTypeLevel::SiaCategory, "#000000", 0)
                .with_children([AreaType::Room, AreaType::Kitchen]),
        );
        tree.insert(
            AreaType::Room.into(),
            NodeRecord::new(AreaTypeLevel::BaseAreaType, "#111111", 2)
                .with_children([AreaType::Bedroom, AreaType::LivingRoom]),
        );
        tree.insert(
            AreaType::Kitchen.into(),
            NodeRecord::new(AreaTypeLevel::BaseAreaType, "#222222", 1),
        );
        tree.insert(
            AreaType::Bedroom.into(),
            NodeRecord::new(AreaTypeLevel::SubAreaType, "#333333", 3),
        );
        tree.insert(
            AreaType::LivingRoom.into(),
            NodeRecord::new(AreaTypeLevel::SubAreaType, "#444444", 4),
        );

        // Every other concrete type hangs flat under NNF.
        let rest: Vec<AreaType> = AreaType::ALL
            .iter()
            .copied()
            .filter(|t| !t.is_void() && !tree.contains_key(&TaxonomyNode::Area(*t)))
            .collect();
        for (i, t) in rest.iter().enumerate() {
            tree.insert(
                (*t).into(),
                NodeRecord::new(AreaTypeLevel::BaseAreaType, "#777777", 100 + i as u32),
            );
        }
        tree.insert(
            SiaCategory::Nnf.into(),
            NodeRecord::new(AreaTypeLevel::SiaCategory, "#555555", 10).with_children(rest),
        );
        tree
    }

    #[test]
    fn children_are_transitive() {
        let taxonomy = Taxonomy::new("sample", sample_tree()).unwrap();
        let all: Vec<_> = taxonomy.children(SiaCategory::Hnf).iter().copied().collect();
        assert_eq!(
            all,
            vec![AreaType::Room, AreaType::Bedroom, AreaType::LivingRoom, AreaType::Kitchen]
        );
        assert_eq!(taxonomy.children(AreaType::Room).len(), 2);
        assert!(taxonomy.children(AreaType::Kitchen).is_empty());
        assert!(taxonomy.children(SiaCategory::Ff).is_empty());
    }

    #[test]
    fn pseudo_types_are_injected() {
        let taxonomy = Taxonomy::new("sample", sample_tree()).unwrap();
        for t in AreaType::VOID_TYPES {
            assert!(taxonomy.contains(t));
            assert_eq!(taxonomy.sia_category(t), None);
        }
        assert_eq!(taxonomy.record(AreaType::Lightwell).unwrap().sort_order, 901);
    }

    #[test]
    fn leaves_are_restartable_and_ordered() {
        let taxonomy = Taxonomy::new("sample", sample_tree()).unwrap();
        let first = taxonomy.leaf_area_types();
        let second = taxonomy.leaf_area_types();
        assert_eq!(first, second);
        assert_eq!(first.len(), AreaType::ALL.len() - 1);
        assert_eq!(
            first[..3],
            [AreaType::Kitchen, AreaType::Bedroom, AreaType::LivingRoom]
        );
        assert_eq!(
            first[first.len() - 3..],
            [AreaType::Void, AreaType::Lightwell, AreaType::OutdoorVoid]
        );
    }

    #[test]
    fn sia_category_resolves_through_intermediate_parents() {
        let taxonomy = Taxonomy::new("sample", sample_tree()).unwrap();
        assert_eq!(taxonomy.sia_category(AreaType::Bedroom), Some(SiaCategory::Hnf));
        assert_eq!(taxonomy.parent(AreaType::Bedroom), Some(AreaType::Room.into()));
    }

    #[test]
    fn rejects_level_inversion() {
        let mut tree = sample_tree();
        tree.insert(
            AreaType::Bedroom.into(),
            NodeRecord::new(AreaTypeLevel::BaseAreaType, "#333333", 3),
        );
        let err = Taxonomy::new("broken", tree).unwrap_err();
        assert!(matches!(err, Error::IncompleteScheme { .. }));
    }

    #[test]
    fn rejects_two_parents() {
        let mut tree = sample_tree();
        tree.insert(
            SiaCategory::Ff.into(),
            NodeRecord::new(AreaTypeLevel::SiaCategory, "#555555", 20)
                .with_children([AreaType::Kitchen]),
        );
        let err = Taxonomy::new("broken", tree).unwrap_err();
        assert!(err.to_string().contains("two parents"));
    }

    #[test]
    fn rejects_orphan_area_type() {
        let mut tree = sample_tree();
        if let Some(nnf) = tree.get_mut(&TaxonomyNode::Sia(SiaCategory::Nnf)) {
            nnf.children.remove(&AreaType::Corridor);
        }
        let err = Taxonomy::new("broken", tree).unwrap_err();
        assert!(err.to_string().contains("CORRIDOR"));
    }

    #[test]
    fn rejects_partial_table() {
        let mut tree = sample_tree();
        if let Some(nnf) = tree.get_mut(&TaxonomyNode::Sia(SiaCategory::Nnf)) {
            nnf.children.remove(&AreaType::Corridor);
        }
        tree.remove(&TaxonomyNode::Area(AreaType::Corridor));
        let err = Taxonomy::new("broken", tree).unwrap_err();
        assert!(matches!(err, Error::IncompleteScheme { .. }));
        assert!(err
            .to_string()
            .contains("CORRIDOR is not classified under any SIA category"));
    }

    #[test]
    fn rejects_missing_child_record() {
        let mut tree = sample_tree();
        tree.remove(&TaxonomyNode::Area(AreaType::Kitchen));
        assert!(Taxonomy::new("broken", tree).is_err());
    }

    #[test]
    fn nodes_per_level() {
        let taxonomy = Taxonomy::new("sample", sample_tree()).unwrap();
        let top = taxonomy.nodes_at_level(AreaTypeLevel::SiaCategory);
        assert_eq!(
            top.into_iter().collect::<Vec<_>>(),
            vec![TaxonomyNode::Sia(SiaCategory::Hnf), TaxonomyNode::Sia(SiaCategory::Nnf)]
        );
        assert_eq!(taxonomy.nodes_at_level(AreaTypeLevel::SubAreaType).len(), 2);
    }
}
