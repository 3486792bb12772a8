// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grouping of areas into spaces.
//!
//! Two areas belong to the same space when their boundaries run on top of
//! each other for at least a minimum length. The relation is closed
//! transitively with a union-find over the area keys.

use rustc_hash::FxHashMap;

use crate::geometry::shared_boundary_length;
use crate::keys::{AreaKey, SpaceKey};
use crate::model::{PlanLayout, Space};

/// Union-find over indices `0..n`.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[rb.max(ra)] = rb.min(ra);
        }
    }
}

impl PlanLayout {
    /// Recompute all spaces from scratch.
    ///
    /// `tolerance` and `min_shared_length` are expressed in the layout's
    /// current unit. Existing spaces are discarded; every area ends up in
    /// exactly one space.
    pub fn rebuild_spaces(&mut self, tolerance: f64, min_shared_length: f64) {
        let keys: Vec<AreaKey> = self.areas.keys().collect();
        let mut sets = DisjointSet::new(keys.len());

        for i in 0..keys.len() {
            for j in (i + 1)..keys.len() {
                let a = &self.areas[keys[i]].footprint;
                let b = &self.areas[keys[j]].footprint;
                if shared_boundary_length(a, b, tolerance) >= min_shared_length {
                    sets.union(i, j);
                }
            }
        }

        self.spaces.clear();
        let mut by_root: FxHashMap<usize, SpaceKey> = FxHashMap::default();
        for (i, key) in keys.iter().enumerate() {
            let root = sets.find(i);
            let space = *by_root
                .entry(root)
                .or_insert_with(|| self.spaces.insert(Space::default()));
            self.spaces[space].areas.push(*key);
            self.areas[*key].space = Some(space);
        }

        tracing::debug!(
            areas = keys.len(),
            spaces = self.spaces.len(),
            "rebuilt spaces"
        );
    }
}
