// src/dag/dep_fuser.rs

//! Rewrite dependency edges through a [`FusionMap`].

use std::collections::BTreeSet;

use tracing::debug;

use crate::dag::{DepMap, FusionMap};

/// Translate every edge endpoint through the fusion map and deduplicate.
///
/// Sources that collapse into the same aggregate have their child sets
/// unioned. Edges between two members of the same group would become
/// self-loops on the aggregate; those are dropped, since the members were
/// declared concurrent by fusing them.
///
/// Applying this with an empty fusion map returns an identical map.
pub fn fuse_dependencies(deps: &DepMap, fusion_map: &FusionMap) -> DepMap {
    let inverse = fusion_map.inverse();
    let translate = |id: &str| -> String {
        inverse.get(id).copied().unwrap_or(id).to_string()
    };

    let mut fused = DepMap::new();
    let mut dropped = 0usize;

    for (parent, children) in deps.iter() {
        let src = translate(parent);
        let mut dsts: BTreeSet<String> = BTreeSet::new();

        for child in children.iter() {
            let dst = translate(child);
            if dst == src {
                dropped += 1;
                continue;
            }
            dsts.insert(dst);
        }

        if dsts.is_empty() {
            continue;
        }
        fused.entry(src).or_default().extend(dsts);
    }

    if dropped > 0 {
        debug!(dropped, "dropped edges internal to a fused group");
    }

    fused
}
