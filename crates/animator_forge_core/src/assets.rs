//! The asset-store collaborator boundary.
//!
//! Generated sub-resources (motions, blend graphs, masks) are registered
//! under a container so an external persistence layer can save them as one
//! unit. The container also implements the collision-resistant naming and
//! the orphan sweep that keeps repeated build passes from accumulating
//! stale resources.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::id::SubResourceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubResourceKind {
    Motion,
    BlendGraph,
    Mask,
}

/// A generated resource attached to the container asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubResource {
    pub id: SubResourceId,
    pub kind: SubResourceKind,
    pub name: String,
}

/// Registry of generated sub-resources belonging to one container asset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssetContainer {
    resources: IndexMap<SubResourceId, SubResource>,
}

impl AssetContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a sub-resource under a name guaranteed not to collide with
    /// any sibling, and returns it.
    pub fn register(&mut self, kind: SubResourceKind, base_name: &str) -> &SubResource {
        let name = self.unique_name(base_name);
        let resource = SubResource {
            id: SubResourceId::new(),
            kind,
            name,
        };
        let id = resource.id;
        self.resources.insert(id, resource);
        &self.resources[&id]
    }

    pub fn get(&self, id: SubResourceId) -> Option<&SubResource> {
        self.resources.get(&id)
    }

    pub fn contains(&self, id: SubResourceId) -> bool {
        self.resources.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubResource> {
        self.resources.values()
    }

    /// A sibling name that does not collide: `base`, then `base__0`,
    /// `base__1`, ... Deterministic, so rebuild passes produce stable names.
    pub fn unique_name(&self, base: &str) -> String {
        if !self.name_taken(base) {
            return base.to_owned();
        }
        let mut n = 0usize;
        loop {
            let candidate = format!("{base}__{n}");
            if !self.name_taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Removes every registered sub-resource not in `keep` and returns how
    /// many were dropped. The sweep is the caller's explicit opt-in after a
    /// rebuild pass; resources owned by wiped sub-graphs are not reclaimed
    /// automatically.
    pub fn sweep_orphaned(&mut self, keep: &HashSet<SubResourceId>) -> usize {
        let before = self.resources.len();
        self.resources.retain(|id, _| keep.contains(id));
        let removed = before - self.resources.len();
        if removed > 0 {
            debug!(removed, "swept orphaned sub-resources");
        }
        removed
    }

    fn name_taken(&self, name: &str) -> bool {
        self.resources.values().any(|r| r.name == name)
    }
}

/// Opaque reference to a motion attached to a state. The graph never
/// inspects its contents.
///
/// `resource` is populated for motions generated into the container; library
/// motions referenced from elsewhere carry only a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionRef {
    pub name: String,
    pub resource: Option<SubResourceId>,
}

impl MotionRef {
    /// Reference to a motion that lives outside the container asset.
    pub fn external(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource: None,
        }
    }

    pub fn registered(resource: &SubResource) -> Self {
        Self {
            name: resource.name.clone(),
            resource: Some(resource.id),
        }
    }
}

/// Opaque reference to an avatar/bone mask applied to a layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskRef {
    pub name: String,
    pub resource: Option<SubResourceId>,
}

impl MaskRef {
    pub fn external(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource: None,
        }
    }

    pub fn registered(resource: &SubResource) -> Self {
        Self {
            name: resource.name.clone(),
            resource: Some(resource.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_names_get_numeric_suffixes() {
        let mut container = AssetContainer::new();
        let first = container.register(SubResourceKind::Motion, "clip").name.clone();
        let second = container.register(SubResourceKind::Motion, "clip").name.clone();
        let third = container.register(SubResourceKind::Motion, "clip").name.clone();

        assert_eq!(first, "clip");
        assert_eq!(second, "clip__0");
        assert_eq!(third, "clip__1");
    }

    #[test]
    fn sweep_keeps_only_the_keep_set() {
        let mut container = AssetContainer::new();
        let keep_id = container.register(SubResourceKind::Motion, "live").id;
        container.register(SubResourceKind::Mask, "stale_a");
        container.register(SubResourceKind::BlendGraph, "stale_b");

        let keep = HashSet::from([keep_id]);
        let removed = container.sweep_orphaned(&keep);

        assert_eq!(removed, 2);
        assert_eq!(container.len(), 1);
        assert!(container.contains(keep_id));
    }
}
