//! The authoring entry point and layer orchestrator.

use std::cell::{Ref, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use animator_forge_core::assets::{AssetContainer, MaskRef, MotionRef, SubResourceKind};
use animator_forge_core::controller::Controller;
use animator_forge_core::id::SubResourceId;

use crate::defaults::{Defaults, StandardDefaults};
use crate::document::{DocRef, Document};
use crate::layers::LayerBuilder;

/// Fixed anchor cells for the three sub-graph markers, in grid units.
const ANY_STATE_ANCHOR: (i32, i32) = (0, 7);
const ENTRY_ANCHOR: (i32, i32) = (0, -1);
const EXIT_ANCHOR: (i32, i32) = (7, -1);

/// Configuration of one authoring run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorConfig {
    /// Name of the system being authored; layer names derive from it.
    pub system_name: String,
    /// Key namespacing every generated sub-resource name, so several systems
    /// can share one container asset without colliding.
    pub asset_key: String,
}

impl AuthorConfig {
    pub fn new(system_name: impl Into<String>, asset_key: impl Into<String>) -> Self {
        Self {
            system_name: system_name.into(),
            asset_key: asset_key.into(),
        }
    }
}

/// The authoring session over one controller asset.
///
/// Owns the shared document that every fluent handle mutates. A single build
/// script owns the author; the graph under construction supports no
/// concurrent callers and needs no locking.
pub struct Author {
    doc: DocRef,
    config: AuthorConfig,
    defaults: Rc<dyn Defaults>,
    /// Sub-resources registered by this session, i.e. the keep-set of the
    /// orphan sweep.
    live: RefCell<HashSet<SubResourceId>>,
}

impl Author {
    /// Starts authoring a fresh controller.
    pub fn new(config: AuthorConfig) -> Self {
        Self::with_controller(config, Controller::new(), AssetContainer::new())
    }

    /// Starts authoring over an existing controller and its container, e.g.
    /// one loaded by the persistence layer. Rebuilding layers the controller
    /// already holds is the expected, idempotent case.
    pub fn with_controller(
        config: AuthorConfig,
        controller: Controller,
        container: AssetContainer,
    ) -> Self {
        Self {
            doc: Rc::new(RefCell::new(Document {
                controller,
                container,
            })),
            config,
            defaults: Rc::new(StandardDefaults::default()),
            live: RefCell::new(HashSet::new()),
        }
    }

    /// Swaps in different authoring conventions.
    pub fn with_defaults(mut self, defaults: impl Defaults + 'static) -> Self {
        self.defaults = Rc::new(defaults);
        self
    }

    // ---- layer orchestration -------------------------------------------

    /// The system's main layer, named for the system itself.
    pub fn create_main_layer(&self) -> LayerBuilder {
        let name = self.defaults.layer_name(&self.config.system_name);
        self.create_or_rebuild_layer(&name, 1.0, None)
    }

    /// A supporting layer of the system, named with the given suffix.
    pub fn create_supporting_layer(&self, suffix: &str) -> LayerBuilder {
        let name = self
            .defaults
            .layer_name_with_suffix(&self.config.system_name, suffix);
        self.create_or_rebuild_layer(&name, 1.0, None)
    }

    /// Creates the named layer, or rebuilds it in place when it already
    /// exists.
    ///
    /// Rebuilding wipes every state, transition and nested graph out of the
    /// layer's sub-graph but leaves the layer's slot where it was: its
    /// ordinal position in the controller's layer list and its identity are
    /// preserved, which is what makes re-running a build script idempotent.
    /// Weight and mask are applied to the slot either way, marker anchors
    /// are pinned to their fixed offsets, and undo bookkeeping is switched
    /// off on the sub-graph.
    pub fn create_or_rebuild_layer(
        &self,
        name: &str,
        weight: f32,
        mask: Option<MaskRef>,
    ) -> LayerBuilder {
        let placeholder = self.new_motion(&format!("{name}__placeholder"));

        let mut doc = self.doc.borrow_mut();
        let controller = &mut doc.controller;
        let layer_id = match controller.find_layer_index(name) {
            Some(index) => {
                debug!(layer = name, index, "rebuilding existing layer in place");
                let layer = &mut controller.layers[index];
                layer.state_machine.clear_graph();
                layer.id
            }
            None => {
                debug!(layer = name, "creating new layer");
                controller.add_layer(name)
            }
        };

        let grid = self.defaults.grid();
        if let Some(layer) = controller.layer_mut(layer_id) {
            layer.weight = weight;
            layer.mask = mask;

            let machine = &mut layer.state_machine;
            machine.record_undo = false;
            machine.any_state_position = grid_cell(ANY_STATE_ANCHOR, grid);
            machine.entry_position = grid_cell(ENTRY_ANCHOR, grid);
            machine.exit_position = grid_cell(EXIT_ANCHOR, grid);
        }
        drop(doc);

        LayerBuilder::new(
            self.doc.clone(),
            layer_id,
            self.defaults.clone(),
            placeholder,
        )
    }

    /// Removes the named layer. Removing an absent layer is a no-op.
    pub fn remove_layer(&self, name: &str) {
        self.doc.borrow_mut().controller.remove_layer(name);
    }

    // ---- generated sub-resources ---------------------------------------

    /// Registers a new motion in the container asset under a
    /// collision-resistant, asset-key-namespaced name.
    pub fn new_motion(&self, base: &str) -> MotionRef {
        let (id, name) = self.register(SubResourceKind::Motion, base);
        MotionRef {
            name,
            resource: Some(id),
        }
    }

    /// Registers a new blend graph in the container asset.
    pub fn new_blend_graph(&self, base: &str) -> MotionRef {
        let (id, name) = self.register(SubResourceKind::BlendGraph, base);
        MotionRef {
            name,
            resource: Some(id),
        }
    }

    /// Registers a new mask in the container asset.
    pub fn new_mask(&self, base: &str) -> MaskRef {
        let (id, name) = self.register(SubResourceKind::Mask, base);
        MaskRef {
            name,
            resource: Some(id),
        }
    }

    fn register(&self, kind: SubResourceKind, base: &str) -> (SubResourceId, String) {
        let namespaced = format!("{}__{}", self.config.asset_key, base);
        let mut doc = self.doc.borrow_mut();
        let resource = doc.container.register(kind, &namespaced);
        let (id, name) = (resource.id, resource.name.clone());
        self.live.borrow_mut().insert(id);
        (id, name)
    }

    /// Sweeps container sub-resources left behind by previous build passes,
    /// keeping everything registered through this session.
    ///
    /// Rebuilding a layer wipes its sub-graph but cannot reach stand-alone
    /// resources (masks, abandoned motions) that live outside it, so a full
    /// rebuild pass should end with this call.
    pub fn clear_previous_assets(&self) {
        let keep = self.live.borrow().clone();
        let removed = self.doc.borrow_mut().container.sweep_orphaned(&keep);
        if removed > 0 {
            info!(removed, "cleared sub-resources from previous build passes");
        }
    }

    /// Sweeps container sub-resources against an explicit keep-set.
    pub fn sweep_orphaned(&self, keep: &HashSet<SubResourceId>) -> usize {
        self.doc.borrow_mut().container.sweep_orphaned(keep)
    }

    // ---- results --------------------------------------------------------

    pub fn controller(&self) -> Ref<'_, Controller> {
        Ref::map(self.doc.borrow(), |doc| &doc.controller)
    }

    pub fn container(&self) -> Ref<'_, AssetContainer> {
        Ref::map(self.doc.borrow(), |doc| &doc.container)
    }

    /// Hands the finished controller and container to the persistence layer.
    /// Clones if fluent handles are still alive.
    pub fn finish(self) -> (Controller, AssetContainer) {
        match Rc::try_unwrap(self.doc) {
            Ok(cell) => {
                let doc = cell.into_inner();
                (doc.controller, doc.container)
            }
            Err(doc) => {
                let doc = doc.borrow();
                (doc.controller.clone(), doc.container.clone())
            }
        }
    }
}

fn grid_cell(cell: (i32, i32), grid: (f32, f32)) -> (f32, f32) {
    (cell.0 as f32 * grid.0, cell.1 as f32 * grid.1)
}
