use std::cell::RefCell;
use std::rc::Rc;

use animator_forge_core::assets::AssetContainer;
use animator_forge_core::controller::Controller;
use animator_forge_core::id::LayerId;
use animator_forge_core::state_machine::StateMachine;

/// The single-threaded document shared by every fluent handle: the
/// controller under construction plus the container receiving generated
/// sub-resources.
///
/// A build script exclusively owns one document; handles are lightweight
/// clones of the same `Rc` and mutate it immediately, with no deferred
/// commit step.
#[derive(Debug)]
pub(crate) struct Document {
    pub controller: Controller,
    pub container: AssetContainer,
}

pub(crate) type DocRef = Rc<RefCell<Document>>;

/// Runs `f` against the layer's root sub-graph.
///
/// Panics when the layer no longer exists. A handle used after its layer was
/// removed from the controller is a programmer error and must fail loudly
/// rather than degrade.
pub(crate) fn with_layer_machine<R>(
    doc: &DocRef,
    layer_id: LayerId,
    f: impl FnOnce(&mut StateMachine) -> R,
) -> R {
    let mut doc = doc.borrow_mut();
    let layer = doc
        .controller
        .layer_mut(layer_id)
        .expect("handle used after its layer was removed from the controller");
    f(&mut layer.state_machine)
}
