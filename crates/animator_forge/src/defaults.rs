//! Overridable authoring conventions.

use animator_forge_core::assets::MotionRef;
use animator_forge_core::state_machine::State;
use animator_forge_core::transition::TransitionSettings;

/// Conventions applied to freshly created graph nodes and layer names.
///
/// The trait is the seam for projects that want different grid spacing,
/// write-defaults policy or layer naming; everything else in the builder
/// goes through it rather than hard-coding values.
pub trait Defaults {
    /// Pixel size of one placement grid cell.
    fn grid(&self) -> (f32, f32);

    /// Configures a freshly created state. `placeholder` is the layer's
    /// generated placeholder motion, assigned when the state has none so the
    /// graph never contains motion-less states.
    fn configure_state(&self, state: &mut State, placeholder: &MotionRef);

    /// Configures a freshly created transition: exit time disabled, zero
    /// duration, fixed duration in the standard implementation.
    fn configure_transition(&self, settings: &mut TransitionSettings);

    /// Full layer name for the system's main layer.
    fn layer_name(&self, system_name: &str) -> String;

    /// Full layer name for a supporting layer of the system.
    fn layer_name_with_suffix(&self, system_name: &str, suffix: &str) -> String;
}

/// The stock conventions.
#[derive(Debug, Clone)]
pub struct StandardDefaults {
    /// Write-defaults flag stamped onto every new state.
    pub write_defaults: bool,
    pub grid: (f32, f32),
}

impl Default for StandardDefaults {
    fn default() -> Self {
        Self {
            write_defaults: false,
            grid: (250.0, 70.0),
        }
    }
}

impl Defaults for StandardDefaults {
    fn grid(&self) -> (f32, f32) {
        self.grid
    }

    fn configure_state(&self, state: &mut State, placeholder: &MotionRef) {
        state.write_defaults = self.write_defaults;
        if state.motion.is_none() {
            state.motion = Some(placeholder.clone());
        }
    }

    fn configure_transition(&self, settings: &mut TransitionSettings) {
        *settings = TransitionSettings::default();
    }

    fn layer_name(&self, system_name: &str) -> String {
        system_name.to_owned()
    }

    fn layer_name_with_suffix(&self, system_name: &str, suffix: &str) -> String {
        format!("{system_name}__{suffix}")
    }
}
