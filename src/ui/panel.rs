// src/ui/panel.rs
//! The control panel
//!
//! The panel edits a [`ControlState`]; the app pushes that state into the
//! animation driver and the frame renderer once per frame with
//! [`ControlState::apply`], so the widgets never touch the scene directly.

use imgui::{Condition, TreeNodeFlags};

use crate::figure::AnimationDriver;
use crate::gfx::rendering::{FrameRenderer, RenderSettings};
use crate::gfx::scene::ArmAngles;
use crate::performance::FrameMonitor;

pub const GLOBAL_ANGLE_RANGE: (f32, f32) = (-180.0, 180.0);
pub const ARM_ANGLE_RANGE: (f32, f32) = (-90.0, 90.0);
pub const LIGHT_POSITION_RANGE: (f32, f32) = (-10.0, 10.0);

/// Everything the panel can change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlState {
    pub walking: bool,
    /// Set by the poke button, consumed by the next [`ControlState::apply`]
    pub poke_requested: bool,
    pub settings: RenderSettings,
    pub arm: ArmAngles,
}

impl ControlState {
    /// Panel state as it stands for an existing renderer and driver
    pub fn capture(driver: &AnimationDriver, renderer: &FrameRenderer) -> Self {
        Self {
            walking: driver.walking(),
            poke_requested: false,
            settings: renderer.settings,
            arm: renderer.world.arm,
        }
    }

    /// Pushes the panel values out; a requested poke starts at `seconds`
    pub fn apply(&mut self, driver: &mut AnimationDriver, renderer: &mut FrameRenderer, seconds: f64) {
        driver.set_walking(self.walking);
        if std::mem::take(&mut self.poke_requested) {
            driver.poke(seconds);
        }
        renderer.settings = self.settings;
        renderer.world.arm = self.arm;
    }
}

/// Builds the panel for this frame; returns true if any value changed
pub fn control_panel(ui: &imgui::Ui, state: &mut ControlState, monitor: &FrameMonitor) -> bool {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return false;
    }

    let mut changed = false;
    ui.window("Kennel")
        .size([340.0, 520.0], Condition::FirstUseEver)
        .position([20.0, 20.0], Condition::FirstUseEver)
        .collapsible(true)
        .build(|| {
            ui.text(monitor.diagnostics_text());
            ui.separator();

            if ui.collapsing_header("Animation", TreeNodeFlags::DEFAULT_OPEN) {
                changed |= ui.checkbox("Walking", &mut state.walking);
                if ui.button("Poke") {
                    state.poke_requested = true;
                    changed = true;
                }
            }

            if ui.collapsing_header("View", TreeNodeFlags::DEFAULT_OPEN) {
                let (min, max) = GLOBAL_ANGLE_RANGE;
                changed |= ui.slider("Global angle", min, max, &mut state.settings.global_angle);
                changed |= ui.checkbox("Normal view", &mut state.settings.normal_view);
            }

            if ui.collapsing_header("Arm", TreeNodeFlags::DEFAULT_OPEN) {
                let (min, max) = ARM_ANGLE_RANGE;
                changed |= ui.slider("Yellow", min, max, &mut state.arm.yellow);
                changed |= ui.slider("Magenta", min, max, &mut state.arm.magenta);
            }

            if ui.collapsing_header("Lights", TreeNodeFlags::DEFAULT_OPEN) {
                let (min, max) = LIGHT_POSITION_RANGE;
                changed |= ui.checkbox("Light", &mut state.settings.light.enabled);
                changed |= ui
                    .slider_config("Light position", min, max)
                    .build_array(&mut state.settings.light.position);
                changed |= ui.checkbox("Spotlight", &mut state.settings.spotlight.enabled);
            }

            if ui.collapsing_header("Performance", TreeNodeFlags::empty()) {
                monitor.render_ui(ui);
            }

            ui.separator();
            ui.text_disabled("W/S/A/D move  Q/E pan  F fly  drag to look");
        });
    changed
}
