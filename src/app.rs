//! Application state and frame stepping
//!
//! All writes to the arm and the prop happen in `handle_event`, before the
//! frame's `step` reads them. `step` builds the transform chain once; the
//! renderer and the grab machine both use that result.

use crate::arm::{
    build_chain, ArmControls, ArmFrames, ArmState, GrabDenial, GrabState, GrabTransition,
    PropState,
};
use crate::config::ArmConfig;
use crate::input::InputEvent;
use crate::rasterizer::{Camera, Mat4};

/// What the renderer needs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    pub frames: ArmFrames,
    /// None until the prop layer has placed the prop
    pub prop: Option<Mat4>,
}

pub struct AppState {
    pub config: ArmConfig,
    pub arm: ArmState,
    pub controls: ArmControls,
    pub prop: PropState,
    pub camera: Camera,
    /// Why the most recent grab attempt failed, cleared on success
    pub last_denial: Option<GrabDenial>,
    quit: bool,
}

impl AppState {
    /// The prop starts unplaced; call `place_prop` once its model is ready.
    pub fn new(config: ArmConfig, viewport: (f32, f32)) -> Self {
        Self {
            arm: ArmState::new(config.initial_pose),
            controls: ArmControls::new(viewport.0, viewport.1),
            prop: PropState::new(config.prop.grasp_offset.to_matrix()),
            camera: config.camera.to_camera(),
            last_denial: None,
            quit: false,
            config,
        }
    }

    /// Put the prop at its configured resting pose
    pub fn place_prop(&mut self) {
        self.prop.place(self.config.prop.rest.to_matrix());
    }

    pub fn frames(&self) -> ArmFrames {
        build_chain(&self.arm.pose, &self.config.rig)
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::SelectChannel(channel) => {
                ArmControls::select_channel(&mut self.arm, channel);
                log::debug!("Control channel: {}", channel.label());
            }
            InputEvent::PointerButton(down) => ArmControls::set_pointer_down(&mut self.arm, down),
            InputEvent::PointerMoved { x, y } => {
                self.controls.pointer_moved(&mut self.arm, x, y);
            }
            InputEvent::Resized { width, height } => self.controls.resize(width, height),
            InputEvent::ToggleGrab => self.toggle_grab(),
            InputEvent::Quit => self.quit = true,
        }
    }

    fn toggle_grab(&mut self) {
        let frames = self.frames();
        match self.prop.toggle(&self.arm.pose, &frames.palm, &self.config.grab) {
            GrabTransition::Attached => {
                self.last_denial = None;
                let p = frames.palm_position();
                log::info!("Prop attached at palm ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z);
            }
            GrabTransition::Released => {
                self.last_denial = None;
                if let Some(p) = self.prop.position() {
                    log::info!("Prop released at ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z);
                }
            }
            GrabTransition::Denied(denial) => {
                log::debug!("Grab denied: {}", denial);
                self.last_denial = Some(denial);
            }
        }
    }

    /// Advance one frame
    pub fn step(&mut self) -> FrameOutput {
        let frames = self.frames();
        let prop = self.prop.track(&frames.palm);
        FrameOutput { frames, prop }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn hud_lines(&self, fps: i32) -> Vec<String> {
        let grab = match self.prop.state() {
            GrabState::Free => "free",
            GrabState::Attached => "holding",
        };
        let mut lines = vec![
            format!("[1-5] channel: {}", self.arm.channel.label()),
            format!("[space] prop: {}", grab),
        ];
        if let Some(denial) = &self.last_denial {
            lines.push(format!("can't grab: {}", denial));
        }
        lines.push(format!("{} fps", fps));
        lines
    }
}
