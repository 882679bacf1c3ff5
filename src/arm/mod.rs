//! Articulated arm
//!
//! Pose state, the transform chain built from it, the pointer-to-pose
//! mapping, and the grab/release machine for the prop.

pub mod chain;
pub mod controls;
pub mod grab;
pub mod state;

pub use chain::{build_chain, ArmFrames, Joint, RigDimensions};
pub use controls::ArmControls;
pub use grab::{GrabDenial, GrabRules, GrabState, GrabTransition, PropState};
pub use state::{ArmPose, ArmState, ControlChannel};
