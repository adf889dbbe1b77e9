pub mod animation_clip;
pub mod blend_controller;
pub mod library;
pub mod pose;
pub mod procedural;
pub mod skeleton;

pub use animation_clip::*;
pub use blend_controller::*;
pub use library::*;
pub use pose::*;
pub use skeleton::*;
