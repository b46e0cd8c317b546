//! Rendering-side data
//!
//! The host owns the pipeline; this module only packs instances for it.

pub mod instance;

pub use instance::{BlockTint, InstanceRaw, InstanceTransform};
