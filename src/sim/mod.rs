//! Deterministic simulation module
//!
//! All animation logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by block ID)
//! - No rendering or platform dependencies beyond the `InstanceHost` seam

pub mod arc;
pub mod block;
pub mod cube;
pub mod lattice;
pub mod light;
pub mod ring;
pub mod schedule;

pub use arc::AngularArc;
pub use block::{BounceParams, Excitation, RingBlock, interp_to};
pub use cube::BouncingCube;
pub use lattice::{BlockAnchor, LatticePoint, ParentTransform, generate};
pub use light::{LightMarker, LightSweeper};
pub use ring::{RingAnimator, RingStats};
pub use schedule::{Due, PendingClear, Schedule};
