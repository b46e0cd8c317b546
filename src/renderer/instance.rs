//! Per-instance data for drawing ring blocks with one instanced mesh

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Which raise channels are active on a block, for material selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum BlockTint {
    #[default]
    Idle = 0,
    Lit = 1,
    Raised = 2,
    LitAndRaised = 3,
}

impl BlockTint {
    pub fn from_channels(lit: bool, raised: bool) -> Self {
        match (lit, raised) {
            (false, false) => BlockTint::Idle,
            (true, false) => BlockTint::Lit,
            (false, true) => BlockTint::Raised,
            (true, true) => BlockTint::LitAndRaised,
        }
    }

    pub fn color(&self) -> [f32; 4] {
        match self {
            BlockTint::Idle => colors::BLOCK_IDLE,
            BlockTint::Lit => colors::BLOCK_LIT,
            BlockTint::Raised => colors::BLOCK_RAISED,
            BlockTint::LitAndRaised => colors::BLOCK_LIT_RAISED,
        }
    }
}

/// Transform submitted to the host for one block instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstanceTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub tint: BlockTint,
}

impl InstanceTransform {
    /// Place an instance at `position` with its local +Z along `normal`
    pub fn oriented(position: Vec3, normal: Vec3, tint: BlockTint) -> Self {
        Self {
            position,
            rotation: rotation_from_z(normal),
            tint,
        }
    }

    pub fn to_raw(&self) -> InstanceRaw {
        InstanceRaw {
            model: Mat4::from_rotation_translation(self.rotation, self.position).to_cols_array_2d(),
            tint: self.tint.color(),
        }
    }
}

/// Rotation taking +Z onto `normal`; identity for a degenerate normal
pub fn rotation_from_z(normal: Vec3) -> Quat {
    let normal = normal.normalize_or_zero();
    if normal == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(Vec3::Z, normal)
}

/// GPU layout of one instance: column-major model matrix plus tint color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub tint: [f32; 4],
}

impl InstanceRaw {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4
    ];

    /// Instance-rate buffer layout; model columns at locations 2-5, tint at 6
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Colors for block states
pub mod colors {
    pub const BLOCK_IDLE: [f32; 4] = [0.3, 0.3, 0.4, 1.0];
    pub const BLOCK_LIT: [f32; 4] = [1.0, 0.85, 0.4, 1.0];
    pub const BLOCK_RAISED: [f32; 4] = [0.4, 0.7, 1.0, 1.0];
    pub const BLOCK_LIT_RAISED: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}
