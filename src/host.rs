//! Engine seam
//!
//! The ring never talks to a renderer or scene graph directly. An engine
//! adapter implements [`InstanceHost`]; [`RecordingHost`] keeps everything
//! in memory for tests and the headless demo.

use crate::renderer::{InstanceRaw, InstanceTransform};
use crate::sim::ParentTransform;

/// What the ring needs from the engine that draws it
pub trait InstanceHost {
    /// Make the block mesh available. `false` leaves the ring empty.
    fn load_block_mesh(&mut self) -> bool;

    /// Remove every instance in the batch
    fn clear_instances(&mut self);

    /// Append an instance, returning its index
    fn add_instance(&mut self, transform: &InstanceTransform) -> usize;

    /// Number of instances currently in the batch
    fn instance_count(&self) -> usize;

    /// Overwrite the transform of instance `index`
    fn submit_instance_transform(&mut self, index: usize, transform: &InstanceTransform);

    /// Flag the batch for upload; called once per tick after all submissions
    fn mark_batch_dirty(&mut self);

    /// Current world transform of the object owning the ring
    fn parent_transform(&self) -> ParentTransform;
}

/// In-memory host that records what the ring submits
#[derive(Debug, Clone)]
pub struct RecordingHost {
    pub instances: Vec<InstanceTransform>,
    pub parent: ParentTransform,
    pub mesh_available: bool,
    /// Times `mark_batch_dirty` was called
    pub dirty_marks: u64,
    /// Times `submit_instance_transform` was called
    pub submissions: u64,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
            parent: ParentTransform::IDENTITY,
            mesh_available: true,
            dirty_marks: 0,
            submissions: 0,
        }
    }

    /// A host whose block mesh fails to load
    pub fn without_mesh() -> Self {
        Self {
            mesh_available: false,
            ..Self::new()
        }
    }

    /// Instances packed for an instance buffer
    pub fn raw_instances(&self) -> Vec<InstanceRaw> {
        self.instances.iter().map(InstanceTransform::to_raw).collect()
    }

    /// Instance buffer contents as bytes
    pub fn instance_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.raw_instances()).to_vec()
    }
}

impl InstanceHost for RecordingHost {
    fn load_block_mesh(&mut self) -> bool {
        self.mesh_available
    }

    fn clear_instances(&mut self) {
        self.instances.clear();
    }

    fn add_instance(&mut self, transform: &InstanceTransform) -> usize {
        self.instances.push(*transform);
        self.instances.len() - 1
    }

    fn instance_count(&self) -> usize {
        self.instances.len()
    }

    fn submit_instance_transform(&mut self, index: usize, transform: &InstanceTransform) {
        match self.instances.get_mut(index) {
            Some(slot) => {
                *slot = *transform;
                self.submissions += 1;
            }
            None => log::warn!("Instance {} out of range ({})", index, self.instances.len()),
        }
    }

    fn mark_batch_dirty(&mut self) {
        self.dirty_marks += 1;
    }

    fn parent_transform(&self) -> ParentTransform {
        self.parent
    }
}
