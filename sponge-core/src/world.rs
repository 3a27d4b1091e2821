//! World access.
//!
//! The sponge rules never own world state. They read and write blocks through
//! the [`World`] capability the host passes into every dispatch, so the same
//! code runs against a real server or the in-memory [`RamWorld`].

use std::mem;
use std::ops::RangeInclusive;

use scc::HashMap;
use sponge_utils::{BlockPos, Material};

/// Lowest buildable y level of a default world.
pub const DEFAULT_MIN_Y: i32 = 0;
/// Highest y level a default world reports as valid.
pub const DEFAULT_MAX_Y: i32 = 256;

/// Block level access to a world.
pub trait World: Send + Sync {
    /// Returns the material at `pos`.
    fn get_block(&self, pos: BlockPos) -> Material;

    /// Sets the material at `pos`. Returns true if the block changed.
    fn set_block(&self, pos: BlockPos, material: Material) -> bool;

    /// The valid y range of this world, both ends inclusive.
    fn height_range(&self) -> RangeInclusive<i32> {
        DEFAULT_MIN_Y..=DEFAULT_MAX_Y
    }
}

/// In-memory world.
///
/// Blocks live in a sparse concurrent map; any position that was never set
/// (or was set back to air) reads as [`Material::Air`]. There is no chunk
/// loading and nothing is ever persisted.
pub struct RamWorld {
    blocks: HashMap<BlockPos, Material>,
    height_range: RangeInclusive<i32>,
}

impl RamWorld {
    /// Creates an empty world with the default height range.
    #[must_use]
    pub fn new() -> Self {
        Self::with_height_range(DEFAULT_MIN_Y..=DEFAULT_MAX_Y)
    }

    /// Creates an empty world with a custom height range.
    #[must_use]
    pub fn with_height_range(height_range: RangeInclusive<i32>) -> Self {
        Self {
            blocks: HashMap::new(),
            height_range,
        }
    }

    /// Fills the box between `min` and `max` (inclusive) with `material`.
    pub fn fill(&self, min: BlockPos, max: BlockPos, material: Material) {
        for x in min.x.min(max.x)..=min.x.max(max.x) {
            for y in min.y.min(max.y)..=min.y.max(max.y) {
                for z in min.z.min(max.z)..=min.z.max(max.z) {
                    self.set_block(BlockPos::new(x, y, z), material);
                }
            }
        }
    }

    /// Number of non-air blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

impl Default for RamWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl World for RamWorld {
    fn get_block(&self, pos: BlockPos) -> Material {
        self.blocks
            .read_sync(&pos, |_, material| *material)
            .unwrap_or_default()
    }

    fn set_block(&self, pos: BlockPos, material: Material) -> bool {
        if material.is_air() {
            return self.blocks.remove_sync(&pos).is_some();
        }

        loop {
            if let Some(previous) = self.blocks.update_sync(&pos, |_, current| {
                mem::replace(current, material)
            }) {
                return previous != material;
            }
            if self.blocks.insert_sync(pos, material).is_ok() {
                return true;
            }
        }
    }

    fn height_range(&self) -> RangeInclusive<i32> {
        self.height_range.clone()
    }
}
