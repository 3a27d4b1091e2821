// Wrapper types making it harder to accidentaly use the wrong underlying type.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// A block position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockPos {
    /// The x coordinate.
    pub x: i32,
    /// The y coordinate.
    pub y: i32,
    /// The z coordinate.
    pub z: i32,
}

impl BlockPos {
    /// Creates a new block position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns this position moved by the given deltas, saturating at the
    /// coordinate limits.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            z: self.z.saturating_add(dz),
        }
    }
}

impl Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A block material.
///
/// Only the materials the sponge rules care about are named individually,
/// everything else a host might place is close enough to `Stone` for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Material {
    /// Empty space.
    #[default]
    Air,
    /// Generic solid block.
    Stone,
    /// Dirt.
    Dirt,
    /// Grass block.
    GrassBlock,
    /// Sand.
    Sand,
    /// Glass.
    Glass,
    /// The sponge block.
    Sponge,
    /// Water source block.
    Water,
    /// Flowing water.
    FlowingWater,
    /// Lava source block.
    Lava,
    /// Flowing lava.
    FlowingLava,
}

impl Material {
    /// The namespace every material key lives in.
    pub const VANILLA_NAMESPACE: &'static str = "minecraft";

    /// Every material, in declaration order.
    pub const ALL: [Material; 11] = [
        Material::Air,
        Material::Stone,
        Material::Dirt,
        Material::GrassBlock,
        Material::Sand,
        Material::Glass,
        Material::Sponge,
        Material::Water,
        Material::FlowingWater,
        Material::Lava,
        Material::FlowingLava,
    ];

    /// Returns true for the four liquid materials.
    #[inline]
    #[must_use]
    pub const fn is_liquid(self) -> bool {
        matches!(
            self,
            Material::Water | Material::FlowingWater | Material::Lava | Material::FlowingLava
        )
    }

    /// Returns true if this is air.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        matches!(self, Material::Air)
    }

    /// The path part of this material's key, e.g. `flowing_water`.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Material::Air => "air",
            Material::Stone => "stone",
            Material::Dirt => "dirt",
            Material::GrassBlock => "grass_block",
            Material::Sand => "sand",
            Material::Glass => "glass",
            Material::Sponge => "sponge",
            Material::Water => "water",
            Material::FlowingWater => "flowing_water",
            Material::Lava => "lava",
            Material::FlowingLava => "flowing_lava",
        }
    }
}

impl Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", Self::VANILLA_NAMESPACE, self.path())
    }
}

impl FromStr for Material {
    type Err = String;

    /// Parses `namespace:path` or a bare path, which is assumed to be vanilla.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = match s.split_once(':') {
            Some((namespace, path)) if namespace == Self::VANILLA_NAMESPACE => path,
            Some((namespace, _)) => return Err(format!("Invalid namespace: {namespace}")),
            None => s,
        };

        Self::ALL
            .into_iter()
            .find(|material| material.path() == path)
            .ok_or_else(|| format!("Unknown material: {s}"))
    }
}
