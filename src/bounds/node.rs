//! Explicit tree form of the bounds hierarchy.

use std::fmt;

use super::flags::{BoundFlags, ShapeKind};
use super::point_cloud::PointCloud;
use crate::hash::{format_identifier, NameTable};
use crate::util::{DQuat, DVec3, Result};

/// A name field that is either readable text or a raw identifier.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum HashName {
    /// Text the host knows; hashed (or parsed as `0x...`) on save.
    Text(String),
    /// Identifier with no known name.
    Raw(u32),
}

impl HashName {
    /// The reserved "no value" identifier.
    pub const NONE: Self = Self::Raw(0);

    /// Resolve an identifier through `names`.
    pub fn resolve(id: u32, names: &impl NameTable) -> Self {
        match names.lookup(id) {
            Some(text) => Self::Text(text),
            None => Self::Raw(id),
        }
    }

    /// Identifier written to disk.
    pub fn identifier(&self, names: &impl NameTable) -> Result<u32> {
        match self {
            Self::Text(text) => names.to_identifier(text),
            Self::Raw(id) => Ok(*id),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::Raw(0))
    }
}

impl Default for HashName {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<&str> for HashName {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<u32> for HashName {
    fn from(id: u32) -> Self {
        Self::Raw(id)
    }
}

impl fmt::Display for HashName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Raw(id) => f.write_str(&format_identifier(*id)),
        }
    }
}

impl fmt::Debug for HashName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{:?}", text),
            Self::Raw(id) => write!(f, "{}", format_identifier(*id)),
        }
    }
}

/// A bounds node in host coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundNode {
    /// Rotation, host axes.
    pub orientation: DQuat,
    /// World translation of the node as the host places it.
    pub position: DVec3,
    /// World rotation/translation origin.
    pub pivot: DVec3,
    /// Half extents; also the primitive's scale.
    pub half_dimensions: DVec3,
    pub flags: BoundFlags,
    pub shape: ShapeKind,
    pub surface: HashName,
    pub attribute_name: HashName,
    pub bound_name: HashName,
    pub point_cloud: Option<PointCloud>,
    /// Ordered; order decides serialized index order.
    pub children: Vec<BoundNode>,
}

impl Default for BoundNode {
    fn default() -> Self {
        Self {
            orientation: DQuat::IDENTITY,
            position: DVec3::ZERO,
            pivot: DVec3::ZERO,
            half_dimensions: DVec3::ZERO,
            flags: BoundFlags::empty(),
            shape: ShapeKind::default(),
            surface: HashName::NONE,
            attribute_name: HashName::NONE,
            bound_name: HashName::NONE,
            point_cloud: None,
            children: Vec::new(),
        }
    }
}

impl BoundNode {
    /// Node at `pivot` whose position coincides with its pivot.
    pub fn at(pivot: DVec3) -> Self {
        Self { position: pivot, pivot, ..Self::default() }
    }

    pub fn with_shape(mut self, shape: ShapeKind) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_flags(mut self, flags: BoundFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_half_dimensions(mut self, half_dimensions: DVec3) -> Self {
        self.half_dimensions = half_dimensions;
        self
    }

    pub fn with_name(mut self, name: impl Into<HashName>) -> Self {
        self.bound_name = name.into();
        self
    }

    pub fn with_surface(mut self, surface: impl Into<HashName>) -> Self {
        self.surface = surface.into();
        self
    }

    pub fn with_point_cloud(mut self, cloud: PointCloud) -> Self {
        self.point_cloud = Some(cloud);
        self
    }

    pub fn with_child(mut self, child: BoundNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(BoundNode::subtree_len).sum::<usize>()
    }

    /// Depth-first walk with depth (root = 0).
    pub fn walk(&self, f: &mut impl FnMut(&BoundNode, usize)) {
        self.walk_at(0, f);
    }

    fn walk_at(&self, depth: usize, f: &mut impl FnMut(&BoundNode, usize)) {
        f(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, f);
        }
    }
}

/// Deepest hierarchy (in levels, a lone root is 1) the codec reads or writes.
pub const MAX_DEPTH: usize = 256;

/// Ordered roots of a bounds hierarchy.
pub type Forest = Vec<BoundNode>;

/// Total node count of a forest.
pub fn forest_len(forest: &[BoundNode]) -> usize {
    forest.iter().map(BoundNode::subtree_len).sum()
}
