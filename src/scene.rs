//! Seams to the host scene graph.
//!
//! The codec never touches host types. Saving reads the host through
//! [`SceneSource`]; loading hands a decoded forest to a [`SceneBuilder`]
//! via [`materialize`]. The explicit [`BoundNode`] forest implements the
//! source side itself through [`ForestSource`].

use crate::bounds::{BoundFlags, BoundNode, HashName, PointCloud, ShapeKind};
use crate::util::{DMat4, DQuat, DVec3, Result};

/// World placement of a host node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldTransform {
    pub translation: DVec3,
    pub rotation: DQuat,
    /// Scale; for bounds nodes this is the half extents.
    pub scale: DVec3,
}

impl WorldTransform {
    pub const IDENTITY: Self = Self {
        translation: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
        scale: DVec3::ONE,
    };

    /// Placement of a decoded node: position, orientation, half extents.
    pub fn of(node: &BoundNode) -> Self {
        Self {
            translation: node.position,
            rotation: node.orientation,
            scale: node.half_dimensions,
        }
    }

    /// Translation * rotation * scale.
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Bounds properties of a host node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundProperties {
    pub flags: BoundFlags,
    pub shape: ShapeKind,
    pub surface: HashName,
    pub attribute_name: HashName,
    pub bound_name: HashName,
}

impl BoundProperties {
    pub fn of(node: &BoundNode) -> Self {
        Self {
            flags: node.flags,
            shape: node.shape,
            surface: node.surface.clone(),
            attribute_name: node.attribute_name.clone(),
            bound_name: node.bound_name.clone(),
        }
    }
}

/// Read access to the host's bounds hierarchy, used when saving.
///
/// Roots are bounds nodes with no bounds-type ancestor. Children must come
/// back in the order they should be serialized.
pub trait SceneSource {
    type Node: Copy;

    fn roots(&self) -> Vec<Self::Node>;
    fn list_children(&self, node: Self::Node) -> Vec<Self::Node>;
    fn world_transform(&self, node: Self::Node) -> WorldTransform;
    /// World pivot; children's positions are stored relative to it.
    fn pivot(&self, node: Self::Node) -> DVec3;
    fn bound(&self, node: Self::Node) -> BoundProperties;
    fn point_cloud(&self, node: Self::Node) -> Option<&PointCloud>;
}

/// Write access to the host scene, used when loading.
pub trait SceneBuilder {
    type Handle: Copy;

    /// Create a node under `parent` (or at top level) at `world`.
    fn create_node(
        &mut self,
        parent: Option<Self::Handle>,
        node: &BoundNode,
        world: WorldTransform,
    ) -> Result<Self::Handle>;

    /// Attach a point cloud to `owner`. The cloud is placed under the
    /// owner's parent and translated to `anchor` (the parent's pivot, or
    /// the origin for a root). Hull construction happens host-side.
    fn attach_point_cloud(
        &mut self,
        owner: Self::Handle,
        parent: Option<Self::Handle>,
        cloud: &PointCloud,
        anchor: DVec3,
    ) -> Result<()>;
}

/// Create host nodes for every bound of `forest`, parents before children.
/// Returns the handles of the roots.
pub fn materialize<B: SceneBuilder>(forest: &[BoundNode], builder: &mut B) -> Result<Vec<B::Handle>> {
    let mut roots = Vec::with_capacity(forest.len());
    for root in forest {
        roots.push(materialize_node(root, None, builder)?);
    }
    Ok(roots)
}

fn materialize_node<B: SceneBuilder>(
    node: &BoundNode,
    parent: Option<(B::Handle, DVec3)>,
    builder: &mut B,
) -> Result<B::Handle> {
    let parent_handle = parent.map(|(h, _)| h);
    let handle = builder.create_node(parent_handle, node, WorldTransform::of(node))?;
    if let Some(cloud) = &node.point_cloud {
        let anchor = parent.map_or(DVec3::ZERO, |(_, pivot)| pivot);
        builder.attach_point_cloud(handle, parent_handle, cloud, anchor)?;
    }
    for child in &node.children {
        materialize_node(child, Some((handle, node.pivot)), builder)?;
    }
    Ok(handle)
}

/// [`SceneSource`] over an explicit forest.
#[derive(Clone, Copy, Debug)]
pub struct ForestSource<'a> {
    forest: &'a [BoundNode],
}

impl<'a> ForestSource<'a> {
    pub fn new(forest: &'a [BoundNode]) -> Self {
        Self { forest }
    }
}

impl<'a> SceneSource for ForestSource<'a> {
    type Node = &'a BoundNode;

    fn roots(&self) -> Vec<Self::Node> {
        self.forest.iter().collect()
    }

    fn list_children(&self, node: Self::Node) -> Vec<Self::Node> {
        node.children.iter().collect()
    }

    fn world_transform(&self, node: Self::Node) -> WorldTransform {
        WorldTransform::of(node)
    }

    fn pivot(&self, node: Self::Node) -> DVec3 {
        node.pivot
    }

    fn bound(&self, node: Self::Node) -> BoundProperties {
        BoundProperties::of(node)
    }

    fn point_cloud(&self, node: Self::Node) -> Option<&PointCloud> {
        node.point_cloud.as_ref()
    }
}
