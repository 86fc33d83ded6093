//! Explicit hierarchy -> flat `BoundsPack`.
//!
//! Nodes are emitted in FIFO order. All children of one node are enqueued
//! together and therefore dequeued back to back, which is what makes each
//! `[ChildIndex, ChildIndex + NumChildren)` run contiguous. A parent's
//! `ChildIndex` is the index of its first dequeued child.

use std::collections::VecDeque;

use super::flags::{format_flags, BoundFlags};
use super::node::{BoundNode, MAX_DEPTH};
use super::point_cloud::PointCloudTable;
use super::record::{BoundsPack, FlatRecord, NO_CHILDREN, PCLOUD_NONE};
use crate::hash::NameTable;
use crate::scene::{ForestSource, SceneSource};
use crate::util::coords::{to_engine_orientation, to_engine_position};
use crate::util::{DVec3, Error, Result};

/// Encoder over a name table.
#[derive(Debug)]
pub struct BoundsEncoder<'a, N: NameTable> {
    names: &'a N,
}

impl<'a, N: NameTable> BoundsEncoder<'a, N> {
    pub fn new(names: &'a N) -> Self {
        Self { names }
    }

    /// Encode an explicit forest.
    pub fn encode(&self, forest: &[BoundNode]) -> Result<BoundsPack> {
        self.encode_scene(&ForestSource::new(forest))
    }

    /// Encode whatever hierarchy `scene` exposes. The scene is only read.
    pub fn encode_scene<S: SceneSource>(&self, scene: &S) -> Result<BoundsPack> {
        let _span = tracing::info_span!("encode_bounds").entered();

        let mut entries: Vec<FlatRecord> = Vec::new();
        let mut clouds = PointCloudTable::default();
        let mut queue: VecDeque<(Option<usize>, S::Node, Option<DVec3>, usize)> =
            scene.roots().into_iter().map(|root| (None, root, None, 1)).collect();

        while let Some((parent, node, parent_pivot, depth)) = queue.pop_front() {
            let index = entries.len();
            if depth > MAX_DEPTH {
                return Err(Error::malformed(
                    index,
                    format!("hierarchy deeper than {} levels", MAX_DEPTH),
                ));
            }
            if let Some(parent) = parent {
                let parent_entry = &mut entries[parent];
                if parent_entry.child_index == NO_CHILDREN {
                    parent_entry.child_index = index as i64;
                }
            }

            let world = scene.world_transform(node);
            let pivot = scene.pivot(node);
            let props = scene.bound(node);
            let children = scene.list_children(node);

            let position = match parent_pivot {
                Some(parent_pivot) => world.translation - parent_pivot,
                None => DVec3::ZERO,
            };

            let pcloud_index = match scene.point_cloud(node) {
                Some(cloud) => clouds.push(index, cloud)?,
                None => {
                    if props.flags.contains(BoundFlags::MESH_VS_GROUND) {
                        tracing::warn!(
                            "bound {} ({}) uses MeshVsGround without a point cloud",
                            index, props.bound_name
                        );
                    }
                    PCLOUD_NONE
                }
            };

            let num_children = u32::try_from(children.len())
                .map_err(|_| Error::malformed(index, "too many children"))?;

            entries.push(FlatRecord {
                orientation: to_engine_orientation(world.rotation).map_err(at(index))?,
                position: to_engine_position(position).map_err(at(index))?,
                flags: format_flags(props.flags, props.shape),
                half_dimensions: to_engine_position(world.scale).map_err(at(index))?,
                num_children,
                pcloud_index,
                pivot: to_engine_position(pivot).map_err(at(index))?,
                child_index: NO_CHILDREN,
                attribute_name: props.attribute_name.identifier(self.names).map_err(at(index))?,
                surface: props.surface.identifier(self.names).map_err(at(index))?,
                name_hash: props.bound_name.identifier(self.names).map_err(at(index))?,
            });

            queue.extend(
                children
                    .into_iter()
                    .map(|child| (Some(index), child, Some(pivot), depth + 1)),
            );
        }

        let point_clouds = clouds.into_records();
        tracing::debug!(
            "encoded {} bounds, {} point clouds",
            entries.len(),
            point_clouds.len()
        );
        Ok(BoundsPack { entries, point_clouds })
    }
}

/// Encode `forest` into a pack.
pub fn encode(forest: &[BoundNode], names: &impl NameTable) -> Result<BoundsPack> {
    BoundsEncoder::new(names).encode(forest)
}

/// Pin document-level conversion errors to entry `index`.
fn at(index: usize) -> impl Fn(Error) -> Error {
    move |e| match e {
        Error::MalformedInput(reason) => Error::malformed(index, reason),
        other => other,
    }
}
