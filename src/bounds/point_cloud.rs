//! Point clouds attached to bounds nodes.
//!
//! Only the vertex set crosses this boundary. Building a convex hull or
//! mesh from it is the host's job (see [`SceneBuilder`](crate::scene::SceneBuilder)).

use super::record::{PointCloudRecord, PCLOUD_NONE};
use crate::util::coords::{to_engine_vertex, to_host_vertex};
use crate::util::{DVec3, Error, Result};

/// Largest number of point clouds a pack can reference; 255 is the "none" sentinel.
pub const MAX_POINT_CLOUDS: usize = PCLOUD_NONE as usize;

/// Vertex set in host axes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloud {
    pub vertices: Vec<DVec3>,
}

impl PointCloud {
    pub fn new(vertices: Vec<DVec3>) -> Self {
        Self { vertices }
    }

    /// Host-space point cloud from an on-disk record.
    pub fn from_record(record: &PointCloudRecord) -> Self {
        Self {
            vertices: record.vertices.iter().copied().map(to_host_vertex).collect(),
        }
    }

    /// On-disk record for this point cloud.
    pub fn to_record(&self) -> PointCloudRecord {
        PointCloudRecord {
            vertices: self.vertices.iter().copied().map(to_engine_vertex).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Axis-aligned bounds (min, max), `None` when empty.
    pub fn bounds(&self) -> Option<(DVec3, DVec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(lo, hi), v| (lo.min(*v), hi.max(*v))),
        )
    }
}

/// Sequential point-cloud slot allocation used while encoding.
#[derive(Debug, Default)]
pub(crate) struct PointCloudTable {
    records: Vec<PointCloudRecord>,
}

impl PointCloudTable {
    /// Append `cloud`, returning its `PCloudIndex`. `entry` is the owning
    /// record's index, for error reporting.
    pub(crate) fn push(&mut self, entry: usize, cloud: &PointCloud) -> Result<u32> {
        if self.records.len() >= MAX_POINT_CLOUDS {
            return Err(Error::malformed(
                entry,
                format!("more than {} point clouds", MAX_POINT_CLOUDS),
            ));
        }
        let index = self.records.len() as u32;
        self.records.push(cloud.to_record());
        Ok(index)
    }

    pub(crate) fn into_records(self) -> Vec<PointCloudRecord> {
        self.records
    }
}
