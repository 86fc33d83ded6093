//! Flat on-disk records of a `BoundsPack`.
//!
//! Tree structure is implicit: a record owns `NumChildren` consecutive
//! records starting at `ChildIndex`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::util::{EngineQuat, EngineVec3, EngineVertex, Error, Result};

/// `PCloudIndex` value meaning "no point cloud".
pub const PCLOUD_NONE: u32 = 255;

/// `ChildIndex` value of a leaf.
pub const NO_CHILDREN: i64 = -1;

/// One element of `BoundsPack.Entries`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FlatRecord {
    pub orientation: EngineQuat,
    pub position: EngineVec3,
    pub flags: String,
    pub half_dimensions: EngineVec3,
    pub num_children: u32,
    #[serde(rename = "PCloudIndex")]
    pub pcloud_index: u32,
    pub pivot: EngineVec3,
    pub child_index: i64,
    pub attribute_name: u32,
    pub surface: u32,
    pub name_hash: u32,
}

impl Default for FlatRecord {
    fn default() -> Self {
        Self {
            orientation: EngineQuat::IDENTITY,
            position: EngineVec3::ZERO,
            flags: String::new(),
            half_dimensions: EngineVec3::ZERO,
            num_children: 0,
            pcloud_index: PCLOUD_NONE,
            pivot: EngineVec3::ZERO,
            child_index: NO_CHILDREN,
            attribute_name: 0,
            surface: 0,
            name_hash: 0,
        }
    }
}

impl FlatRecord {
    /// Point-cloud slot, `None` for the 255 sentinel.
    pub fn point_cloud_index(&self) -> Option<usize> {
        (self.pcloud_index != PCLOUD_NONE).then_some(self.pcloud_index as usize)
    }
}

/// One element of `BoundsPack.PointClouds`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PointCloudRecord {
    pub vertices: Vec<EngineVertex>,
}

/// The `BoundsPack` section of a car document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoundsPack {
    pub entries: Vec<FlatRecord>,
    #[serde(default)]
    pub point_clouds: Vec<PointCloudRecord>,
}

impl BoundsPack {
    /// Parse from a JSON value, reporting the offending entry index on failure.
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::invalid("BoundsPack is not an object"))?;

        let entries = obj
            .get("Entries")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::invalid("BoundsPack.Entries missing or not an array"))?
            .iter()
            .enumerate()
            .map(|(i, v)| {
                FlatRecord::deserialize(v).map_err(|e| Error::malformed(i, e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        let point_clouds = match obj.get("PointClouds") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    PointCloudRecord::deserialize(v)
                        .map_err(|e| Error::invalid(format!("point cloud {}: {}", i, e)))
                })
                .collect::<Result<Vec<_>>>()?,
            Some(_) => return Err(Error::invalid("BoundsPack.PointClouds is not an array")),
        };

        Ok(Self { entries, point_clouds })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
