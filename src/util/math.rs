//! Math type re-exports and engine fixed-point types.
//!
//! Host-side values use double precision glam types. Engine-side values are
//! the integer components stored in the bounds JSON: millimeters for
//! positions and sizes, `1/32767` units for quaternion components.

pub use glam::{DMat4, DQuat, DVec3};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Millimeters per host length unit (meters).
pub const ENGINE_UNITS_PER_METER: f64 = 1000.0;

/// Fixed-point scale of a quaternion component.
pub const QUAT_COMPONENT_SCALE: f64 = 32767.0;

/// Engine-space 3-vector, integer millimeters.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngineVec3 {
    #[serde(rename = "X")]
    pub x: i32,
    #[serde(rename = "Y")]
    pub y: i32,
    #[serde(rename = "Z")]
    pub z: i32,
}

impl EngineVec3 {
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Debug for EngineVec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EngineVec3({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Engine-space quaternion, each component scaled by 32767.
///
/// Field order matches what the engine writes: X, Y, Z, W.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngineQuat {
    #[serde(rename = "X")]
    pub x: i32,
    #[serde(rename = "Y")]
    pub y: i32,
    #[serde(rename = "Z")]
    pub z: i32,
    #[serde(rename = "W")]
    pub w: i32,
}

impl EngineQuat {
    /// Identity rotation.
    pub const IDENTITY: Self = Self { x: 0, y: 0, z: 0, w: 32767 };

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32, w: i32) -> Self {
        Self { x, y, z, w }
    }
}

impl Default for EngineQuat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Debug for EngineQuat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EngineQuat(x={}, y={}, z={}, w={})", self.x, self.y, self.z, self.w)
    }
}

/// Free-floating vertex of a point cloud (engine axes, no fixed-point scale).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineVertex {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "Z")]
    pub z: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_vec_json_shape() {
        let v = EngineVec3::new(1, -2, 3);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"{"X":1,"Y":-2,"Z":3}"#);

        let back: EngineVec3 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn test_engine_quat_default_is_identity() {
        assert_eq!(EngineQuat::default(), EngineQuat::IDENTITY);
        let q: EngineQuat = serde_json::from_str(r#"{"W":32767,"X":0,"Y":0,"Z":0}"#).unwrap();
        assert_eq!(q, EngineQuat::IDENTITY);
    }

    #[test]
    fn test_engine_vec_rejects_missing_component() {
        let r: std::result::Result<EngineVec3, _> = serde_json::from_str(r#"{"X":1,"Y":2}"#);
        assert!(r.is_err());
    }
}
