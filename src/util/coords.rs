//! Coordinate and unit conversion between host and engine.
//!
//! The engine stores `(X, Y, Z)` in millimeters; the host sees the same
//! point as `(Z, X, Y)` in meters. Quaternions use the same axis
//! permutation with components scaled by 32767.
//!
//! Conversions toward the engine round to the nearest integer with ties
//! away from zero (`f64::round`). Non-finite values and values outside the
//! `i32` range are rejected instead of saturating.

use super::math::{
    DQuat, DVec3, EngineQuat, EngineVec3, EngineVertex, ENGINE_UNITS_PER_METER,
    QUAT_COMPONENT_SCALE,
};
use super::{Error, Result};

/// Engine position/size to host position/size.
#[inline]
pub fn to_host_position(v: EngineVec3) -> DVec3 {
    DVec3::new(
        v.z as f64 / ENGINE_UNITS_PER_METER,
        v.x as f64 / ENGINE_UNITS_PER_METER,
        v.y as f64 / ENGINE_UNITS_PER_METER,
    )
}

/// Host position/size to engine position/size.
pub fn to_engine_position(v: DVec3) -> Result<EngineVec3> {
    Ok(EngineVec3 {
        x: round_component(v.y * ENGINE_UNITS_PER_METER)?,
        y: round_component(v.z * ENGINE_UNITS_PER_METER)?,
        z: round_component(v.x * ENGINE_UNITS_PER_METER)?,
    })
}

/// Engine orientation to host orientation. The result is not renormalized.
#[inline]
pub fn to_host_orientation(q: EngineQuat) -> DQuat {
    DQuat::from_xyzw(
        q.z as f64 / QUAT_COMPONENT_SCALE,
        q.x as f64 / QUAT_COMPONENT_SCALE,
        q.y as f64 / QUAT_COMPONENT_SCALE,
        q.w as f64 / QUAT_COMPONENT_SCALE,
    )
}

/// Host orientation to engine orientation.
pub fn to_engine_orientation(q: DQuat) -> Result<EngineQuat> {
    Ok(EngineQuat {
        x: round_component(q.y * QUAT_COMPONENT_SCALE)?,
        y: round_component(q.z * QUAT_COMPONENT_SCALE)?,
        z: round_component(q.x * QUAT_COMPONENT_SCALE)?,
        w: round_component(q.w * QUAT_COMPONENT_SCALE)?,
    })
}

/// Point-cloud vertex to host space (axis permutation only, no unit scale).
#[inline]
pub fn to_host_vertex(v: EngineVertex) -> DVec3 {
    DVec3::new(v.z, v.x, v.y)
}

/// Host-space point-cloud vertex to engine axes.
#[inline]
pub fn to_engine_vertex(v: DVec3) -> EngineVertex {
    EngineVertex { x: v.y, y: v.z, z: v.x }
}

/// Round to nearest, ties away from zero, rejecting anything `i32` can't hold.
fn round_component(value: f64) -> Result<i32> {
    if !value.is_finite() {
        return Err(Error::invalid(format!("non-finite coordinate {}", value)));
    }
    let rounded = value.round();
    if rounded < i32::MIN as f64 || rounded > i32::MAX as f64 {
        return Err(Error::invalid(format!(
            "coordinate {} does not fit the engine's integer range",
            value
        )));
    }
    Ok(rounded as i32)
}
