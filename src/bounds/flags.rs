//! Bound flag vocabulary.
//!
//! On disk flags are a `", "`-separated list of symbolic names. Two of
//! them, `kBounds_Box` and `kBounds_Sphere`, encode the primitive shape;
//! in the explicit tree they live in [`ShapeKind`] and never in
//! [`BoundFlags`].

use std::fmt;

use bitflags::bitflags;

use crate::util::{Error, Result};

bitflags! {
    /// Semantic flags of a bounds node (shape markers excluded).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BoundFlags: u32 {
        const DISABLED              = 0x0001;
        const PRIM_VS_WORLD         = 0x0002;
        const PRIM_VS_OBJECTS       = 0x0004;
        const PRIM_VS_GROUND        = 0x0008;
        /// Collide the attached point cloud against the ground. Needs a point cloud.
        const MESH_VS_GROUND        = 0x0010;
        const INTERNAL              = 0x0020;
        const CONSTRAINT_CONICAL    = 0x0100;
        const CONSTRAINT_PRISMATIC  = 0x0200;
        const JOINT_FEMALE          = 0x0400;
        const JOINT_MALE            = 0x0800;
        const MALE_POST             = 0x1000;
        const JOINT_INVERT          = 0x2000;
        const PRIM_VS_OWN_PARTS     = 0x4000;
    }
}

const BOX_MARKER: &str = "kBounds_Box";
const SPHERE_MARKER: &str = "kBounds_Sphere";
const SEPARATOR: &str = ", ";

/// Names in bit order.
const FLAG_NAMES: &[(BoundFlags, &str)] = &[
    (BoundFlags::DISABLED, "kBounds_Disabled"),
    (BoundFlags::PRIM_VS_WORLD, "kBounds_PrimVsWorld"),
    (BoundFlags::PRIM_VS_OBJECTS, "kBounds_PrimVsObjects"),
    (BoundFlags::PRIM_VS_GROUND, "kBounds_PrimVsGround"),
    (BoundFlags::MESH_VS_GROUND, "kBounds_MeshVsGround"),
    (BoundFlags::INTERNAL, "kBounds_Internal"),
    (BoundFlags::CONSTRAINT_CONICAL, "kBounds_Constraint_Conical"),
    (BoundFlags::CONSTRAINT_PRISMATIC, "kBounds_Constraint_Prismatic"),
    (BoundFlags::JOINT_FEMALE, "kBounds_Joint_Female"),
    (BoundFlags::JOINT_MALE, "kBounds_Joint_Male"),
    (BoundFlags::MALE_POST, "kBounds_Male_Post"),
    (BoundFlags::JOINT_INVERT, "kBounds_Joint_Invert"),
    (BoundFlags::PRIM_VS_OWN_PARTS, "kBounds_PrimVsOwnParts"),
];

/// Primitive shape of a bounds node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Box,
    #[default]
    Sphere,
}

impl ShapeKind {
    /// On-disk marker flag for this shape.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Box => BOX_MARKER,
            Self::Sphere => SPHERE_MARKER,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Box => f.write_str("box"),
            Self::Sphere => f.write_str("sphere"),
        }
    }
}

// `from_name`/`iter_names` are generated by bitflags and use the Rust
// constant names; the engine names live in `FLAG_NAMES`.
impl BoundFlags {
    /// Engine name of a single flag.
    pub fn engine_name(self) -> Option<&'static str> {
        FLAG_NAMES.iter().find(|(f, _)| *f == self).map(|(_, n)| *n)
    }

    /// Flag for an engine name (shape markers are not flags).
    pub fn from_engine_name(name: &str) -> Option<Self> {
        FLAG_NAMES.iter().find(|(_, n)| *n == name).map(|(f, _)| *f)
    }

    /// Engine names of all set flags, in bit order.
    pub fn engine_names(self) -> impl Iterator<Item = &'static str> {
        FLAG_NAMES
            .iter()
            .filter(move |(f, _)| self.contains(*f))
            .map(|(_, n)| *n)
    }
}

/// Outcome of parsing a flags string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParsedFlags {
    pub flags: BoundFlags,
    pub shape: ShapeKind,
    /// Neither or both shape markers were present; `shape` fell back to sphere.
    pub shape_ambiguous: bool,
}

/// Parse an on-disk flags string.
///
/// Unknown names are rejected with their text in the error message; the
/// caller attaches the entry index.
pub fn parse_flags(text: &str) -> std::result::Result<ParsedFlags, String> {
    let mut flags = BoundFlags::empty();
    let mut has_box = false;
    let mut has_sphere = false;

    for name in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match name {
            BOX_MARKER => has_box = true,
            SPHERE_MARKER => has_sphere = true,
            _ => match BoundFlags::from_engine_name(name) {
                Some(f) => flags |= f,
                None => return Err(format!("unknown flag {:?}", name)),
            },
        }
    }

    let (shape, shape_ambiguous) = match (has_box, has_sphere) {
        (true, false) => (ShapeKind::Box, false),
        (false, true) => (ShapeKind::Sphere, false),
        _ => (ShapeKind::Sphere, true),
    };

    Ok(ParsedFlags { flags, shape, shape_ambiguous })
}

/// Parse flags for flat-array entry `index`.
pub(crate) fn parse_entry_flags(index: usize, text: &str) -> Result<ParsedFlags> {
    parse_flags(text).map_err(|reason| Error::malformed(index, reason))
}

/// Build the on-disk flags string: semantic flags in bit order, then the shape marker.
pub fn format_flags(flags: BoundFlags, shape: ShapeKind) -> String {
    flags
        .engine_names()
        .chain(std::iter::once(shape.marker()))
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Engine bit numbers of the shape markers.
    const BOX_MARKER_BIT: u32 = 0x40;
    const SPHERE_MARKER_BIT: u32 = 0x80;

    #[test]
    fn test_parse_moves_shape_out_of_flags() {
        let parsed = parse_flags("kBounds_PrimVsWorld, kBounds_Box, kBounds_Joint_Male").unwrap();
        assert_eq!(parsed.flags, BoundFlags::PRIM_VS_WORLD | BoundFlags::JOINT_MALE);
        assert_eq!(parsed.shape, ShapeKind::Box);
        assert!(!parsed.shape_ambiguous);
        assert_eq!(parsed.flags.bits() & (BOX_MARKER_BIT | SPHERE_MARKER_BIT), 0);
    }

    #[test]
    fn test_parse_ambiguous_shape_defaults_to_sphere() {
        let none = parse_flags("kBounds_Disabled").unwrap();
        assert_eq!(none.shape, ShapeKind::Sphere);
        assert!(none.shape_ambiguous);

        let both = parse_flags("kBounds_Box, kBounds_Sphere").unwrap();
        assert_eq!(both.shape, ShapeKind::Sphere);
        assert!(both.shape_ambiguous);

        let empty = parse_flags("").unwrap();
        assert!(empty.flags.is_empty());
        assert!(empty.shape_ambiguous);
    }

    #[test]
    fn test_parse_unknown_flag() {
        let err = parse_flags("kBounds_Sphere, kBounds_Bogus").unwrap_err();
        assert!(err.contains("kBounds_Bogus"));

        let err = parse_entry_flags(4, "nope").unwrap_err();
        assert_eq!(err.entry_index(), Some(4));
    }

    #[test]
    fn test_format_flags_order() {
        let text = format_flags(BoundFlags::PRIM_VS_OWN_PARTS | BoundFlags::DISABLED, ShapeKind::Sphere);
        assert_eq!(text, "kBounds_Disabled, kBounds_PrimVsOwnParts, kBounds_Sphere");
        assert_eq!(format_flags(BoundFlags::empty(), ShapeKind::Box), "kBounds_Box");
    }

    #[test]
    fn test_all_names_roundtrip() {
        let all = BoundFlags::all();
        let text = format_flags(all, ShapeKind::Box);
        let parsed = parse_flags(&text).unwrap();
        assert_eq!(parsed.flags, all);
        assert_eq!(parsed.shape, ShapeKind::Box);
        assert_eq!(all.engine_names().count(), 13);
    }

    #[test]
    fn test_bit_values_match_engine() {
        assert_eq!(BoundFlags::DISABLED.bits(), 0x1);
        assert_eq!(BoundFlags::MESH_VS_GROUND.bits(), 0x10);
        assert_eq!(BoundFlags::CONSTRAINT_CONICAL.bits(), 0x100);
        assert_eq!(BoundFlags::PRIM_VS_OWN_PARTS.bits(), 0x4000);
        assert_eq!(BoundFlags::all().bits() & (BOX_MARKER_BIT | SPHERE_MARKER_BIT), 0);
    }

    #[test]
    fn test_engine_names_not_constant_names() {
        assert_eq!(BoundFlags::from_engine_name("kBounds_Disabled"), Some(BoundFlags::DISABLED));
        assert_eq!(BoundFlags::from_engine_name("DISABLED"), None);
        assert_eq!(BoundFlags::JOINT_MALE.engine_name(), Some("kBounds_Joint_Male"));
        assert_eq!(BoundFlags::from_engine_name("kBounds_Box"), None);

        let parsed = parse_flags("kBounds_Disabled, kBounds_Internal, kBounds_Sphere").unwrap();
        assert_eq!(parsed.flags, BoundFlags::DISABLED | BoundFlags::INTERNAL);
        assert!(parse_flags("DISABLED, kBounds_Sphere").is_err());
    }
}
