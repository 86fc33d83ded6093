//! Bounds-tree codec.
//!
//! Converts between the engine's flat `BoundsPack` array and an explicit
//! forest of [`BoundNode`]s in host coordinates.
//!
//! - [`record`] - on-disk records
//! - [`node`] - explicit tree
//! - [`flags`] - flag vocabulary and shape markers
//! - [`point_cloud`] - point clouds attached to nodes
//! - [`decode`] / [`encode`] - the two directions

pub mod decode;
pub mod encode;
pub mod flags;
pub mod node;
pub mod point_cloud;
pub mod record;

pub use decode::{decode, BoundsDecoder};
pub use encode::{encode, BoundsEncoder};
pub use flags::{format_flags, parse_flags, BoundFlags, ParsedFlags, ShapeKind};
pub use node::{forest_len, BoundNode, Forest, HashName, MAX_DEPTH};
pub use point_cloud::{PointCloud, MAX_POINT_CLOUDS};
pub use record::{BoundsPack, FlatRecord, PointCloudRecord, NO_CHILDREN, PCLOUD_NONE};
