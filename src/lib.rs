//! # Aaron
//!
//! Reader/writer for vehicle car-data JSON files and their collision-bounds
//! hierarchy (`BoundsPack`).
//!
//! The engine stores bounds as a flat array where each entry owns a
//! contiguous run of children (`ChildIndex`, `NumChildren`). This crate
//! turns that array into an explicit tree in host coordinates and back.
//!
//! ## Modules
//!
//! - [`util`] - Errors, engine fixed-point types, coordinate conversion
//! - [`hash`] - 32-bit name identifiers and the dictionary-backed resolver
//! - [`bounds`] - Flat records, explicit tree, decoder and encoder
//! - [`scene`] - Adapter traits for the host scene graph
//! - [`document`] - The top-level car document
//! - [`settings`] / [`session`] - Configuration and load/save coordination
//!
//! ## Example
//!
//! ```ignore
//! use aaron::prelude::*;
//!
//! let resolver = HashResolver::from_path("strings.json");
//! let doc = CarDocument::open("car.json")?;
//! let forest = doc.decode_bounds(true, &resolver)?;
//!
//! for root in &forest {
//!     println!("{} ({} nodes)", root.bound_name, root.subtree_len());
//! }
//! ```

pub mod util;
pub mod hash;
pub mod bounds;
pub mod scene;
pub mod document;
pub mod settings;
pub mod session;

// Re-export commonly used types
pub use util::{Error, Result};
pub use bounds::{BoundNode, BoundsPack, Forest};
pub use document::CarDocument;
pub use hash::HashResolver;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{DQuat, DVec3, Error, Result};
    pub use crate::hash::{hash, string_to_identifier, HashResolver, NameTable};
    pub use crate::bounds::{
        BoundFlags, BoundNode, BoundsDecoder, BoundsEncoder, BoundsPack, Forest, HashName,
        PointCloud, ShapeKind,
    };
    pub use crate::scene::{materialize, SceneBuilder, SceneSource, WorldTransform};
    pub use crate::document::{CarDocument, SpoilerType, UsageType};
    pub use crate::session::Session;
    pub use crate::settings::{Overrides, Settings};
}
