//! Top-level car document.
//!
//! ```json
//! {
//!   "CarTypeName": "...", "BaseModelName": "...", "ManufacturerName": "...",
//!   "UsageType": "Racing", "DefaultBasePaint": 0, "Skinnable": true,
//!   "DefaultSkinNumber": 1,
//!   "BoundsPack": { "Entries": [...], "PointClouds": [...] },
//!   "Spoiler": { "SpoilerType": "Small" }
//! }
//! ```
//!
//! `BoundsPack` is omitted when there are no bounds; `Spoiler` is omitted
//! when the spoiler type is undefined.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bounds::{decode, encode, BoundNode, BoundsPack, Forest};
use crate::hash::{HashResolver, NameTable};
use crate::util::{Error, Result};

/// Vehicle usage category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsageType {
    #[default]
    Racing,
    Cop,
    Traffic,
    Wheels,
    Universal,
}

/// Spoiler variant. An absent `Spoiler` object means "undefined".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpoilerType {
    #[default]
    None,
    Small,
    Large,
    Hatch,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Spoiler {
    pub spoiler_type: SpoilerType,
}

/// A car data file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CarDocument {
    pub car_type_name: String,
    pub base_model_name: String,
    pub manufacturer_name: String,
    pub usage_type: UsageType,
    pub default_base_paint: u32,
    pub skinnable: bool,
    pub default_skin_number: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds_pack: Option<BoundsPack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spoiler: Option<Spoiler>,
}

impl CarDocument {
    /// Read and parse a document file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Parse from a JSON value. Bounds entries are parsed separately so
    /// errors carry the offending entry index.
    pub fn from_value(mut value: Value) -> Result<Self> {
        let obj = value
            .as_object_mut()
            .ok_or_else(|| Error::invalid("document is not a JSON object"))?;
        let pack = obj.remove("BoundsPack");

        let mut doc: Self =
            serde_json::from_value(value).map_err(|e| Error::invalid(e.to_string()))?;
        doc.bounds_pack = match pack {
            None | Some(Value::Null) => None,
            Some(pack) => Some(BoundsPack::from_json(&pack)?),
        };
        Ok(doc)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Pretty-printed JSON, two-space indent.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize fully, then write. Nothing touches the file if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = self.to_json_string()?;
        std::fs::write(path.as_ref(), text)?;
        Ok(())
    }

    /// Decode the bounds section; empty when absent.
    pub fn decode_bounds(&self, use_pivot: bool, names: &impl NameTable) -> Result<Forest> {
        match &self.bounds_pack {
            Some(pack) => decode(pack, use_pivot, names),
            None => Ok(Forest::new()),
        }
    }

    /// Replace the bounds section with `forest`; removed when the forest is empty.
    pub fn set_bounds(&mut self, forest: &[BoundNode], names: &impl NameTable) -> Result<()> {
        let pack = encode(forest, names)?;
        self.bounds_pack = (!pack.is_empty()).then_some(pack);
        Ok(())
    }

    pub fn spoiler_type(&self) -> Option<SpoilerType> {
        self.spoiler.map(|s| s.spoiler_type)
    }

    pub fn set_spoiler_type(&mut self, spoiler_type: Option<SpoilerType>) {
        self.spoiler = spoiler_type.map(|spoiler_type| Spoiler { spoiler_type });
    }

    /// Readable default paint name.
    pub fn default_base_paint_name(&self, resolver: &HashResolver) -> String {
        resolver.resolve(self.default_base_paint)
    }

    /// Set the default paint from a name or `0x` literal.
    pub fn set_default_base_paint(&mut self, text: &str, names: &impl NameTable) -> Result<()> {
        self.default_base_paint = names.to_identifier(text)?;
        Ok(())
    }
}

/// Decode the bounds of a document JSON value. A missing `BoundsPack` yields an empty forest.
pub fn decode_json(document: &Value, use_pivot: bool, names: &impl NameTable) -> Result<Forest> {
    match document.get("BoundsPack") {
        None | Some(Value::Null) => Ok(Forest::new()),
        Some(pack) => decode(&BoundsPack::from_json(pack)?, use_pivot, names),
    }
}

/// Encode `forest` as a `BoundsPack` JSON value, `Null` when empty.
pub fn encode_json(forest: &[BoundNode], names: &impl NameTable) -> Result<Value> {
    let pack = encode(forest, names)?;
    if pack.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::to_value(pack)?)
}
