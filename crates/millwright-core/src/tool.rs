//! Tool identity/physical-parameter records and the tool registry.
//!
//! Persistence is a pure in-memory string parse/format pair — reading and
//! writing the backing file is host application I/O (spec's Non-goals
//! exclude "configuration file I/O"), but the record format itself is part
//! of the core's external interface, so it lives here.

use crate::error::{InputError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Cutting tool type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolType {
    EndMill,
    BallNose,
    VBit,
    Drill,
    Router,
    Engraving,
    Custom,
}

impl ToolType {
    fn as_index(self) -> u32 {
        match self {
            ToolType::EndMill => 0,
            ToolType::BallNose => 1,
            ToolType::VBit => 2,
            ToolType::Drill => 3,
            ToolType::Router => 4,
            ToolType::Engraving => 5,
            ToolType::Custom => 6,
        }
    }

    fn from_index(v: u32) -> Result<Self> {
        Ok(match v {
            0 => ToolType::EndMill,
            1 => ToolType::BallNose,
            2 => ToolType::VBit,
            3 => ToolType::Drill,
            4 => ToolType::Router,
            5 => ToolType::Engraving,
            6 => ToolType::Custom,
            other => {
                return Err(InputError::UnknownDiscriminant {
                    kind: "ToolType".into(),
                    value: other.to_string(),
                }
                .into())
            }
        })
    }
}

/// Tool shank material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolMaterial {
    Hss,
    Carbide,
    Ceramic,
    Diamond,
    Cobalt,
    Unknown,
}

impl ToolMaterial {
    fn as_index(self) -> u32 {
        match self {
            ToolMaterial::Hss => 0,
            ToolMaterial::Carbide => 1,
            ToolMaterial::Ceramic => 2,
            ToolMaterial::Diamond => 3,
            ToolMaterial::Cobalt => 4,
            ToolMaterial::Unknown => 5,
        }
    }

    fn from_index(v: u32) -> Result<Self> {
        Ok(match v {
            0 => ToolMaterial::Hss,
            1 => ToolMaterial::Carbide,
            2 => ToolMaterial::Ceramic,
            3 => ToolMaterial::Diamond,
            4 => ToolMaterial::Cobalt,
            5 => ToolMaterial::Unknown,
            other => {
                return Err(InputError::UnknownDiscriminant {
                    kind: "ToolMaterial".into(),
                    value: other.to_string(),
                }
                .into())
            }
        })
    }
}

/// Optional tool coating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolCoating {
    None,
    TiN,
    TiAlN,
    Dlc,
}

impl ToolCoating {
    fn as_index(self) -> u32 {
        match self {
            ToolCoating::None => 0,
            ToolCoating::TiN => 1,
            ToolCoating::TiAlN => 2,
            ToolCoating::Dlc => 3,
        }
    }

    fn from_index(v: u32) -> Result<Self> {
        Ok(match v {
            0 => ToolCoating::None,
            1 => ToolCoating::TiN,
            2 => ToolCoating::TiAlN,
            3 => ToolCoating::Dlc,
            other => {
                return Err(InputError::UnknownDiscriminant {
                    kind: "ToolCoating".into(),
                    value: other.to_string(),
                }
                .into())
            }
        })
    }
}

/// Stable tool identifier, monotonically issued by [`ToolRegistry::add_tool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ToolId(pub u32);

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity and physical parameters of a cutting tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: ToolId,
    pub name: String,
    pub tool_type: ToolType,
    pub diameter: f64,
    pub length: f64,
    pub flute_length: f64,
    pub flute_count: u32,
    pub material: ToolMaterial,
    pub coating: ToolCoating,
    pub max_depth_of_cut: f64,
    pub max_feed_rate: f64,
    pub min_spindle_speed: f64,
    pub max_spindle_speed: f64,
    pub notes: String,
    pub active: bool,
}

impl Tool {
    pub fn new(id: ToolId, name: impl Into<String>, tool_type: ToolType, diameter: f64) -> Self {
        Self {
            id,
            name: name.into(),
            tool_type,
            diameter,
            length: 0.0,
            flute_length: 0.0,
            flute_count: 2,
            material: ToolMaterial::Carbide,
            coating: ToolCoating::None,
            max_depth_of_cut: 0.0,
            max_feed_rate: 0.0,
            min_spindle_speed: 0.0,
            max_spindle_speed: 0.0,
            notes: String::new(),
            active: true,
        }
    }

    /// `true` when the tool's physical parameters are usable by the
    /// pipeline: positive diameter and at least one flute.
    pub fn is_valid(&self) -> bool {
        self.diameter > 0.0 && self.flute_count >= 1
    }

    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    fn to_kv_line(&self) -> String {
        format!(
            "id={}\tname={}\ttype={}\tdiameter={}\tlength={}\tflute_length={}\tflute_count={}\tmaterial={}\tcoating={}\tmax_depth_of_cut={}\tmax_feed_rate={}\tmin_spindle_speed={}\tmax_spindle_speed={}\tnotes={}\tactive={}",
            self.id.0,
            self.name,
            self.tool_type.as_index(),
            self.diameter,
            self.length,
            self.flute_length,
            self.flute_count,
            self.material.as_index(),
            self.coating.as_index(),
            self.max_depth_of_cut,
            self.max_feed_rate,
            self.min_spindle_speed,
            self.max_spindle_speed,
            self.notes.replace('\t', " "),
            self.active,
        )
    }

    fn from_kv_line(line: &str) -> Result<Self> {
        let mut fields: BTreeMap<&str, &str> = BTreeMap::new();
        for part in line.split('\t') {
            if let Some((k, v)) = part.split_once('=') {
                fields.insert(k, v);
            }
        }
        let get = |key: &str| -> Result<String> {
            fields
                .get(key)
                .map(|s| s.to_string())
                .ok_or_else(|| InputError::MissingField(key.to_string()).into())
        };
        let parse_f64 = |key: &str, raw: &str| -> Result<f64> {
            raw.parse::<f64>().map_err(|e| {
                InputError::InvalidValue {
                    field: key.to_string(),
                    reason: e.to_string(),
                }
                .into()
            })
        };
        let id = ToolId(
            get("id")?
                .parse::<u32>()
                .map_err(|e| InputError::InvalidValue {
                    field: "id".into(),
                    reason: e.to_string(),
                })?,
        );
        let name = get("name")?;
        let tool_type = ToolType::from_index(get("type")?.parse::<u32>().map_err(|e| {
            InputError::InvalidValue {
                field: "type".into(),
                reason: e.to_string(),
            }
        })?)?;
        let diameter = parse_f64("diameter", &get("diameter")?)?;
        let length = parse_f64("length", &get("length")?)?;
        let flute_length = parse_f64("flute_length", &get("flute_length")?)?;
        let flute_count = get("flute_count")?
            .parse::<u32>()
            .map_err(|e| InputError::InvalidValue {
                field: "flute_count".into(),
                reason: e.to_string(),
            })?;
        let material = ToolMaterial::from_index(get("material")?.parse::<u32>().map_err(|e| {
            InputError::InvalidValue {
                field: "material".into(),
                reason: e.to_string(),
            }
        })?)?;
        let coating = ToolCoating::from_index(get("coating")?.parse::<u32>().map_err(|e| {
            InputError::InvalidValue {
                field: "coating".into(),
                reason: e.to_string(),
            }
        })?)?;
        let max_depth_of_cut = parse_f64("max_depth_of_cut", &get("max_depth_of_cut")?)?;
        let max_feed_rate = parse_f64("max_feed_rate", &get("max_feed_rate")?)?;
        let min_spindle_speed = parse_f64("min_spindle_speed", &get("min_spindle_speed")?)?;
        let max_spindle_speed = parse_f64("max_spindle_speed", &get("max_spindle_speed")?)?;
        let notes = get("notes")?;
        let active = get("active")?
            .parse::<bool>()
            .map_err(|e| InputError::InvalidValue {
                field: "active".into(),
                reason: e.to_string(),
            })?;

        Ok(Tool {
            id,
            name,
            tool_type,
            diameter,
            length,
            flute_length,
            flute_count,
            material,
            coating,
            max_depth_of_cut,
            max_feed_rate,
            min_spindle_speed,
            max_spindle_speed,
            notes,
            active,
        })
    }
}

/// In-memory collection of tools, keyed by monotonically issued [`ToolId`].
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<ToolId, Tool>,
    next_id: u32,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Add a tool, issuing a fresh id and ignoring whatever id it carried.
    pub fn add_tool(&mut self, mut tool: Tool) -> ToolId {
        let id = ToolId(self.next_id);
        self.next_id += 1;
        tool.id = id;
        self.tools.insert(id, tool);
        id
    }

    pub fn get_tool(&self, id: ToolId) -> Option<&Tool> {
        self.tools.get(&id)
    }

    pub fn get_tool_mut(&mut self, id: ToolId) -> Option<&mut Tool> {
        self.tools.get_mut(&id)
    }

    pub fn remove_tool(&mut self, id: ToolId) -> Option<Tool> {
        self.tools.remove(&id)
    }

    pub fn all_tools(&self) -> impl Iterator<Item = &Tool> {
        self.tools.values()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Format the registry as the line-oriented KV text format from spec §6,
    /// one tool per line.
    pub fn to_kv_string(&self) -> String {
        self.tools
            .values()
            .map(Tool::to_kv_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Parse the line-oriented KV text format from spec §6. Blank lines and
    /// lines starting with `#` are skipped. `next_id` is set past the
    /// highest id seen so subsequent `add_tool` calls never collide.
    pub fn from_kv_str(text: &str) -> Result<Self> {
        let mut registry = ToolRegistry::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let tool = Tool::from_kv_line(line)?;
            registry.next_id = registry.next_id.max(tool.id.0 + 1);
            registry.tools.insert(tool.id, tool);
        }
        Ok(registry)
    }

    /// Seed a standard library of common tools, mirroring the teacher's
    /// `init_standard_library` pattern: a handful of realistically
    /// parameterized, named tools rather than placeholder entries.
    pub fn standard_library() -> Self {
        let mut registry = ToolRegistry::new();
        registry.add_tool({
            let mut t = Tool::new(ToolId(0), "1/4\" Flat End Mill", ToolType::EndMill, 6.35);
            t.flute_count = 2;
            t.max_feed_rate = 1500.0;
            t.max_depth_of_cut = 3.0;
            t
        });
        registry.add_tool({
            let mut t = Tool::new(ToolId(0), "1/8\" Flat End Mill", ToolType::EndMill, 3.175);
            t.flute_count = 2;
            t.max_feed_rate = 1000.0;
            t.max_depth_of_cut = 1.5;
            t
        });
        registry.add_tool({
            let mut t = Tool::new(ToolId(0), "90° V-Bit", ToolType::VBit, 6.35);
            t.flute_count = 1;
            t.max_feed_rate = 800.0;
            t
        });
        registry.add_tool({
            let mut t = Tool::new(ToolId(0), "1/8\" Ball End Mill", ToolType::BallNose, 3.175);
            t.flute_count = 2;
            t.max_feed_rate = 900.0;
            t
        });
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_tool_assigns_sequential_ids() {
        let mut reg = ToolRegistry::new();
        let a = reg.add_tool(Tool::new(ToolId(0), "a", ToolType::EndMill, 6.0));
        let b = reg.add_tool(Tool::new(ToolId(0), "b", ToolType::Drill, 3.0));
        assert_ne!(a, b);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn validity_requires_positive_diameter_and_flutes() {
        let mut t = Tool::new(ToolId(1), "bad", ToolType::EndMill, 0.0);
        assert!(!t.is_valid());
        t.diameter = 6.0;
        t.flute_count = 0;
        assert!(!t.is_valid());
        t.flute_count = 2;
        assert!(t.is_valid());
    }

    #[test]
    fn kv_round_trip() {
        let mut reg = ToolRegistry::new();
        let mut t = Tool::new(ToolId(0), "Test Tool", ToolType::VBit, 6.0);
        t.notes = "no tabs here".into();
        reg.add_tool(t);
        let text = reg.to_kv_string();
        let reparsed = ToolRegistry::from_kv_str(&text).unwrap();
        assert_eq!(reparsed.len(), 1);
        let tool = reparsed.all_tools().next().unwrap();
        assert_eq!(tool.name, "Test Tool");
        assert_eq!(tool.tool_type, ToolType::VBit);
    }

    #[test]
    fn standard_library_has_usable_tools() {
        let reg = ToolRegistry::standard_library();
        assert!(!reg.is_empty());
        assert!(reg.all_tools().all(Tool::is_valid));
    }
}
