use std::{collections::BTreeMap, fmt};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, SeqAccess, Visitor},
    ser::SerializeSeq,
};

use crate::{
    foundation::error::{PowerError, PowerResult},
    formula::entry::FormulaEntry,
    power::tag::PowerTag,
};

/// Dumped tags keyed by raw tag name.
pub type TagDumpMap = BTreeMap<String, TagDump>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
/// Serialized form of one tag.
pub enum TagDump {
    /// Final value, written as its unsigned 32-bit pattern.
    Value(u32),
    /// Unevaluated script.
    Script(ScriptDump),
}

impl TagDump {
    /// Build the dump leaf of `entry`.
    pub fn from_entry(entry: &FormulaEntry) -> Self {
        match entry.value() {
            Some(v) => Self::Value(v as u32),
            None => Self::Script(ScriptDump {
                source_text: entry.source_text().to_string(),
                bytecode: entry.bytecode().to_vec(),
                comment: entry.comment().to_string(),
            }),
        }
    }

    /// Signed value of a [`TagDump::Value`] leaf.
    pub fn value(&self) -> Option<i32> {
        match self {
            Self::Value(v) => Some(*v as i32),
            Self::Script(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Script leaf, serialized as `[source_text, hex_csv]` or `[source_text, hex_csv, comment]`.
pub struct ScriptDump {
    /// Formula source text.
    pub source_text: String,
    /// Bytecode words.
    pub bytecode: Vec<u32>,
    /// Comment; omitted from the output when empty.
    pub comment: String,
}

impl Serialize for ScriptDump {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.comment.is_empty() { 2 } else { 3 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.source_text)?;
        seq.serialize_element(&encode_hex_csv(&self.bytecode))?;
        if !self.comment.is_empty() {
            seq.serialize_element(&self.comment)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for ScriptDump {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(ScriptDumpVisitor)
    }
}

struct ScriptDumpVisitor;

impl<'de> Visitor<'de> for ScriptDumpVisitor {
    type Value = ScriptDump;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a [source, hex-csv bytecode, comment?] array")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ScriptDump, A::Error> {
        let source_text: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let hex: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        let comment: Option<String> = seq.next_element()?;
        if seq.next_element::<de::IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(4, &self));
        }
        let bytecode = parse_hex_csv(&hex).map_err(de::Error::custom)?;
        Ok(ScriptDump {
            source_text,
            bytecode,
            comment: comment.unwrap_or_default(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Serialized form of one power.
pub struct PowerDump {
    /// Numeric power id.
    pub id: u32,
    /// Dumped tags keyed by raw tag name.
    pub tags: TagDumpMap,
}

/// Format words as lowercase, zero-padded 8-digit hex joined by commas.
pub fn encode_hex_csv(words: &[u32]) -> String {
    words
        .iter()
        .map(|w| format!("{w:08x}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse the output of [`encode_hex_csv`]. An empty string is an empty program.
pub fn parse_hex_csv(s: &str) -> PowerResult<Vec<u32>> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    s.split(',')
        .map(|w| {
            u32::from_str_radix(w.trim(), 16)
                .map_err(|e| PowerError::serde(format!("bytecode word '{w}': {e}")))
        })
        .collect()
}

impl PowerTag {
    /// Structured dump of every entry, keyed by raw tag name.
    ///
    /// Ids missing from the raw-name table are keyed by their decimal id.
    pub fn dump(&self) -> TagDumpMap {
        self.entries()
            .iter()
            .map(|(&id, entry)| {
                let key = self
                    .catalog()
                    .rawname_for(id)
                    .map_or_else(|| id.to_string(), str::to_string);
                (key, TagDump::from_entry(entry))
            })
            .collect()
    }

    /// [`PowerTag::dump`] as a JSON value.
    pub fn dump_json(&self) -> PowerResult<serde_json::Value> {
        serde_json::to_value(self.dump()).map_err(|e| PowerError::serde(e.to_string()))
    }

    /// Id and tag dump of this power.
    pub fn power_dump(&self) -> PowerDump {
        PowerDump {
            id: self.id(),
            tags: self.dump(),
        }
    }
}

/// Parse a tag dump from its JSON text form.
pub fn parse_tag_dump(s: &str) -> PowerResult<TagDumpMap> {
    serde_json::from_str(s).map_err(|e| PowerError::serde(format!("tag dump: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/power/dump.rs"]
mod tests;
