use std::collections::{BTreeMap, HashMap};

use crate::foundation::error::{PowerError, PowerResult};

/// Number of default parameter slots carried by every power formula family.
pub const FORMULA_PARAM_COUNT: usize = 76;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// One entry of the tag definition resource.
pub struct TagDef {
    /// Human tag name used by lookups.
    pub name: String,
    /// Raw tag identifier, used only as the key of dumped output.
    #[serde(rename = "tag")]
    pub raw: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
/// Tag definitions keyed by stringified numeric tag id.
pub struct TagDefinitions(pub BTreeMap<String, TagDef>);

impl TagDefinitions {
    /// Parse definitions from their JSON text form.
    pub fn from_json_str(s: &str) -> PowerResult<Self> {
        serde_json::from_str(s).map_err(|e| PowerError::serde(format!("tag definitions: {e}")))
    }

    /// Add one definition under `id`.
    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>, raw: impl Into<String>) {
        self.0.insert(
            id.into(),
            TagDef {
                name: name.into(),
                raw: raw.into(),
            },
        );
    }
}

#[derive(Clone, Debug, PartialEq)]
/// One power formula row of the balance dataset.
pub struct BalanceRecord {
    /// Formula family name.
    pub family: String,
    /// Default parameter slots.
    pub params: [f32; FORMULA_PARAM_COUNT],
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// What catalog loading does with a definition whose id is not numeric.
pub enum BadIdPolicy {
    /// Log a warning and drop the definition.
    Skip,
    /// Fail the whole load with [`PowerError::UnparsableTagId`].
    #[default]
    Abort,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Options for [`TagCatalog::load`].
pub struct CatalogLoadOpts {
    /// Handling of non-numeric definition ids.
    pub on_bad_id: BadIdPolicy,
}

#[derive(Clone, Debug, Default)]
/// Read-only lookup tables between tag names, numeric ids and raw names.
pub struct TagCatalog {
    name_to_id: HashMap<String, u32>,
    id_to_name: HashMap<u32, String>,
    id_to_rawname: HashMap<u32, String>,
    formula_defaults: HashMap<String, [f32; FORMULA_PARAM_COUNT]>,
}

impl TagCatalog {
    /// Build the catalog from tag definitions and the balance dataset.
    ///
    /// Later balance rows replace earlier rows of the same family.
    #[tracing::instrument(skip_all, fields(defs = defs.0.len()))]
    pub fn load(
        defs: &TagDefinitions,
        balance: &[BalanceRecord],
        opts: CatalogLoadOpts,
    ) -> PowerResult<Self> {
        let mut out = Self::default();

        for (raw_id, def) in &defs.0 {
            let id = match raw_id.trim().parse::<u32>() {
                Ok(id) => id,
                Err(_) => match opts.on_bad_id {
                    BadIdPolicy::Abort => return Err(PowerError::unparsable_id(raw_id.as_str())),
                    BadIdPolicy::Skip => {
                        tracing::warn!(id = %raw_id, name = %def.name, "skipping tag with unparsable id");
                        continue;
                    }
                },
            };
            out.insert_tag(id, &def.name, &def.raw)?;
        }

        for row in balance {
            out.formula_defaults.insert(row.family.clone(), row.params);
        }

        tracing::debug!(
            tags = out.id_to_name.len(),
            families = out.formula_defaults.len(),
            "tag catalog loaded"
        );
        Ok(out)
    }

    /// Parse definitions from JSON text and load them with `balance`.
    pub fn from_json_str(
        defs_json: &str,
        balance: &[BalanceRecord],
        opts: CatalogLoadOpts,
    ) -> PowerResult<Self> {
        let defs = TagDefinitions::from_json_str(defs_json)?;
        Self::load(&defs, balance, opts)
    }

    fn insert_tag(&mut self, id: u32, name: &str, raw: &str) -> PowerResult<()> {
        if let Some(&first) = self.name_to_id.get(name)
            && first != id
        {
            return Err(PowerError::DuplicateTagName {
                name: name.to_string(),
                first,
                second: id,
            });
        }
        // "7" and "007" name the same id; keep the maps a bijection.
        if let Some(old) = self.id_to_name.get(&id)
            && old != name
        {
            self.name_to_id.remove(old);
        }
        self.name_to_id.insert(name.to_string(), id);
        self.id_to_name.insert(id, name.to_string());
        self.id_to_rawname.insert(id, raw.to_string());
        Ok(())
    }

    /// Human name registered for `id`.
    pub fn name_for(&self, id: u32) -> Option<&str> {
        self.id_to_name.get(&id).map(String::as_str)
    }

    /// Numeric id registered for `name`.
    pub fn id_for(&self, name: &str) -> Option<u32> {
        self.name_to_id.get(name).copied()
    }

    /// Raw serialization key registered for `id`.
    pub fn rawname_for(&self, id: u32) -> Option<&str> {
        self.id_to_rawname.get(&id).map(String::as_str)
    }

    /// Default parameter table of a formula family.
    pub fn formula_defaults(&self, family: &str) -> Option<&[f32; FORMULA_PARAM_COUNT]> {
        self.formula_defaults.get(family)
    }

    /// One default parameter of a formula family.
    pub fn formula_default(&self, family: &str, slot: usize) -> Option<f32> {
        self.formula_defaults(family)?.get(slot).copied()
    }

    /// Number of tags known to the catalog.
    pub fn len(&self) -> usize {
        self.id_to_name.len()
    }

    /// `true` when no tag is known.
    pub fn is_empty(&self) -> bool {
        self.id_to_name.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/tags.rs"]
mod tests;
