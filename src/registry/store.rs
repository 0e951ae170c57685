use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use crate::{
    catalog::tags::TagCatalog,
    foundation::error::PowerResult,
    power::dump::PowerDump,
    power::tag::PowerTag,
    registry::source::AssetSource,
};

/// Caller-owned cache of decoded powers.
///
/// Each power is decoded at most once and is reachable by name and by id.
/// A requested name that the source resolves to a record with a different
/// name is remembered as an alias of that record's name.
/// The registry is meant for use from one thread; wrap it in a lock to share it.
#[derive(Debug)]
pub struct Registry<S> {
    source: S,
    catalog: Arc<TagCatalog>,
    by_name: HashMap<String, PowerTag>,
    by_id: HashMap<u32, String>,
    aliases: HashMap<String, String>,
}

impl<S: AssetSource> Registry<S> {
    /// Empty registry decoding records from `source`.
    pub fn new(source: S, catalog: Arc<TagCatalog>) -> Self {
        Self {
            source,
            catalog,
            by_name: HashMap::new(),
            by_id: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// Catalog shared with every decoded power.
    pub fn catalog(&self) -> &Arc<TagCatalog> {
        &self.catalog
    }

    /// Record source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Number of decoded powers.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// `true` when nothing has been decoded yet.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// `true` if `name`, or the record it resolved to, is already decoded.
    pub fn is_cached(&self, name: &str) -> bool {
        self.by_name.contains_key(self.canonical_name(name))
    }

    fn canonical_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map_or(name, String::as_str)
    }

    /// `true` if a power with `id` is already decoded.
    pub fn is_cached_id(&self, id: u32) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Power named `name`, decoding it on first access.
    ///
    /// Returns `Ok(None)` when the source has no record for `name`. A decode
    /// error leaves the cache untouched.
    #[tracing::instrument(skip(self))]
    pub fn get_by_name(&mut self, name: &str) -> PowerResult<Option<&mut PowerTag>> {
        let cached = self.canonical_name(name).to_string();
        if self.by_name.contains_key(&cached) {
            return Ok(self.by_name.get_mut(&cached));
        }

        let Some(record) = self.source.load_power(name) else {
            tracing::debug!("power not found in asset source");
            return Ok(None);
        };
        let power = PowerTag::decode(&record, Arc::clone(&self.catalog))?;
        tracing::debug!(id = power.id(), entries = power.entries().len(), "power decoded");

        let key = power.name().to_string();
        if key != name {
            tracing::debug!(record = %key, "requested name is an alias");
            self.aliases.insert(name.to_string(), key.clone());
        }
        if self.by_name.contains_key(&key) {
            // keep the live power and its evaluation state
            return Ok(self.by_name.get_mut(&key));
        }
        self.by_id.insert(power.id(), key.clone());
        self.by_name.insert(key.clone(), power);
        Ok(self.by_name.get_mut(&key))
    }

    /// Power with numeric id `id`, resolving its name through the source on a miss.
    #[tracing::instrument(skip(self))]
    pub fn get_by_id(&mut self, id: u32) -> PowerResult<Option<&mut PowerTag>> {
        let name = match self.by_id.get(&id) {
            Some(name) => name.clone(),
            None => match self.source.power_name(id) {
                Some(name) => name,
                None => {
                    tracing::debug!("power id has no name");
                    return Ok(None);
                }
            },
        };
        self.get_by_name(&name)
    }

    /// Decode every power the source lists and collect their dumps by name.
    #[tracing::instrument(skip(self))]
    pub fn dump_all(&mut self) -> PowerResult<BTreeMap<String, PowerDump>> {
        let names = self.source.power_names();
        let mut out = BTreeMap::new();
        for name in names {
            if let Some(power) = self.get_by_name(&name)? {
                out.insert(name, power.power_dump());
            }
        }
        tracing::debug!(powers = out.len(), "dumped powers");
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/store.rs"]
mod tests;
