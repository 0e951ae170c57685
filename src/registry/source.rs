use std::collections::{BTreeMap, HashMap};

use crate::decode::record::RawPowerRecord;

/// Supplier of binary power records.
pub trait AssetSource {
    /// Record for the power named `name`, or `None` if there is none.
    fn load_power(&self, name: &str) -> Option<RawPowerRecord>;

    /// Name of the power with numeric id `id`.
    fn power_name(&self, id: u32) -> Option<String>;

    /// Every power name this source can load.
    fn power_names(&self) -> Vec<String>;
}

#[derive(Clone, Debug, Default)]
/// In-memory [`AssetSource`] over prepared records.
pub struct MemoryAssetSource {
    records: BTreeMap<String, RawPowerRecord>,
    names_by_id: HashMap<u32, String>,
}

impl MemoryAssetSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the record stored under `record.name`.
    pub fn insert(&mut self, record: RawPowerRecord) {
        if let Some(old) = self.records.get(&record.name) {
            self.names_by_id.remove(&old.id);
        }
        self.names_by_id.insert(record.id, record.name.clone());
        self.records.insert(record.name.clone(), record);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when no record is stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<RawPowerRecord> for MemoryAssetSource {
    fn from_iter<I: IntoIterator<Item = RawPowerRecord>>(iter: I) -> Self {
        let mut out = Self::new();
        for record in iter {
            out.insert(record);
        }
        out
    }
}

impl AssetSource for MemoryAssetSource {
    fn load_power(&self, name: &str) -> Option<RawPowerRecord> {
        self.records.get(name).cloned()
    }

    fn power_name(&self, id: u32) -> Option<String> {
        self.names_by_id.get(&id).cloned()
    }

    fn power_names(&self) -> Vec<String> {
        self.records.keys().cloned().collect()
    }
}

impl<S: AssetSource + ?Sized> AssetSource for &S {
    fn load_power(&self, name: &str) -> Option<RawPowerRecord> {
        (**self).load_power(name)
    }

    fn power_name(&self, id: u32) -> Option<String> {
        (**self).power_name(id)
    }

    fn power_names(&self) -> Vec<String> {
        (**self).power_names()
    }
}
