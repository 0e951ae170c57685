use std::{collections::BTreeMap, sync::Arc};

use crate::{
    catalog::tags::TagCatalog,
    decode::record::{FormulaSet, RawPowerRecord, decode_record},
    foundation::error::{PowerError, PowerResult},
    formula::entry::{EvalStep, FormulaEntry},
    formula::exec::{AttributeMap, FormulaExecutor, TagLookup},
};

/// Decoded, queryable view of one power record.
///
/// Lookups take human tag names and translate them through the shared
/// [`TagCatalog`]. Misses resolve to 0 or empty values; only decode errors
/// and recursive formulas are reported as errors.
#[derive(Clone, Debug)]
pub struct PowerTag {
    name: String,
    id: u32,
    catalog: Arc<TagCatalog>,
    formulas: FormulaSet,
}

impl PowerTag {
    /// Decode `record` into a power view.
    pub fn decode(record: &RawPowerRecord, catalog: Arc<TagCatalog>) -> PowerResult<Self> {
        let formulas = decode_record(record)?;
        Ok(Self::from_formulas(
            record.name.clone(),
            record.id,
            catalog,
            formulas,
        ))
    }

    /// Build a power view over already decoded entries.
    pub fn from_formulas(
        name: impl Into<String>,
        id: u32,
        catalog: Arc<TagCatalog>,
        formulas: FormulaSet,
    ) -> Self {
        Self {
            name: name.into(),
            id,
            catalog,
            formulas,
        }
    }

    /// Asset name of the power.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Numeric power id.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Catalog used for name translation.
    pub fn catalog(&self) -> &Arc<TagCatalog> {
        &self.catalog
    }

    /// All decoded entries keyed by tag id.
    pub fn entries(&self) -> &FormulaSet {
        &self.formulas
    }

    /// Entry for a tag id.
    pub fn entry_by_id(&self, id: u32) -> Option<&FormulaEntry> {
        self.formulas.get(&id)
    }

    /// Entry for a human tag name; `None` when the name or the entry is unknown.
    pub fn entry(&self, tag_name: &str) -> Option<&FormulaEntry> {
        self.catalog
            .id_for(tag_name)
            .and_then(|id| self.formulas.get(&id))
    }

    /// Evaluate `tag_name`, returning 0 if the tag is unknown.
    ///
    /// A script whose evaluation failed stays in progress, so every later
    /// request for it (direct or through another formula) reports
    /// [`PowerError::RecursiveFormula`] even when the first failure was an
    /// executor error rather than a cycle.
    pub fn formula_value(
        &mut self,
        tag_name: &str,
        attrs: &AttributeMap,
        exec: &dyn FormulaExecutor,
    ) -> PowerResult<i32> {
        Ok(self.try_formula_value(tag_name, attrs, exec)?.unwrap_or(0))
    }

    /// Evaluate `tag_name`, returning `None` if the tag is unknown.
    ///
    /// A script runs at most once; later calls return its cached value even
    /// for a different `attrs`.
    pub fn try_formula_value(
        &mut self,
        tag_name: &str,
        attrs: &AttributeMap,
        exec: &dyn FormulaExecutor,
    ) -> PowerResult<Option<i32>> {
        match self.catalog.id_for(tag_name) {
            Some(id) => self.value_by_id(id, attrs, exec),
            None => Ok(None),
        }
    }

    /// Evaluate the entry stored under tag `id`.
    pub fn value_by_id(
        &mut self,
        id: u32,
        attrs: &AttributeMap,
        exec: &dyn FormulaExecutor,
    ) -> PowerResult<Option<i32>> {
        let Some(entry) = self.formulas.get_mut(&id) else {
            return Ok(None);
        };
        let bytecode = match entry.begin_eval() {
            EvalStep::Cached(v) => return Ok(Some(v)),
            EvalStep::Cycle => {
                return Err(PowerError::recursive(self.name.as_str(), self.tag_label(id)));
            }
            EvalStep::Run(bytecode) => bytecode,
        };

        tracing::trace!(power = %self.name, id, words = bytecode.len(), "executing formula");
        // An executor error leaves the entry InProgress.
        let value = exec.execute(
            &bytecode,
            attrs,
            &mut PowerScope {
                power: self,
                attrs,
                exec,
            },
        )?;

        if let Some(entry) = self.formulas.get_mut(&id) {
            entry.finish_eval(value);
        }
        Ok(Some(value))
    }

    /// Value of an already finished entry, else 0. Never evaluates.
    pub fn constant_value(&self, tag_name: &str) -> i32 {
        self.entry(tag_name)
            .and_then(FormulaEntry::value)
            .unwrap_or(0)
    }

    /// Comment attached to `tag_name`, empty if none.
    pub fn comment(&self, tag_name: &str) -> &str {
        self.entry(tag_name).map_or("", FormulaEntry::comment)
    }

    /// Bytecode of `tag_name`; empty for constants and unknown tags.
    pub fn bytecode(&self, tag_name: &str) -> &[u32] {
        self.entry(tag_name).map_or(&[][..], FormulaEntry::bytecode)
    }

    /// Human tag name to display text: the value when finished, else the source.
    pub fn formulas(&self) -> BTreeMap<String, String> {
        self.formulas
            .iter()
            .map(|(&id, entry)| {
                let text = match entry.value() {
                    Some(v) => v.to_string(),
                    None => entry.source_text().to_string(),
                };
                (self.tag_label(id), text)
            })
            .collect()
    }

    fn tag_label(&self, id: u32) -> String {
        self.catalog
            .name_for(id)
            .map_or_else(|| id.to_string(), str::to_string)
    }
}

/// Tag resolution handed to the executor during one evaluation.
struct PowerScope<'a> {
    power: &'a mut PowerTag,
    attrs: &'a AttributeMap,
    exec: &'a dyn FormulaExecutor,
}

impl TagLookup for PowerScope<'_> {
    fn tag_value(&mut self, tag_name: &str) -> PowerResult<i32> {
        self.power.formula_value(tag_name, self.attrs, self.exec)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/power/tag.rs"]
mod tests;
