use std::collections::HashMap;

use crate::foundation::error::PowerResult;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Attribute context a formula is evaluated against.
pub struct AttributeMap {
    values: HashMap<String, i32>,
}

impl AttributeMap {
    /// Empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, returning the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: i32) -> Option<i32> {
        self.values.insert(name.into(), value)
    }

    /// Builder-style [`AttributeMap::set`].
    pub fn with(mut self, name: impl Into<String>, value: i32) -> Self {
        self.set(name, value);
        self
    }

    /// Value of `name`, if present.
    pub fn get(&self, name: &str) -> Option<i32> {
        self.values.get(name).copied()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, i32)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, i32)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Capability handed to an executor for resolving other tags of the same power.
///
/// Lookups run in the attribute context of the outer evaluation. Unknown tags
/// resolve to 0; a tag that is still being evaluated fails with
/// [`crate::PowerError::RecursiveFormula`].
pub trait TagLookup {
    /// Evaluated value of the tag named `tag_name`.
    fn tag_value(&mut self, tag_name: &str) -> PowerResult<i32>;
}

/// Interpreter for formula bytecode.
pub trait FormulaExecutor {
    /// Run `bytecode` against `attrs`, resolving tag references through `tags`.
    fn execute(
        &self,
        bytecode: &[u32],
        attrs: &AttributeMap,
        tags: &mut dyn TagLookup,
    ) -> PowerResult<i32>;
}
