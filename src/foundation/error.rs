/// Convenience result type used across the crate.
pub type PowerResult<T> = Result<T, PowerError>;

/// Top-level error taxonomy for decoding, catalog loading and evaluation.
#[derive(thiserror::Error, Debug)]
pub enum PowerError {
    /// Length or offset bookkeeping ran past the bounds of a binary record.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// A tag definition carried an id that is not an unsigned integer.
    #[error("unparsable tag id '{0}'")]
    UnparsableTagId(String),

    /// Two tag definitions share one human name.
    #[error("duplicate tag name '{name}' (ids {first} and {second})")]
    DuplicateTagName {
        /// Human tag name.
        name: String,
        /// Id registered first.
        first: u32,
        /// Id that collided with it.
        second: u32,
    },

    /// A formula referenced itself while being evaluated.
    #[error("recursive formula in PowerTag.{power}.\"{tag}\"")]
    RecursiveFormula {
        /// Name of the owning power.
        power: String,
        /// Human name of the offending tag.
        tag: String,
    },

    /// Errors when serializing or deserializing tag data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error, typically raised by a bytecode executor.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PowerError {
    /// Build a [`PowerError::MalformedRecord`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedRecord(msg.into())
    }

    /// Build a [`PowerError::UnparsableTagId`] value.
    pub fn unparsable_id(raw: impl Into<String>) -> Self {
        Self::UnparsableTagId(raw.into())
    }

    /// Build a [`PowerError::RecursiveFormula`] value.
    pub fn recursive(power: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::RecursiveFormula {
            power: power.into(),
            tag: tag.into(),
        }
    }

    /// Build a [`PowerError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
