//! Decoder and lazy evaluator for binary power records.
//!
//! A power record carries eleven serialized tag maps. Each tag resolves to a
//! constant integer or to a small formula (bytecode plus source text). This
//! crate decodes those maps, evaluates formulas on demand through a
//! caller-supplied [`FormulaExecutor`], and dumps the decoded state to JSON.
//!
//! # Pipeline overview
//!
//! 1. **Catalog**: tag definitions + balance rows -> [`TagCatalog`] (name/id/raw-name tables)
//! 2. **Decode**: [`RawPowerRecord`] -> [`FormulaSet`] -> [`PowerTag`]
//! 3. **Evaluate**: [`PowerTag::formula_value`] runs each script at most once, guarding cycles
//! 4. **Dump**: [`PowerTag::dump`] / [`Registry::dump_all`] -> serde structures
//!
//! [`Registry`] is the entry point: it owns the decoded powers, keyed by name and id,
//! and decodes each record from an [`AssetSource`] on first access.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No globals**: catalog and registry are caller-owned values.
//! - **Bounds-checked decode**: every read goes through [`WordCursor`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod catalog;
mod decode;
mod formula;
mod foundation;
mod power;
mod registry;

pub use catalog::tags::{
    BadIdPolicy, BalanceRecord, CatalogLoadOpts, FORMULA_PARAM_COUNT, TagCatalog, TagDef,
    TagDefinitions,
};
pub use decode::record::{
    FormulaSet, RawPowerRecord, SCRIPT_ENTRY_TYPE, TAG_MAP_OFFSETS, decode_record, decode_tag_map,
    sfid,
};
pub use formula::entry::{EvalState, FormulaEntry, FormulaKind, Script};
pub use formula::exec::{AttributeMap, FormulaExecutor, TagLookup};
pub use foundation::cursor::{WORD_BYTES, WordCursor, sub_slice, words_for_bytes};
pub use foundation::error::{PowerError, PowerResult};
pub use power::dump::{
    PowerDump, ScriptDump, TagDump, TagDumpMap, encode_hex_csv, parse_hex_csv, parse_tag_dump,
};
pub use power::tag::PowerTag;
pub use registry::source::{AssetSource, MemoryAssetSource};
pub use registry::store::Registry;
