use std::collections::BTreeMap;

use crate::{
    foundation::cursor::{WORD_BYTES, WordCursor, sub_slice, words_for_bytes},
    foundation::error::{PowerError, PowerResult},
    formula::entry::FormulaEntry,
};

/// Byte offsets, relative to the power definition, of the serialized tag maps.
pub const TAG_MAP_OFFSETS: [usize; 11] = [
    0x008, 0x018, 0x028, 0x050, 0x058, 0x060, 0x068, 0x090, 0x098, 0x0A0, 0x0A8,
];

/// Record `type` word marking a script entry; any other value is a constant.
pub const SCRIPT_ENTRY_TYPE: u32 = 4;

const SCRIPT_RESERVED_HEAD: usize = 5;
const SCRIPT_RESERVED_MID: usize = 1;

/// Tag id of the script formula stored in script-detail slot `index`.
pub const fn sfid(index: usize) -> u32 {
    0x41100 + ((index / 10) as u32) * 0x1000 + ((index % 10) as u32) * 0x100
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Binary power record as supplied by an asset source.
pub struct RawPowerRecord {
    /// Asset name of the power.
    pub name: String,
    /// Numeric power id from the record header.
    pub id: u32,
    /// Whole record bytes.
    pub data: Vec<u8>,
    /// Byte offset of the power definition inside `data`.
    pub def_base: usize,
    /// Text of each script-detail slot, in slot order.
    pub script_details: Vec<String>,
}

/// Decoded tag entries keyed by tag id.
pub type FormulaSet = BTreeMap<u32, FormulaEntry>;

/// Decode every tag map of `record` and attach script-detail comments.
///
/// Entries are taken from the maps in [`TAG_MAP_OFFSETS`] order; a repeated
/// tag id keeps the last entry seen.
#[tracing::instrument(skip(record), fields(power = %record.name, id = record.id))]
pub fn decode_record(record: &RawPowerRecord) -> PowerResult<FormulaSet> {
    let mut formulas = FormulaSet::new();

    for offset in TAG_MAP_OFFSETS {
        decode_map_at(record, offset, &mut formulas).map_err(|e| match e {
            PowerError::MalformedRecord(msg) => PowerError::malformed(format!(
                "{}: tag map +{offset:#05x}: {msg}",
                record.name
            )),
            other => other,
        })?;
    }

    attach_comments(&mut formulas, &record.script_details);

    tracing::debug!(entries = formulas.len(), "decoded power record");
    Ok(formulas)
}

fn decode_map_at(record: &RawPowerRecord, offset: usize, out: &mut FormulaSet) -> PowerResult<()> {
    let map = tag_map_region(record, offset)?;
    if !map.is_empty() {
        decode_tag_map(map, out)?;
    }
    Ok(())
}

/// Locate the bytes of the tag map whose descriptor sits at `def_base + offset`.
fn tag_map_region(record: &RawPowerRecord, offset: usize) -> PowerResult<&[u8]> {
    let at = record
        .def_base
        .checked_add(offset)
        .ok_or_else(|| PowerError::malformed("definition base overflows"))?;
    let mut cursor = WordCursor::new(sub_slice(&record.data, at, 2 * WORD_BYTES)?);
    let data_offset = cursor.read_u32()? as usize;
    let data_size = cursor.read_u32()? as usize;
    if data_size == 0 {
        return Ok(&[]);
    }
    sub_slice(&record.data, data_offset, data_size)
}

/// Decode one length-prefixed tag map into `out`, returning the words consumed.
pub fn decode_tag_map(bytes: &[u8], out: &mut FormulaSet) -> PowerResult<usize> {
    let mut cursor = WordCursor::new(bytes);
    let count = cursor.read_u32()?;

    for _ in 0..count {
        let kind = cursor.read_u32()?;
        let id = cursor.read_u32()?;
        let entry = if kind != SCRIPT_ENTRY_TYPE {
            FormulaEntry::constant(cursor.read_i32()?)
        } else {
            decode_script(&mut cursor)?
        };
        out.insert(id, entry);
    }

    Ok(cursor.words_consumed())
}

fn decode_script(cursor: &mut WordCursor<'_>) -> PowerResult<FormulaEntry> {
    cursor.skip_words(SCRIPT_RESERVED_HEAD)?;
    let name_len = cursor.read_u32()?;
    cursor.skip_words(SCRIPT_RESERVED_MID)?;
    let data_len = cursor.read_u32()?;

    let text = cursor.take_words(words_for_bytes(name_len))?;
    let text = &text[..name_len as usize];
    let text = text.split(|&b| b == 0).next().unwrap_or_default();
    let source_text = String::from_utf8_lossy(text).into_owned();

    let bytecode = cursor.read_words(words_for_bytes(data_len))?;
    Ok(FormulaEntry::script(bytecode, source_text))
}

/// Set the comment of every script entry addressed by a script-detail slot.
fn attach_comments(formulas: &mut FormulaSet, details: &[String]) {
    for (index, text) in details.iter().enumerate() {
        match formulas.get_mut(&sfid(index)) {
            Some(entry) if entry.script_body().is_some() => {
                tracing::trace!(index, id = sfid(index), "attached script comment");
                entry.set_comment(text.as_str());
            }
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/decode/record.rs"]
mod tests;
