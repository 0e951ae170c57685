#![allow(dead_code)]

use std::cell::Cell;

use powertag::{
    AttributeMap, FormulaExecutor, PowerResult, RawPowerRecord, TAG_MAP_OFFSETS, TagLookup,
};

pub const PUSH: u32 = 1;
pub const ATTR: u32 = 2;
pub const TAG: u32 = 3;
pub const ADD: u32 = 4;
pub const MUL: u32 = 5;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// Stack machine whose `ATTR`/`TAG` operands index into `names`.
pub struct StackExec {
    pub names: Vec<&'static str>,
    pub calls: Cell<usize>,
}

impl StackExec {
    pub fn new(names: &[&'static str]) -> Self {
        Self {
            names: names.to_vec(),
            calls: Cell::new(0),
        }
    }
}

impl FormulaExecutor for StackExec {
    fn execute(
        &self,
        bytecode: &[u32],
        attrs: &AttributeMap,
        tags: &mut dyn TagLookup,
    ) -> PowerResult<i32> {
        self.calls.set(self.calls.get() + 1);
        let mut stack: Vec<i32> = Vec::new();
        let mut words = bytecode.iter().copied();
        while let Some(op) = words.next() {
            match op {
                PUSH => stack.push(words.next().unwrap_or(0) as i32),
                ATTR => {
                    let name = self.names[words.next().unwrap_or(0) as usize];
                    stack.push(attrs.get(name).unwrap_or(0));
                }
                TAG => {
                    let name = self.names[words.next().unwrap_or(0) as usize];
                    stack.push(tags.tag_value(name)?);
                }
                ADD | MUL => {
                    let b = stack.pop().unwrap_or(0);
                    let a = stack.pop().unwrap_or(0);
                    stack.push(if op == ADD { a + b } else { a * b });
                }
                other => return Err(anyhow::anyhow!("bad opcode {other}").into()),
            }
        }
        Ok(stack.pop().unwrap_or(0))
    }
}

/// Word stream of a single tag map.
#[derive(Default)]
pub struct TagMapBuilder {
    count: u32,
    words: Vec<u32>,
}

impl TagMapBuilder {
    pub fn constant(mut self, id: u32, value: i32) -> Self {
        self.count += 1;
        self.words.extend([9, id, value as u32]);
        self
    }

    pub fn script(mut self, id: u32, text: &str, bytecode: &[u32]) -> Self {
        self.count += 1;
        let mut text_bytes = text.as_bytes().to_vec();
        text_bytes.push(0);
        let name_len = text_bytes.len() as u32;
        let data_len = (bytecode.len() * 4) as u32;
        self.words.extend([4, id, 0, 0, 0, 0, 0, name_len, 0, data_len]);
        text_bytes.resize(text_bytes.len().div_ceil(4) * 4, 0);
        self.words.extend(
            text_bytes
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]])),
        );
        self.words.extend_from_slice(bytecode);
        self
    }

    pub fn words(&self) -> Vec<u32> {
        let mut out = vec![self.count];
        out.extend_from_slice(&self.words);
        out
    }
}

/// Assemble a record: a 16-byte header, the definition block, then map bodies.
pub fn build_record(
    name: &str,
    id: u32,
    maps: &[(usize, TagMapBuilder)],
    details: &[&str],
) -> RawPowerRecord {
    const DEF_BASE: usize = 16;
    let mut data = vec![0u8; DEF_BASE + 0xB0];
    data[..4].copy_from_slice(&id.to_le_bytes());
    for (slot, map) in maps {
        let body: Vec<u8> = map.words().iter().flat_map(|w| w.to_le_bytes()).collect();
        let at = DEF_BASE + TAG_MAP_OFFSETS[*slot];
        let offset = data.len() as u32;
        data[at..at + 4].copy_from_slice(&offset.to_le_bytes());
        data[at + 4..at + 8].copy_from_slice(&(body.len() as u32).to_le_bytes());
        data.extend_from_slice(&body);
    }
    RawPowerRecord {
        name: name.to_string(),
        id,
        data,
        def_base: DEF_BASE,
        script_details: details.iter().map(|s| s.to_string()).collect(),
    }
}
