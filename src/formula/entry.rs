use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Evaluation progress of one formula entry.
pub enum EvalState {
    /// Script not evaluated yet.
    Unevaluated,
    /// Script evaluation has started and not returned.
    InProgress,
    /// Final value, cached for the lifetime of the owning power.
    Done(i32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Storage form of a tag.
pub enum FormulaKind {
    /// Integer stored directly in the record.
    Constant,
    /// Bytecode program with source text.
    Script,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Bytecode program and source text of a script tag.
pub struct Script {
    /// Executor bytecode words, as stored in the record.
    pub bytecode: Arc<[u32]>,
    /// Human-readable formula source.
    pub source_text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded tag: a constant or a lazily evaluated script.
pub struct FormulaEntry {
    script: Option<Script>,
    comment: String,
    state: EvalState,
}

pub(crate) enum EvalStep {
    Cached(i32),
    Run(Arc<[u32]>),
    Cycle,
}

impl FormulaEntry {
    /// Constant entry, permanently [`EvalState::Done`].
    pub fn constant(value: i32) -> Self {
        Self {
            script: None,
            comment: String::new(),
            state: EvalState::Done(value),
        }
    }

    /// Unevaluated script entry.
    pub fn script(bytecode: Vec<u32>, source_text: impl Into<String>) -> Self {
        Self {
            script: Some(Script {
                bytecode: bytecode.into(),
                source_text: source_text.into(),
            }),
            comment: String::new(),
            state: EvalState::Unevaluated,
        }
    }

    /// Storage form.
    pub fn kind(&self) -> FormulaKind {
        match self.script {
            Some(_) => FormulaKind::Script,
            None => FormulaKind::Constant,
        }
    }

    /// Current evaluation state.
    pub fn state(&self) -> EvalState {
        self.state
    }

    /// Value if the entry is a constant or has finished evaluating.
    pub fn value(&self) -> Option<i32> {
        match self.state {
            EvalState::Done(v) => Some(v),
            _ => None,
        }
    }

    /// Script body, `None` for constants.
    pub fn script_body(&self) -> Option<&Script> {
        self.script.as_ref()
    }

    /// Bytecode words; empty for constants.
    pub fn bytecode(&self) -> &[u32] {
        self.script.as_ref().map_or(&[][..], |s| &s.bytecode[..])
    }

    /// Source text; empty for constants.
    pub fn source_text(&self) -> &str {
        self.script.as_ref().map_or("", |s| s.source_text.as_str())
    }

    /// Attached annotation, empty if none.
    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub(crate) fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    /// Move the state machine one step forward for an evaluation request.
    pub(crate) fn begin_eval(&mut self) -> EvalStep {
        match (self.state, &self.script) {
            (EvalState::Done(v), _) => EvalStep::Cached(v),
            (EvalState::InProgress, _) => EvalStep::Cycle,
            (EvalState::Unevaluated, Some(script)) => {
                let bytecode = Arc::clone(&script.bytecode);
                self.state = EvalState::InProgress;
                EvalStep::Run(bytecode)
            }
            // constants are built Done
            (EvalState::Unevaluated, None) => EvalStep::Cached(0),
        }
    }

    pub(crate) fn finish_eval(&mut self, value: i32) {
        self.state = EvalState::Done(value);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/formula/entry.rs"]
mod tests;
