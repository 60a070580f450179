//! Code-table composer driven by a TOML table.
//!
//! Keys accumulate into a code; every code is looked up in the table and
//! its entries are offered as candidates. The composer knows nothing about
//! any particular script: the alphabet and entries come from the file.
//!
//! ```toml
//! name = "Demo table"
//! language = "zh-CN"
//! max_code_length = 4
//! alphabet = "abcdefghijklmnopqrstuvwxyz"
//!
//! [entries]
//! ni = ["你", "尼", "泥"]
//! hao = ["好", "号"]
//! ```

use anyhow::{bail, Context, Result};
use libcompose_core::{
    AnyState, CompositionAction, CompositionContext, CompositionResult, CompositionState,
    InputComposer,
};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

fn default_max_code_length() -> usize {
    4
}

#[derive(Debug, Deserialize)]
struct TableFile {
    name: String,
    #[serde(default)]
    language: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_max_code_length")]
    max_code_length: usize,
    alphabet: String,
    #[serde(default)]
    entries: HashMap<String, Vec<String>>,
}

/// Pending code and the highlighted candidate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableState {
    pub code: String,
    pub selected: Option<usize>,
}

impl CompositionState for TableState {
    fn is_composing(&self) -> bool {
        !self.code.is_empty()
    }

    fn reset(&mut self) {
        self.code.clear();
        self.selected = None;
    }
}

/// Composer that converts codes to candidates through a lookup table.
#[derive(Debug, Clone)]
pub struct TableComposer {
    name: String,
    language: String,
    description: String,
    max_code_length: usize,
    alphabet: BTreeSet<char>,
    entries: HashMap<String, Vec<String>>,
}

impl TableComposer {
    /// Load a table from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading table {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("loading table {}", path.display()))
    }

    /// Parse a table from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TableFile = toml::from_str(content)?;
        if file.max_code_length == 0 {
            bail!("max_code_length must be at least 1");
        }
        if file.alphabet.is_empty() {
            bail!("alphabet must not be empty");
        }

        let alphabet: BTreeSet<char> = file.alphabet.chars().collect();
        if let Some(code) = file
            .entries
            .keys()
            .find(|code| code.chars().any(|c| !alphabet.contains(&c)))
        {
            bail!("entry code '{}' uses characters outside the alphabet", code);
        }

        tracing::debug!(
            table = %file.name,
            entries = file.entries.len(),
            "loaded code table"
        );

        Ok(Self {
            name: file.name,
            language: file.language,
            description: file.description,
            max_code_length: file.max_code_length,
            alphabet,
            entries: file.entries,
        })
    }

    /// Candidates for `code`, empty if the code has no entry.
    pub fn lookup(&self, code: &str) -> &[String] {
        self.entries.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    fn preview(&self, state: &TableState) -> CompositionResult {
        let candidates = self.lookup(&state.code);
        let shown = state
            .selected
            .or(if candidates.is_empty() { None } else { Some(0) })
            .and_then(|i| candidates.get(i))
            .cloned()
            .unwrap_or_else(|| state.code.clone());

        CompositionResult::succeeded(shown)
            .with_buffer(state.code.clone())
            .with_candidates(candidates.iter().cloned())
            .with_selected_candidate(state.selected)
    }

    fn resolve(&self, state: &TableState) -> String {
        self.lookup(&state.code)
            .get(state.selected.unwrap_or(0))
            .cloned()
            .unwrap_or_else(|| state.code.clone())
    }
}

impl InputComposer for TableComposer {
    fn name(&self) -> &str {
        &self.name
    }

    fn language(&self) -> &str {
        &self.language
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn create_state(&self) -> Box<dyn AnyState> {
        Box::new(TableState::default())
    }

    fn can_process(&self, input: &str) -> bool {
        !input.is_empty() && input.chars().all(|c| self.alphabet.contains(&c))
    }

    fn process_input(&mut self, context: &mut CompositionContext, input: &str) -> CompositionResult {
        if !self.can_process(input) {
            return CompositionResult::failed(format!("'{}' is not in the table alphabet", input));
        }
        let Some(state) = context.state_as_mut::<TableState>() else {
            return CompositionResult::failed("unexpected composition state");
        };
        let length = state.code.chars().count() + input.chars().count();
        if length > self.max_code_length {
            return CompositionResult::failed(format!(
                "code exceeds {} keys",
                self.max_code_length
            ));
        }

        let action = if state.code.is_empty() {
            CompositionAction::Input
        } else {
            CompositionAction::Update
        };
        state.code.push_str(input);
        state.selected = None;
        self.preview(state).with_action(action)
    }

    fn process_backspace(&mut self, context: &mut CompositionContext) -> CompositionResult {
        let Some(state) = context.state_as_mut::<TableState>() else {
            return CompositionResult::failed("unexpected composition state");
        };
        if state.code.pop().is_none() {
            return CompositionResult::failed("nothing to delete");
        }
        state.selected = None;
        if state.code.is_empty() {
            return CompositionResult::succeeded("").with_action(CompositionAction::Cancel);
        }
        self.preview(state).with_action(CompositionAction::Delete)
    }

    fn commit(&mut self, context: &mut CompositionContext) -> CompositionResult {
        let text = context
            .state_as::<TableState>()
            .filter(|s| s.is_composing())
            .map(|s| self.resolve(s))
            .unwrap_or_default();
        CompositionResult::succeeded("")
            .with_committed(text)
            .with_action(CompositionAction::Commit)
    }

    fn cancel(&mut self, _context: &mut CompositionContext) -> CompositionResult {
        CompositionResult::succeeded("").with_action(CompositionAction::Cancel)
    }

    fn try_process_special_key(
        &mut self,
        context: &mut CompositionContext,
        key: char,
    ) -> Option<CompositionResult> {
        if key != '\t' {
            return None;
        }
        let state = context.state_as_mut::<TableState>()?;
        let count = self.lookup(&state.code).len();
        if !state.is_composing() || count == 0 {
            return None;
        }
        state.selected = Some(state.selected.map_or(1 % count, |i| (i + 1) % count));
        Some(self.preview(state).with_action(CompositionAction::Update))
    }

    fn select_candidate(&mut self, context: &mut CompositionContext, index: usize) -> CompositionResult {
        let Some(state) = context.state_as_mut::<TableState>() else {
            return CompositionResult::failed("unexpected composition state");
        };
        if !state.is_composing() {
            return CompositionResult::failed("no candidates offered");
        }
        let count = self.lookup(&state.code).len();
        if index >= count {
            return CompositionResult::failed(format!(
                "candidate index {} out of range ({} candidates)",
                index, count
            ));
        }
        state.selected = Some(index);
        self.preview(state).with_action(CompositionAction::Update)
    }
}
