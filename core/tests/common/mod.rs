//! Test composers shared by the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use libcompose_core::{
    AnyState, CompositionAction, CompositionContext, CompositionResult, CompositionState,
    InputComposer,
};

/// Pending letters of a two-letter unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnitState {
    pub letters: String,
}

impl CompositionState for UnitState {
    fn is_composing(&self) -> bool {
        !self.letters.is_empty()
    }

    fn reset(&mut self) {
        self.letters.clear();
    }
}

/// Composes uppercase ASCII letters into two-letter units, rendered in
/// lowercase. A third letter finalizes the completed unit and starts a new
/// one.
#[derive(Debug, Default)]
pub struct UnitComposer {
    pub fail_commit: bool,
    pub resets: Arc<AtomicUsize>,
}

impl UnitComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_commit() -> Self {
        Self {
            fail_commit: true,
            ..Self::default()
        }
    }

    pub fn reset_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.resets)
    }
}

fn render(letters: &str) -> String {
    letters.to_lowercase()
}

impl InputComposer for UnitComposer {
    fn name(&self) -> &str {
        "Unit"
    }

    fn language(&self) -> &str {
        "x-unit"
    }

    fn description(&self) -> &str {
        "two-letter units"
    }

    fn create_state(&self) -> Box<dyn AnyState> {
        Box::new(UnitState::default())
    }

    fn can_process(&self, input: &str) -> bool {
        !input.is_empty() && input.chars().all(|c| c.is_ascii_uppercase())
    }

    fn process_input(&mut self, context: &mut CompositionContext, input: &str) -> CompositionResult {
        if !self.can_process(input) || input.chars().count() != 1 {
            return CompositionResult::failed(format!("'{}' is not a unit letter", input));
        }
        let Some(state) = context.state_as_mut::<UnitState>() else {
            return CompositionResult::failed("unexpected state");
        };

        if state.letters.len() == 2 {
            let finished = render(&state.letters);
            state.letters = input.to_string();
            return CompositionResult::succeeded(render(&state.letters))
                .with_committed(finished)
                .with_buffer(state.letters.clone());
        }

        let action = if state.letters.is_empty() {
            CompositionAction::Input
        } else {
            CompositionAction::Update
        };
        state.letters.push_str(input);
        CompositionResult::succeeded(render(&state.letters))
            .with_buffer(state.letters.clone())
            .with_action(action)
    }

    fn process_backspace(&mut self, context: &mut CompositionContext) -> CompositionResult {
        let Some(state) = context.state_as_mut::<UnitState>() else {
            return CompositionResult::failed("unexpected state");
        };
        if state.letters.pop().is_none() {
            return CompositionResult::failed("nothing to delete");
        }
        let action = if state.letters.is_empty() {
            CompositionAction::Cancel
        } else {
            CompositionAction::Delete
        };
        CompositionResult::succeeded(render(&state.letters))
            .with_buffer(state.letters.clone())
            .with_action(action)
    }

    fn commit(&mut self, context: &mut CompositionContext) -> CompositionResult {
        if self.fail_commit {
            return CompositionResult::failed("commit refused");
        }
        let text = context
            .state_as::<UnitState>()
            .map(|s| render(&s.letters))
            .unwrap_or_default();
        CompositionResult::succeeded("")
            .with_committed(text)
            .with_action(CompositionAction::Commit)
    }

    fn cancel(&mut self, _context: &mut CompositionContext) -> CompositionResult {
        CompositionResult::succeeded("").with_action(CompositionAction::Cancel)
    }

    fn reset(&mut self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

/// Pending code and the currently highlighted candidate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CandidateState {
    pub code: String,
    pub selected: Option<usize>,
}

impl CompositionState for CandidateState {
    fn is_composing(&self) -> bool {
        !self.code.is_empty()
    }

    fn reset(&mut self) {
        self.code.clear();
        self.selected = None;
    }
}

/// Offers three conversions of a lowercase code: as typed, uppercase and
/// reversed. Space cycles the selection while composing; Enter is left to
/// the engine.
#[derive(Debug, Default)]
pub struct CandidateComposer;

impl CandidateComposer {
    pub fn candidates(code: &str) -> Vec<String> {
        vec![
            code.to_string(),
            code.to_uppercase(),
            code.chars().rev().collect(),
        ]
    }

    fn preview(state: &CandidateState) -> CompositionResult {
        let candidates = Self::candidates(&state.code);
        let shown = candidates[state.selected.unwrap_or(0)].clone();
        CompositionResult::succeeded(shown)
            .with_buffer(state.code.clone())
            .with_candidates(candidates)
            .with_selected_candidate(state.selected)
    }
}

impl InputComposer for CandidateComposer {
    fn name(&self) -> &str {
        "Candidate"
    }

    fn language(&self) -> &str {
        "x-cand"
    }

    fn create_state(&self) -> Box<dyn AnyState> {
        Box::new(CandidateState::default())
    }

    fn can_process(&self, input: &str) -> bool {
        !input.is_empty() && input.chars().all(|c| c.is_ascii_lowercase())
    }

    fn process_input(&mut self, context: &mut CompositionContext, input: &str) -> CompositionResult {
        let Some(state) = context.state_as_mut::<CandidateState>() else {
            return CompositionResult::failed("unexpected state");
        };
        state.code.push_str(input);
        state.selected = None;
        Self::preview(state)
    }

    fn process_backspace(&mut self, context: &mut CompositionContext) -> CompositionResult {
        let Some(state) = context.state_as_mut::<CandidateState>() else {
            return CompositionResult::failed("unexpected state");
        };
        if state.code.pop().is_none() {
            return CompositionResult::failed("nothing to delete");
        }
        state.selected = None;
        if state.code.is_empty() {
            return CompositionResult::succeeded("").with_action(CompositionAction::Cancel);
        }
        Self::preview(state).with_action(CompositionAction::Delete)
    }

    fn commit(&mut self, context: &mut CompositionContext) -> CompositionResult {
        let text = context
            .state_as::<CandidateState>()
            .filter(|s| s.is_composing())
            .map(|s| Self::candidates(&s.code)[s.selected.unwrap_or(0)].clone())
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
        if key != ' ' {
            return None;
        }
        let state = context.state_as_mut::<CandidateState>()?;
        if !state.is_composing() {
            return None;
        }
        let next = state.selected.map_or(1, |i| (i + 1) % 3);
        state.selected = Some(next);
        Some(Self::preview(state).with_action(CompositionAction::Update))
    }

    fn select_candidate(&mut self, context: &mut CompositionContext, index: usize) -> CompositionResult {
        let Some(state) = context.state_as_mut::<CandidateState>() else {
            return CompositionResult::failed("unexpected state");
        };
        if !state.is_composing() {
            return CompositionResult::failed("no candidates offered");
        }
        if index >= 3 {
            return CompositionResult::failed(format!("candidate index {} out of range", index));
        }
        state.selected = Some(index);
        Self::preview(state).with_action(CompositionAction::Update)
    }
}

/// Creates a state that is already composing.
#[derive(Debug, Default)]
pub struct StaleComposer;

impl InputComposer for StaleComposer {
    fn name(&self) -> &str {
        "Stale"
    }

    fn language(&self) -> &str {
        "x-stale"
    }

    fn create_state(&self) -> Box<dyn AnyState> {
        Box::new(UnitState {
            letters: "A".to_string(),
        })
    }

    fn can_process(&self, _input: &str) -> bool {
        false
    }

    fn process_input(&mut self, _context: &mut CompositionContext, _input: &str) -> CompositionResult {
        CompositionResult::failed("stale")
    }

    fn process_backspace(&mut self, _context: &mut CompositionContext) -> CompositionResult {
        CompositionResult::failed("stale")
    }

    fn commit(&mut self, _context: &mut CompositionContext) -> CompositionResult {
        CompositionResult::failed("stale")
    }

    fn cancel(&mut self, _context: &mut CompositionContext) -> CompositionResult {
        CompositionResult::failed("stale")
    }
}
