//! Input composer trait: the pluggable composition algorithm.
//!
//! A composer implements one script's composition strategy (Hangul jamo
//! assembly, romaji to kana, code-table lookup, ...). The engine drives it
//! through this trait and never looks at the concrete type. Per-session
//! state lives in the [`CompositionContext`] passed to every call; the
//! composer's own fields are configuration, cleared by [`InputComposer::reset`].

use crate::context::CompositionContext;
use crate::result::CompositionResult;
use crate::state::AnyState;

/// Composition strategy consumed by the engine.
///
/// # Contract
///
/// - `process_input` returns a failed result when the token cannot be
///   folded into the current state, and leaves the state untouched in that
///   case. On success the action is `Input` or `Update`.
/// - `process_backspace` fails when nothing is composing. When the deletion
///   empties the state the action is `Cancel`, otherwise `Delete`.
/// - `commit` and `cancel` report the outcome but do not reset the state;
///   the engine resets it after reading the result.
/// - `select_candidate` fails (without touching the state) for an index
///   outside the last offered candidate list.
///
/// # Example
///
/// ```
/// use libcompose_core::{
///     AnyState, CompositionAction, CompositionContext, CompositionResult, CompositionState,
///     InputComposer,
/// };
///
/// #[derive(Debug, Clone, PartialEq, Default)]
/// struct Echo {
///     pending: String,
/// }
///
/// impl CompositionState for Echo {
///     fn is_composing(&self) -> bool {
///         !self.pending.is_empty()
///     }
///     fn reset(&mut self) {
///         self.pending.clear();
///     }
/// }
///
/// struct EchoComposer;
///
/// impl InputComposer for EchoComposer {
///     fn name(&self) -> &str { "Echo" }
///     fn language(&self) -> &str { "und" }
///     fn create_state(&self) -> Box<dyn AnyState> { Box::new(Echo::default()) }
///     fn can_process(&self, input: &str) -> bool { input.chars().all(|c| c.is_ascii_lowercase()) }
///
///     fn process_input(&mut self, context: &mut CompositionContext, input: &str) -> CompositionResult {
///         let Some(state) = context.state_as_mut::<Echo>() else {
///             return CompositionResult::failed("unexpected state");
///         };
///         state.pending.push_str(input);
///         CompositionResult::succeeded(state.pending.clone())
///     }
///
///     fn process_backspace(&mut self, context: &mut CompositionContext) -> CompositionResult {
///         match context.state_as_mut::<Echo>().and_then(|s| s.pending.pop()) {
///             Some(_) => CompositionResult::succeeded("").with_action(CompositionAction::Delete),
///             None => CompositionResult::failed("nothing to delete"),
///         }
///     }
///
///     fn commit(&mut self, context: &mut CompositionContext) -> CompositionResult {
///         let text = context.state_as::<Echo>().map(|s| s.pending.clone()).unwrap_or_default();
///         CompositionResult::succeeded("").with_committed(text).with_action(CompositionAction::Commit)
///     }
///
///     fn cancel(&mut self, _context: &mut CompositionContext) -> CompositionResult {
///         CompositionResult::succeeded("").with_action(CompositionAction::Cancel)
///     }
/// }
/// ```
pub trait InputComposer: Send {
    /// Unique name, e.g. "Dubeolsik" or "Romaji".
    fn name(&self) -> &str;

    /// Language code, e.g. "ko-KR", "ja-JP".
    fn language(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Fresh, non-composing state for a new context.
    fn create_state(&self) -> Box<dyn AnyState>;

    /// Check if `input` could start or extend a composition. Must not mutate.
    fn can_process(&self, input: &str) -> bool;

    /// Fold `input` into the context's state.
    fn process_input(&mut self, context: &mut CompositionContext, input: &str) -> CompositionResult;

    /// Remove the last composition unit.
    fn process_backspace(&mut self, context: &mut CompositionContext) -> CompositionResult;

    /// Finalize all pending composition into `committed_text`.
    fn commit(&mut self, context: &mut CompositionContext) -> CompositionResult;

    /// Discard pending composition without committing anything.
    fn cancel(&mut self, context: &mut CompositionContext) -> CompositionResult;

    /// First refusal over reserved keys (space, enter, escape, tab).
    ///
    /// Return `Some(result)` to handle the key; the engine returns it
    /// verbatim. `None` lets the engine apply its default policy.
    fn try_process_special_key(
        &mut self,
        _context: &mut CompositionContext,
        _key: char,
    ) -> Option<CompositionResult> {
        None
    }

    /// Apply a candidate choice from the last offered candidate list.
    fn select_candidate(
        &mut self,
        _context: &mut CompositionContext,
        _index: usize,
    ) -> CompositionResult {
        CompositionResult::failed(format!(
            "candidate selection is not supported by {}",
            self.name()
        ))
    }

    /// Return the composer itself (not the state) to its initial configuration.
    fn reset(&mut self) {}
}
