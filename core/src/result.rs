//! Composition results reported to the host after every engine operation.
//!
//! A `CompositionResult` is an immutable value: the host reads it, appends
//! `committed_text` to its buffer and redraws the inline preview from
//! `composing_text` / `buffer`. Every operation returns one, including
//! operations that did nothing (see [`CompositionResult::no_change`]).

use serde::{Deserialize, Serialize};

/// Classifies what an operation did, for host-side UI decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CompositionAction {
    /// Nothing happened
    #[default]
    None,
    /// A token was folded into the composition
    Input,
    /// A composition unit was removed
    Delete,
    /// Pending composition was finalized
    Commit,
    /// Pending composition was discarded
    Cancel,
    /// Composition changed without new input (e.g. candidate selection)
    Update,
}

/// Outcome of a single engine operation.
///
/// Build successful results with [`succeeded`](Self::succeeded) and the
/// consuming `with_*` setters:
///
/// ```
/// use libcompose_core::{CompositionAction, CompositionResult};
///
/// let result = CompositionResult::succeeded("가")
///     .with_committed("나")
///     .with_action(CompositionAction::Update);
/// assert_eq!(result.committed_text(), "나");
/// assert!(result.has_text_change());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawResult")]
pub struct CompositionResult {
    success: bool,
    committed_text: String,
    composing_text: String,
    buffer: String,
    error_message: String,
    action: CompositionAction,
    candidates: Vec<String>,
    selected_candidate_index: Option<usize>,
}

impl CompositionResult {
    /// Successful result with the given preview text and `action == Input`.
    pub fn succeeded<T: Into<String>>(composing_text: T) -> Self {
        Self {
            success: true,
            committed_text: String::new(),
            composing_text: composing_text.into(),
            buffer: String::new(),
            error_message: String::new(),
            action: CompositionAction::Input,
            candidates: Vec::new(),
            selected_candidate_index: None,
        }
    }

    /// Strategy-level failure. Carries only the message; every text field is
    /// empty and the action is `None`.
    pub fn failed<T: Into<String>>(error_message: T) -> Self {
        Self {
            success: false,
            error_message: error_message.into(),
            ..Self::no_change()
        }
    }

    /// Successful result with no observable effect.
    pub fn no_change() -> Self {
        Self {
            success: true,
            committed_text: String::new(),
            composing_text: String::new(),
            buffer: String::new(),
            error_message: String::new(),
            action: CompositionAction::None,
            candidates: Vec::new(),
            selected_candidate_index: None,
        }
    }

    // ========== Builders (no effect on failed results) ==========

    /// Set the text finalized by this call.
    pub fn with_committed<T: Into<String>>(mut self, text: T) -> Self {
        if self.success {
            self.committed_text = text.into();
        }
        self
    }

    /// Set the raw pending input (e.g. a partial transliteration key).
    pub fn with_buffer<T: Into<String>>(mut self, buffer: T) -> Self {
        if self.success {
            self.buffer = buffer.into();
        }
        self
    }

    pub fn with_action(mut self, action: CompositionAction) -> Self {
        if self.success {
            self.action = action;
        }
        self
    }

    /// Set the offered conversion candidates.
    pub fn with_candidates<I, T>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        if self.success {
            self.candidates = candidates.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Mark the candidate at `index` as selected (`None` clears the selection).
    pub fn with_selected_candidate(mut self, index: Option<usize>) -> Self {
        if self.success {
            self.selected_candidate_index = index;
        }
        self
    }

    // ========== Accessors ==========

    pub fn success(&self) -> bool {
        self.success
    }

    /// Text to append to the host buffer now.
    pub fn committed_text(&self) -> &str {
        &self.committed_text
    }

    /// Current in-progress preview, not yet in the host buffer.
    pub fn composing_text(&self) -> &str {
        &self.composing_text
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Failure detail; empty on success.
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn action(&self) -> CompositionAction {
        self.action
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn selected_candidate_index(&self) -> Option<usize> {
        self.selected_candidate_index
    }

    /// The selected candidate text, if the selection is within range.
    pub fn selected_candidate(&self) -> Option<&str> {
        self.selected_candidate_index
            .and_then(|i| self.candidates.get(i))
            .map(String::as_str)
    }

    // ========== Predicates ==========

    /// Check if the host needs to react (text or preview changed).
    pub fn has_text_change(&self) -> bool {
        self.success && self.action != CompositionAction::None
    }

    /// Check if there is raw pending input.
    pub fn has_buffer(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Check if this result leaves pending input to display.
    pub fn is_composing(&self) -> bool {
        self.success && self.has_buffer()
    }
}

/// Wire shape of a result, checked before it becomes a `CompositionResult`.
#[derive(Deserialize)]
struct RawResult {
    success: bool,
    #[serde(default)]
    committed_text: String,
    #[serde(default)]
    composing_text: String,
    #[serde(default)]
    buffer: String,
    #[serde(default)]
    error_message: String,
    #[serde(default)]
    action: CompositionAction,
    #[serde(default)]
    candidates: Vec<String>,
    #[serde(default)]
    selected_candidate_index: Option<usize>,
}

impl TryFrom<RawResult> for CompositionResult {
    type Error = String;

    fn try_from(raw: RawResult) -> Result<Self, Self::Error> {
        if !raw.success {
            let carries_output = !raw.committed_text.is_empty()
                || !raw.composing_text.is_empty()
                || !raw.buffer.is_empty()
                || raw.action != CompositionAction::None
                || !raw.candidates.is_empty()
                || raw.selected_candidate_index.is_some();
            if carries_output {
                return Err("failed result must not carry text, action or candidates".to_string());
            }
            return Ok(Self::failed(raw.error_message));
        }
        if !raw.error_message.is_empty() {
            return Err("successful result must not carry an error message".to_string());
        }

        Ok(Self {
            success: true,
            committed_text: raw.committed_text,
            composing_text: raw.composing_text,
            buffer: raw.buffer,
            error_message: String::new(),
            action: raw.action,
            candidates: raw.candidates,
            selected_candidate_index: raw.selected_candidate_index,
        })
    }
}

impl Default for CompositionResult {
    fn default() -> Self {
        Self::no_change()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_change_is_successful_noop() {
        let result = CompositionResult::no_change();
        assert!(result.success());
        assert_eq!(result.action(), CompositionAction::None);
        assert!(result.committed_text().is_empty());
        assert!(result.candidates().is_empty());
        assert_eq!(result.selected_candidate_index(), None);
        assert!(!result.has_text_change());
        assert_eq!(result, CompositionResult::default());
    }

    #[test]
    fn test_failed_ignores_builders() {
        let result = CompositionResult::failed("nothing to delete")
            .with_committed("x")
            .with_buffer("b")
            .with_action(CompositionAction::Commit)
            .with_candidates(["a"])
            .with_selected_candidate(Some(0));

        assert!(!result.success());
        assert_eq!(result.error_message(), "nothing to delete");
        assert!(result.committed_text().is_empty());
        assert!(result.composing_text().is_empty());
        assert!(result.buffer().is_empty());
        assert_eq!(result.action(), CompositionAction::None);
        assert!(result.candidates().is_empty());
        assert_eq!(result.selected_candidate_index(), None);
    }

    #[test]
    fn test_equality_is_order_sensitive_over_candidates() {
        let a = CompositionResult::succeeded("ka").with_candidates(["か", "カ"]);
        let b = CompositionResult::succeeded("ka").with_candidates(["か", "カ"]);
        let c = CompositionResult::succeeded("ka").with_candidates(["カ", "か"]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_empty_candidates_equal_no_candidates() {
        let empty: [&str; 0] = [];
        let explicit = CompositionResult::succeeded("k").with_candidates(empty);
        let implicit = CompositionResult::succeeded("k");
        assert_eq!(explicit, implicit);
    }

    #[test]
    fn test_equality_covers_every_field() {
        let base = CompositionResult::succeeded("가").with_buffer("ㄱ");
        assert_ne!(base, base.clone().with_committed("나"));
        assert_ne!(base, base.clone().with_buffer("ㄴ"));
        assert_ne!(base, base.clone().with_action(CompositionAction::Update));
        assert_ne!(base, base.clone().with_selected_candidate(Some(0)));
        assert_ne!(
            CompositionResult::failed("a"),
            CompositionResult::failed("b")
        );
    }

    #[test]
    fn test_selected_candidate_lookup() {
        let result = CompositionResult::succeeded("ni")
            .with_candidates(["你", "尼"])
            .with_selected_candidate(Some(1));
        assert_eq!(result.selected_candidate(), Some("尼"));

        let out_of_range = result.clone().with_selected_candidate(Some(5));
        assert_eq!(out_of_range.selected_candidate(), None);
    }

    #[test]
    fn test_deserialize_round_trips_valid_results() {
        let ok = CompositionResult::succeeded("ka")
            .with_buffer("k")
            .with_candidates(["か", "カ"])
            .with_selected_candidate(Some(1));
        let json = serde_json::to_string(&ok).unwrap();
        assert_eq!(serde_json::from_str::<CompositionResult>(&json).unwrap(), ok);

        let failed = CompositionResult::failed("nothing to delete");
        let json = serde_json::to_string(&failed).unwrap();
        assert_eq!(serde_json::from_str::<CompositionResult>(&json).unwrap(), failed);
    }

    #[test]
    fn test_deserialize_rejects_failed_result_with_output() {
        let json = r#"{
            "success": false,
            "committed_text": "leak",
            "composing_text": "",
            "buffer": "",
            "error_message": "rejected",
            "action": "Commit",
            "candidates": [],
            "selected_candidate_index": null
        }"#;
        let err = serde_json::from_str::<CompositionResult>(json).unwrap_err();
        assert!(err.to_string().contains("failed result"));

        let with_candidates = r#"{"success": false, "error_message": "x", "candidates": ["a"]}"#;
        assert!(serde_json::from_str::<CompositionResult>(with_candidates).is_err());
    }

    #[test]
    fn test_deserialize_rejects_success_with_error_message() {
        let json = r#"{"success": true, "error_message": "oops"}"#;
        assert!(serde_json::from_str::<CompositionResult>(json).is_err());
    }

    #[test]
    fn test_buffer_predicates() {
        let pending = CompositionResult::succeeded("").with_buffer("k");
        assert!(pending.has_buffer());
        assert!(pending.is_composing());

        let committed = CompositionResult::succeeded("")
            .with_committed("か")
            .with_action(CompositionAction::Commit);
        assert!(!committed.has_buffer());
        assert!(!committed.is_composing());
        assert!(committed.has_text_change());
    }
}
