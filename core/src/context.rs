//! Composition context handed to composers.
//!
//! The context is the only carrier of per-session mutable state: it owns
//! exactly one composition state, created by the composer attached to the
//! engine. Cloning a context deep-copies the state, which is what
//! `Engine::get_context()` hands out as a read-only snapshot.

use crate::state::{AnyState, CompositionState};

/// Owner of one composer's composition state.
#[derive(Debug, Clone)]
pub struct CompositionContext {
    state: Box<dyn AnyState>,
}

impl CompositionContext {
    /// Create a context owning `state`.
    pub fn new<S: CompositionState>(state: S) -> Self {
        Self {
            state: Box::new(state),
        }
    }

    /// Create a context from an already boxed state (as returned by
    /// `InputComposer::create_state`).
    pub fn from_boxed(state: Box<dyn AnyState>) -> Self {
        Self { state }
    }

    /// Check if the owned state has pending composition.
    pub fn is_composing(&self) -> bool {
        self.state.composing()
    }

    /// Reset the owned state (not the composer).
    pub fn reset(&mut self) {
        self.state.clear();
    }

    /// Erased view of the owned state.
    pub fn state(&self) -> &dyn AnyState {
        self.state.as_ref()
    }

    /// Typed access for the composer that created the state.
    ///
    /// Returns `None` if the state is of a different type.
    pub fn state_as<S: CompositionState>(&self) -> Option<&S> {
        self.state.as_any().downcast_ref::<S>()
    }

    /// Typed mutable access for the composer that created the state.
    pub fn state_as_mut<S: CompositionState>(&mut self) -> Option<&mut S> {
        self.state.as_any_mut().downcast_mut::<S>()
    }
}

impl PartialEq for CompositionContext {
    fn eq(&self, other: &Self) -> bool {
        self.state.eq_boxed(other.state.as_ref())
    }
}
