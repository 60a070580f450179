//! Composition state owned by a composer.
//!
//! Each composer defines its own state type (a jamo buffer, a romaji
//! buffer, a code with a candidate cursor, ...) and implements
//! [`CompositionState`] for it. The engine only ever sees the erased
//! [`AnyState`] view, so it can reset, copy and compare a state without
//! knowing which composer produced it.

use std::any::Any;
use std::fmt;

/// In-progress composition record of one composer.
///
/// `Clone` must produce an independent copy, and a freshly reset state must
/// report `is_composing() == false`.
pub trait CompositionState: Clone + PartialEq + fmt::Debug + Send + 'static {
    /// Check if there is pending composition.
    fn is_composing(&self) -> bool;

    /// Drop all pending composition.
    fn reset(&mut self);
}

/// Object-safe view of a [`CompositionState`].
///
/// Implemented for every `CompositionState`; composers never implement it
/// by hand.
pub trait AnyState: fmt::Debug + Send {
    /// Check if there is pending composition.
    fn composing(&self) -> bool;

    /// Drop all pending composition.
    fn clear(&mut self);

    /// Deep copy behind a new box.
    fn clone_boxed(&self) -> Box<dyn AnyState>;

    /// Structural equality; states of different types are never equal.
    fn eq_boxed(&self, other: &dyn AnyState) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S: CompositionState> AnyState for S {
    fn composing(&self) -> bool {
        self.is_composing()
    }

    fn clear(&mut self) {
        self.reset();
    }

    fn clone_boxed(&self) -> Box<dyn AnyState> {
        Box::new(self.clone())
    }

    fn eq_boxed(&self, other: &dyn AnyState) -> bool {
        other.as_any().downcast_ref::<S>() == Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Clone for Box<dyn AnyState> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

impl PartialEq for dyn AnyState {
    fn eq(&self, other: &Self) -> bool {
        self.eq_boxed(other)
    }
}
