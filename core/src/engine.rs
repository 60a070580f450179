//! Composition engine: the facade hosts talk to.
//!
//! The `Engine` owns one composer, an optional key mapper and exactly one
//! composition context. Every key event goes through the same pipeline:
//!
//! 1. Backspace goes straight to [`Engine::backspace`].
//! 2. Reserved keys (enter, space, tab, escape) are offered to the composer;
//!    if it declines, the engine applies its default policy.
//! 3. Other keys are resolved to a token (through the key mapper when one is
//!    configured) and handed to the composer. Keys that do not resolve flush
//!    the current composition and pass through as literal text.
//!
//! Composition failures never escape as errors. A failed result from the
//! composer becomes a no-op result, after a defensive state reset where the
//! composer may have left a partial state behind.

use crate::composer::InputComposer;
use crate::context::CompositionContext;
use crate::error::EngineError;
use crate::key_mapper::KeyMapper;
use crate::keys::{SpecialKey, BACKSPACE};
use crate::result::{CompositionAction, CompositionResult};
use crate::Config;

/// Keystroke composition engine.
///
/// # Example
///
/// ```
/// use libcompose_core::{
///     AnyState, CompositionAction, CompositionContext, CompositionResult, CompositionState,
///     Engine, InputComposer, TableKeyMapper,
/// };
///
/// #[derive(Debug, Clone, PartialEq, Default)]
/// struct Upper {
///     pending: String,
/// }
///
/// impl CompositionState for Upper {
///     fn is_composing(&self) -> bool {
///         !self.pending.is_empty()
///     }
///     fn reset(&mut self) {
///         self.pending.clear();
///     }
/// }
///
/// struct UpperComposer;
///
/// impl InputComposer for UpperComposer {
///     fn name(&self) -> &str { "Upper" }
///     fn language(&self) -> &str { "und" }
///     fn create_state(&self) -> Box<dyn AnyState> { Box::new(Upper::default()) }
///     fn can_process(&self, input: &str) -> bool { input.chars().all(|c| c.is_ascii_uppercase()) }
///
///     fn process_input(&mut self, context: &mut CompositionContext, input: &str) -> CompositionResult {
///         let Some(state) = context.state_as_mut::<Upper>() else {
///             return CompositionResult::failed("unexpected state");
///         };
///         state.pending.push_str(input);
///         CompositionResult::succeeded(state.pending.to_lowercase()).with_buffer(state.pending.clone())
///     }
///
///     fn process_backspace(&mut self, context: &mut CompositionContext) -> CompositionResult {
///         match context.state_as_mut::<Upper>().and_then(|s| s.pending.pop()) {
///             Some(_) => CompositionResult::succeeded("").with_action(CompositionAction::Delete),
///             None => CompositionResult::failed("nothing to delete"),
///         }
///     }
///
///     fn commit(&mut self, context: &mut CompositionContext) -> CompositionResult {
///         let text = context.state_as::<Upper>().map(|s| s.pending.to_lowercase()).unwrap_or_default();
///         CompositionResult::succeeded("").with_committed(text).with_action(CompositionAction::Commit)
///     }
///
///     fn cancel(&mut self, _context: &mut CompositionContext) -> CompositionResult {
///         CompositionResult::succeeded("").with_action(CompositionAction::Cancel)
///     }
/// }
///
/// let layout = TableKeyMapper::from_pairs("shifted", [('r', "R"), ('k', "K")]);
/// let mut engine = Engine::with_key_mapper(layout, UpperComposer)?;
///
/// engine.input('r');
/// let result = engine.input('k');
/// assert_eq!(result.composing_text(), "rk");
///
/// let mut host_buffer = String::new();
/// host_buffer.push_str(engine.commit().committed_text());
/// assert_eq!(host_buffer, "rk");
/// assert!(!engine.is_composing());
/// # Ok::<(), libcompose_core::EngineError>(())
/// ```
pub struct Engine {
    composer: Box<dyn InputComposer>,
    key_mapper: Option<Box<dyn KeyMapper>>,
    context: CompositionContext,
    config: Config,
}

impl Engine {
    /// Create an engine that feeds raw keys to `composer`.
    pub fn new<C: InputComposer + 'static>(composer: C) -> Result<Self, EngineError> {
        Self::from_parts(Box::new(composer), None, Config::default())
    }

    /// Create an engine that maps keys through `key_mapper` before they
    /// reach `composer`.
    pub fn with_key_mapper<M, C>(key_mapper: M, composer: C) -> Result<Self, EngineError>
    where
        M: KeyMapper + 'static,
        C: InputComposer + 'static,
    {
        Self::from_parts(Box::new(composer), Some(Box::new(key_mapper)), Config::default())
    }

    /// Start building an engine from boxed collaborators.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    fn from_parts(
        composer: Box<dyn InputComposer>,
        key_mapper: Option<Box<dyn KeyMapper>>,
        config: Config,
    ) -> Result<Self, EngineError> {
        let context = CompositionContext::from_boxed(composer.create_state());
        if context.is_composing() {
            return Err(EngineError::StaleInitialState {
                composer: composer.name().to_string(),
            });
        }

        tracing::debug!(
            composer = composer.name(),
            language = composer.language(),
            key_mapper = key_mapper.as_ref().map(|m| m.name()),
            "composition engine created"
        );

        Ok(Self {
            composer,
            key_mapper,
            context,
            config,
        })
    }

    /// Replace the engine configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    // ========== Properties ==========

    /// Check if a composition is in progress.
    pub fn is_composing(&self) -> bool {
        self.context.is_composing()
    }

    pub fn composer_name(&self) -> &str {
        self.composer.name()
    }

    /// Language code of the attached composer.
    pub fn language_code(&self) -> &str {
        self.composer.language()
    }

    /// Name of the key mapper, if one is configured.
    pub fn key_mapper_name(&self) -> Option<&str> {
        self.key_mapper.as_deref().map(|m| m.name())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Borrow the live context.
    pub fn context(&self) -> &CompositionContext {
        &self.context
    }

    /// Deep copy of the current context for read-only inspection.
    pub fn get_context(&self) -> CompositionContext {
        self.context.clone()
    }

    // ========== Operations ==========

    /// Process one key event.
    pub fn input(&mut self, key: char) -> CompositionResult {
        if key == BACKSPACE {
            return self.backspace();
        }

        if let Some(special) = SpecialKey::from_char(key) {
            if let Some(result) = self.composer.try_process_special_key(&mut self.context, key) {
                tracing::trace!(composer = self.composer.name(), ?special, "special key handled by composer");
                return result;
            }
            return self.process_special_key_default(special);
        }

        match self.resolve_token(key) {
            Some(token) => self.process_token(&token),
            None if self.is_composing() => self.flush_with_literal(key),
            None => {
                tracing::trace!(?key, "unresolved key while idle, leaving it to the host");
                CompositionResult::no_change()
            }
        }
    }

    /// Remove the last composition unit. A no-op when nothing is composing.
    pub fn backspace(&mut self) -> CompositionResult {
        let result = self.composer.process_backspace(&mut self.context);
        if result.success() {
            result
        } else {
            CompositionResult::no_change()
        }
    }

    /// Finalize the pending composition. The state is reset even if the
    /// composer reports failure.
    pub fn commit(&mut self) -> CompositionResult {
        let result = self.composer.commit(&mut self.context);
        self.context.reset();
        result
    }

    /// Discard the pending composition. The state is reset even if the
    /// composer reports failure.
    pub fn cancel(&mut self) -> CompositionResult {
        let result = self.composer.cancel(&mut self.context);
        self.context.reset();
        result
    }

    /// Return both the composer and the context state to their initial
    /// configuration.
    pub fn reset(&mut self) {
        tracing::debug!(composer = self.composer.name(), "engine reset");
        self.composer.reset();
        self.context.reset();
    }

    /// Apply a candidate choice. Does not reset the state: selection may
    /// keep the composition going.
    pub fn select_candidate(&mut self, index: usize) -> CompositionResult {
        self.composer.select_candidate(&mut self.context, index)
    }

    // ========== Pipeline steps ==========

    fn process_special_key_default(&mut self, key: SpecialKey) -> CompositionResult {
        tracing::debug!(?key, composing = self.is_composing(), "default special key policy");
        match key {
            SpecialKey::Enter if self.config.commit_on_enter => self.commit(),
            SpecialKey::Space if self.config.commit_on_space => self.commit(),
            SpecialKey::Escape if self.config.cancel_on_escape => self.cancel(),
            _ => CompositionResult::no_change(),
        }
    }

    fn resolve_token(&self, key: char) -> Option<String> {
        match self.key_mapper.as_deref() {
            Some(mapper) => mapper.try_map(key),
            None => {
                let raw = key.to_string();
                self.composer.can_process(&raw).then_some(raw)
            }
        }
    }

    fn process_token(&mut self, token: &str) -> CompositionResult {
        let result = self.composer.process_input(&mut self.context, token);
        if result.success() {
            tracing::trace!(token, action = ?result.action(), "token composed");
            return result;
        }

        tracing::debug!(
            composer = self.composer.name(),
            token,
            error = result.error_message(),
            "composer rejected token, resetting state"
        );
        self.context.reset();
        CompositionResult::no_change()
    }

    /// Commit the pending composition and pass `key` through after it.
    fn flush_with_literal(&mut self, key: char) -> CompositionResult {
        tracing::debug!(composer = self.composer.name(), ?key, "flushing composition before unresolved key");
        let flushed = self.commit();

        let mut committed = flushed.committed_text().to_string();
        if self.config.append_control_keys || !key.is_control() {
            committed.push(key);
        }

        CompositionResult::succeeded("")
            .with_committed(committed)
            .with_action(CompositionAction::Input)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("composer", &self.composer.name())
            .field("key_mapper", &self.key_mapper_name())
            .field("context", &self.context)
            .field("config", &self.config)
            .finish()
    }
}

/// Incremental construction of an [`Engine`] from boxed collaborators.
///
/// Useful when the composer and layout are picked at runtime. `build`
/// fails immediately if a required collaborator is missing.
#[derive(Default)]
pub struct EngineBuilder {
    composer: Option<Box<dyn InputComposer>>,
    key_mapper: Option<Box<dyn KeyMapper>>,
    config: Config,
}

impl EngineBuilder {
    pub fn composer(mut self, composer: Box<dyn InputComposer>) -> Self {
        self.composer = Some(composer);
        self
    }

    pub fn key_mapper(mut self, key_mapper: Box<dyn KeyMapper>) -> Self {
        self.key_mapper = Some(key_mapper);
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Engine, EngineError> {
        let composer = self.composer.ok_or(EngineError::MissingComposer)?;
        Engine::from_parts(composer, self.key_mapper, self.config)
    }
}
