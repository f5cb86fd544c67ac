use std::ops::{Deref, DerefMut};

use crate::config::MockerConfig;
use crate::dispatch::Interception;
use crate::error::MockError;
use crate::policy::ReturnPolicy;
use crate::registry::ReplacementRegistry;
use crate::substitute::Substitute;

enum State {
    Uninitialized,
    Active(ReplacementRegistry),
}

/// Entry point: replaces functions and methods and owns the session
/// lifecycle.
///
/// `set_up` starts a session with an empty registry and `tear_down` restores
/// every intercepted target and discards the registry. `replace` is only
/// valid in between. Dropping an active mocker tears it down.
pub struct FunctionMocker {
    config: MockerConfig,
    interception: Box<dyn Interception>,
    state: State,
}

impl FunctionMocker {
    pub fn new(interception: impl Interception + 'static) -> Self {
        FunctionMocker::with_config(interception, MockerConfig::default())
    }

    pub fn with_config(interception: impl Interception + 'static, config: MockerConfig) -> Self {
        FunctionMocker {
            config,
            interception: Box::new(interception),
            state: State::Uninitialized,
        }
    }

    pub fn config(&self) -> &MockerConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Active(_))
    }

    /// Start a session.
    ///
    /// With `strict_lifecycle` (the default) this fails with
    /// [`MockError::Lifecycle`] when a session is already active; otherwise
    /// the call is a no-op and the active session is kept.
    pub fn set_up(&mut self) -> Result<(), MockError> {
        if self.is_active() {
            if self.config.strict_lifecycle {
                return Err(MockError::Lifecycle(
                    "set_up called while a session is already active".into(),
                ));
            }
            tracing::debug!("set_up ignored: session already active");
            return Ok(());
        }
        self.state = State::Active(ReplacementRegistry::new(self.config.trace_invocations));
        tracing::debug!("mock session started");
        Ok(())
    }

    /// End the session, restoring every intercepted target. Safe to call
    /// when nothing was replaced or no session is active.
    pub fn tear_down(&mut self) {
        if let State::Active(registry) = std::mem::replace(&mut self.state, State::Uninitialized) {
            registry.tear_down(self.interception.as_mut());
            tracing::debug!("mock session ended");
        }
    }

    /// Start a session scoped to the returned guard; the session is torn
    /// down when the guard is dropped.
    pub fn session(&mut self) -> Result<MockSession<'_>, MockError> {
        self.set_up()?;
        Ok(MockSession { mocker: self })
    }

    /// Replace `target` (`"Class::method"` or `"function"`) with a
    /// substitute that returns `Value::Null`.
    pub fn replace(&mut self, target: &str) -> Result<Substitute, MockError> {
        self.replace_returning(target, ReturnPolicy::Unset)
    }

    /// Replace `target` and bind its return policy.
    ///
    /// Replacing another method of an already replaced class returns the
    /// same substitute. Replacing the same method again only swaps its
    /// policy; recorded calls are kept.
    pub fn replace_returning(
        &mut self,
        target: &str,
        returns: impl Into<ReturnPolicy>,
    ) -> Result<Substitute, MockError> {
        let registry = match &mut self.state {
            State::Active(registry) => registry,
            State::Uninitialized => {
                return Err(MockError::Lifecycle(format!(
                    "cannot replace `{target}`: set_up has not been called"
                )));
            }
        };
        registry.replace(self.interception.as_mut(), target, returns.into())
    }

    /// The active registry, if a session is running.
    pub fn registry(&self) -> Option<&ReplacementRegistry> {
        match &self.state {
            State::Active(registry) => Some(registry),
            State::Uninitialized => None,
        }
    }
}

impl Drop for FunctionMocker {
    fn drop(&mut self) {
        self.tear_down();
    }
}

/// An active session borrowed from a [`FunctionMocker`].
pub struct MockSession<'a> {
    mocker: &'a mut FunctionMocker,
}

impl Deref for MockSession<'_> {
    type Target = FunctionMocker;

    fn deref(&self) -> &FunctionMocker {
        &*self.mocker
    }
}

impl DerefMut for MockSession<'_> {
    fn deref_mut(&mut self) -> &mut FunctionMocker {
        &mut *self.mocker
    }
}

impl Drop for MockSession<'_> {
    fn drop(&mut self) {
        self.mocker.tear_down();
    }
}
