use fmock_value::ArgumentRecord;
use thiserror::Error;

/// Error type raised by host functions and return callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum MockError {
    #[error("lifecycle error: {0}")]
    Lifecycle(String),

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("invalid comparator `{expr}`: {reason}")]
    InvalidComparator { expr: String, reason: String },

    #[error("ambiguous method on `{owner}`: replaced methods are {}; pass a method name", .methods.join(", "))]
    AmbiguousMethod { owner: String, methods: Vec<String> },

    #[error("assertion failed: {}", describe_failure(.method, .expected, .actual, .args.as_ref()))]
    VerificationFailed {
        method: String,
        expected: String,
        actual: usize,
        /// Expected arguments, when the count was argument-matched.
        args: Option<ArgumentRecord>,
    },

    /// An error raised inside a configured callback or an original
    /// implementation, carried unchanged.
    #[error(transparent)]
    Callback(BoxError),
}

impl MockError {
    /// True for failed verifications; every other kind is a setup error.
    pub fn is_assertion_failure(&self) -> bool {
        matches!(self, MockError::VerificationFailed { .. })
    }

    /// Take back the error a callback raised.
    pub fn into_callback_error(self) -> Option<BoxError> {
        match self {
            MockError::Callback(e) => Some(e),
            _ => None,
        }
    }
}

fn describe_failure(
    method: &str,
    expected: &str,
    actual: &usize,
    args: Option<&ArgumentRecord>,
) -> String {
    match args {
        Some(args) => format!(
            "`{method}` expected to be called with {args} {expected} times, was called with them {actual} times"
        ),
        None => format!("`{method}` expected to be called {expected} times, was called {actual} times"),
    }
}
