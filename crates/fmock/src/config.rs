use serde::{Deserialize, Serialize};

/// Mocker settings. Every field has a default, so partial JSON is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockerConfig {
    /// Reject `set_up` while a session is already active. When false, a
    /// second `set_up` is a no-op that keeps the active session.
    pub strict_lifecycle: bool,
    /// Emit a trace event for every substitute invocation.
    pub trace_invocations: bool,
}

impl Default for MockerConfig {
    fn default() -> Self {
        MockerConfig {
            strict_lifecycle: true,
            trace_invocations: false,
        }
    }
}

impl MockerConfig {
    pub fn strict_lifecycle(mut self, strict: bool) -> Self {
        self.strict_lifecycle = strict;
        self
    }

    pub fn trace_invocations(mut self, trace: bool) -> Self {
        self.trace_invocations = trace;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
