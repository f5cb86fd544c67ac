use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::Value;

/// Arguments captured for a single invocation, in call order.
/// Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArgumentRecord {
    args: Vec<Value>,
}

impl ArgumentRecord {
    pub fn new(args: &[Value]) -> Self {
        ArgumentRecord {
            args: args.to_vec(),
        }
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Deep equality against an expected argument list.
    pub fn matches(&self, expected: &[Value]) -> bool {
        self.args.as_slice() == expected
    }
}

impl From<Vec<Value>> for ArgumentRecord {
    fn from(args: Vec<Value>) -> Self {
        ArgumentRecord { args }
    }
}

impl PartialEq<[Value]> for ArgumentRecord {
    fn eq(&self, other: &[Value]) -> bool {
        self.matches(other)
    }
}

impl fmt::Display for ArgumentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 { write!(f, ", ")?; }
            write!(f, "{arg}")?;
        }
        write!(f, ")")
    }
}
