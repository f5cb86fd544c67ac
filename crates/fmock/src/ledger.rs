use fmock_value::{ArgumentRecord, Value};
use serde::Serialize;
use std::collections::BTreeMap;

/// Ordered argument records per substituted method.
///
/// Append-only while a session is active. For every method, the number of
/// records equals the number of invocations, in call order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvocationLedger {
    calls: BTreeMap<String, Vec<ArgumentRecord>>,
}

impl InvocationLedger {
    pub fn new() -> Self {
        InvocationLedger::default()
    }

    pub fn record(&mut self, method: &str, args: &[Value]) {
        self.calls
            .entry(method.to_string())
            .or_default()
            .push(ArgumentRecord::new(args));
    }

    pub fn records(&self, method: &str) -> &[ArgumentRecord] {
        self.calls.get(method).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, method: &str) -> usize {
        self.records(method).len()
    }

    /// Number of recorded calls whose arguments deep-equal `expected`,
    /// wherever they appear in the sequence.
    pub fn count_matching(&self, method: &str, expected: &[Value]) -> usize {
        self.records(method)
            .iter()
            .filter(|record| record.matches(expected))
            .count()
    }

    /// Serialize the recorded calls to JSON, for diagnostics.
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_keep_call_order() {
        let mut ledger = InvocationLedger::new();
        ledger.record("methodTwo", &[Value::Int(1), Value::Int(2)]);
        ledger.record("methodTwo", &[Value::Int(3), Value::Int(4)]);
        ledger.record("methodOne", &[]);

        let records = ledger.records("methodTwo");
        assert_eq!(records.len(), 2);
        assert!(records[0].matches(&[Value::Int(1), Value::Int(2)]));
        assert!(records[1].matches(&[Value::Int(3), Value::Int(4)]));
        assert_eq!(ledger.count("methodOne"), 1);
        assert_eq!(ledger.count("unknown"), 0);
    }

    #[test]
    fn test_count_matching_ignores_other_args() {
        let mut ledger = InvocationLedger::new();
        let pair = [Value::Int(23), Value::Int(23)];
        ledger.record("m", &pair);
        ledger.record("m", &[Value::Int(23), Value::Int(45)]);
        ledger.record("m", &pair);
        assert_eq!(ledger.count_matching("m", &pair), 2);
        assert_eq!(ledger.count_matching("m", &[Value::Int(23)]), 0);
    }

    #[test]
    fn test_json_lists_methods() {
        let mut ledger = InvocationLedger::new();
        ledger.record("m", &[Value::from("x")]);
        let json = ledger.to_json().unwrap();
        assert!(json.contains("\"m\""));
        assert!(json.contains("\"x\""));
    }
}
