//! Dealer passcode gate.
//!
//! The passcode is compiled into the binary and compared here, so the gate only
//! decides which controls a session sees. Write permission on the hosted table
//! must still be enforced by the service's own row-level security.

use subtle::ConstantTimeEq;

/// Notice shown when the passcode does not match.
pub const INVALID_PASSCODE: &str = "Invalid Dealer Passcode";

/// Compares submitted passcodes against the dealer secret.
#[derive(Debug, Clone)]
pub struct AdminGate {
    secret: String,
}

impl AdminGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Whether `code` is the dealer passcode.
    pub fn verify(&self, code: &str) -> bool {
        constant_time_compare(code, &self.secret)
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_accepts_secret() {
        let gate = AdminGate::new("2026");
        assert!(gate.verify("2026"));
        assert!(!gate.verify("0000"));
        assert!(!gate.verify("20260"));
        assert!(!gate.verify(""));
    }

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("test-key-123", "test-key-123"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("short", "much-longer-key"));
    }

    #[test]
    fn test_constant_time_compare_empty() {
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("", "not-empty"));
    }
}
