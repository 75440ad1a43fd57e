//! Compares an engine's actual output with a scenario's expected output

use crate::Scenario;

/// Result of verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyResult {
    Pass,
    Fail(String),
    Skip(String),
}

impl VerifyResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, VerifyResult::Pass)
    }
}

/// Line-by-line output verification
pub struct Verifier;

impl Verifier {
    /// Compare outputs line by line. Trailing whitespace on each line and
    /// trailing blank lines are ignored; the first difference is reported.
    pub fn verify(expected: &str, actual: &str) -> VerifyResult {
        let expected = Self::normalized_lines(expected);
        let actual = Self::normalized_lines(actual);

        for (i, (exp, act)) in expected.iter().zip(actual.iter()).enumerate() {
            if exp != act {
                return VerifyResult::Fail(format!(
                    "Line {} mismatch: expected '{}', got '{}'",
                    i + 1,
                    exp,
                    act
                ));
            }
        }
        if expected.len() != actual.len() {
            return VerifyResult::Fail(format!(
                "Line count mismatch: expected {}, got {}",
                expected.len(),
                actual.len()
            ));
        }
        VerifyResult::Pass
    }

    /// Verify against a scenario; scenarios that print nothing are skipped.
    pub fn verify_scenario(scenario: &Scenario, actual: &str) -> VerifyResult {
        if !scenario.checks_output() {
            return VerifyResult::Skip(format!(
                "Scenario {} is {} only",
                scenario.number,
                scenario.kind.as_str()
            ));
        }
        Self::verify(&scenario.expected, actual)
    }

    fn normalized_lines(text: &str) -> Vec<&str> {
        let mut lines: Vec<&str> = text.lines().map(str::trim_end).collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_identical() {
        assert!(Verifier::verify("1\n2\n\n40,20.00\n", "1\n2\n\n40,20.00").is_pass());
        assert!(Verifier::verify("", "\n\n").is_pass());
        assert!(Verifier::verify("7\r\n", "7\n").is_pass());
    }

    #[test]
    fn test_verify_reports_first_mismatch() {
        assert_eq!(
            Verifier::verify("1\n2\n3\n", "1\n5\n4\n"),
            VerifyResult::Fail("Line 2 mismatch: expected '2', got '5'".to_string())
        );
        assert_eq!(
            Verifier::verify("1\n2\n", "1\n"),
            VerifyResult::Fail("Line count mismatch: expected 2, got 1".to_string())
        );
    }

    #[test]
    fn test_blank_separator_is_significant() {
        assert!(!Verifier::verify("1\n\n2\n", "1\n2\n").is_pass());
    }
}
