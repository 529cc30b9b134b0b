use std::time::Duration;

use anyhow::{anyhow, Result};

use crate::plc::GeneratedCode;

/// Stand-in generation backend: waits a fixed delay, then returns a templated
/// program that interpolates the submitted description.
#[derive(Debug, Clone)]
pub struct MockGenerator {
    delay: Duration,
    fail: bool,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            delay: Duration::from_millis(2500),
            fail: false,
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay, fail: false }
    }

    /// Variant that always errors after the delay, for exercising the
    /// failure path.
    pub fn failing() -> Self {
        Self {
            delay: Duration::ZERO,
            fail: true,
        }
    }

    pub async fn generate(&self, description: &str) -> Result<GeneratedCode> {
        tokio::time::sleep(self.delay).await;

        if self.fail {
            return Err(anyhow!("mock backend configured to fail"));
        }

        Ok(GeneratedCode {
            structured_text: mock_structured_text(description),
            ladder_summary: mock_ladder_summary(description),
        })
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn mock_structured_text(description: &str) -> String {
    format!(
        "\
PROGRAM GeneratedProgram
VAR
    // Generated variables based on: \"{description}\"
    InputSensor : BOOL := FALSE;
    OutputActuator : BOOL := FALSE;
    SafetyStop : BOOL := FALSE;
    ProcessTimer : TON;
    Counter : CTU;
END_VAR

// Generated logic
IF InputSensor AND NOT SafetyStop THEN
    ProcessTimer(IN := TRUE, PT := T#3S);

    IF ProcessTimer.Q THEN
        OutputActuator := TRUE;
        Counter(CU := TRUE, RESET := FALSE, PV := 10);
    END_IF;
ELSE
    ProcessTimer(IN := FALSE);
    OutputActuator := FALSE;
END_IF;

END_PROGRAM"
    )
}

fn mock_ladder_summary(description: &str) -> String {
    // Quote at most the first 50 characters, not bytes
    let head: String = description.chars().take(50).collect();
    format!("Ladder Logic generated for: \"{head}...\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn generate_interpolates_description() {
        let generator = MockGenerator::with_delay(Duration::ZERO);
        let code = generator
            .generate("start motor on button press")
            .await
            .expect("mock generation succeeds");

        assert!(code
            .structured_text
            .contains("start motor on button press"));
        assert!(code.structured_text.starts_with("PROGRAM GeneratedProgram"));
        assert!(code
            .ladder_summary
            .contains("start motor on button press"));
    }

    #[tokio::test]
    async fn failing_variant_errors() {
        let generator = MockGenerator::failing();
        assert!(generator.generate("anything").await.is_err());
    }

    #[test]
    fn ladder_summary_truncates_long_descriptions() {
        let long = "x".repeat(200);
        let summary = mock_ladder_summary(&long);
        assert!(summary.contains(&"x".repeat(50)));
        assert!(!summary.contains(&"x".repeat(51)));
    }
}
