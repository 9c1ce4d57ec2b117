//! Scenario report

use relay_abi::Address;
use serde::Serialize;
use std::fmt::Write as _;

/// Outcome of one scenario check
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

impl Step {
    #[must_use]
    pub fn check(name: &str, passed: bool, detail: String) -> Self {
        Self {
            name: name.to_string(),
            passed,
            detail,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub frontend: Address,
    pub backend_before: Option<Address>,
    pub backend_after: Option<Address>,
    pub final_value: u128,
    pub final_message: String,
    pub events: usize,
    pub steps: Vec<Step>,
}

impl Report {
    #[must_use]
    pub fn new(frontend: Address) -> Self {
        Self {
            frontend,
            backend_before: None,
            backend_after: None,
            final_value: 0,
            final_message: String::new(),
            events: 0,
            steps: Vec::new(),
        }
    }

    pub fn push(&mut self, step: Step) {
        if !step.passed {
            tracing::warn!(step = %step.name, detail = %step.detail, "scenario check failed");
        }
        self.steps.push(step);
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.steps.iter().all(|s| s.passed)
    }

    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Upgrade Scenario Report");
        let _ = writeln!(out, "=======================");
        let _ = writeln!(out);
        let _ = writeln!(out, "Frontend: {}", self.frontend);
        let _ = writeln!(out, "Backend before: {}", render(self.backend_before));
        let _ = writeln!(out, "Backend after: {}", render(self.backend_after));
        let _ = writeln!(out, "Final value: {}", self.final_value);
        let _ = writeln!(out, "Final message: {:?}", self.final_message);
        let _ = writeln!(out, "Events logged: {}", self.events);
        let _ = writeln!(out);
        for step in &self.steps {
            let status = if step.passed { "PASS" } else { "FAIL" };
            let _ = writeln!(out, "{status} {} ({})", step.name, step.detail);
        }
        let _ = writeln!(out);
        let _ = write!(out, "Result: {}", if self.passed() { "PASS" } else { "FAIL" });
        out
    }
}

fn render(address: Option<Address>) -> String {
    address.map_or_else(|| "-".to_string(), |a| a.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_failed_step_fails_the_report() {
        let mut report = Report::new(Address::from_label("frontend"));
        report.push(Step::check("a", true, String::new()));
        assert!(report.passed());
        report.push(Step::check("b", false, "mismatch".to_string()));
        assert!(!report.passed());
        assert!(report.generate_text().contains("FAIL b (mismatch)"));
    }
}
