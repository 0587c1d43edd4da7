use crate::{
    commands::{check_source, CheckOutcome},
    compiler::analyzer::symbols::{DataItemInfo, SymbolKey},
};

/// Helper for executing common analyzer conformance tests
/// within the unit testing framework.
pub struct CommonTestRunner {
    /// The name of this test, used as the analyzed file name.
    name: &'static str,

    /// The input to pass to the analyzer as a source file.
    input: &'static str,

    /// The expected output type.
    expected: ExpectedOutput,

    /// The exact number of diagnostics expected, if checked.
    diagnostics: Option<usize>,

    /// Symbol table entries to verify, as (unit, name, check).
    symbols: Vec<(&'static str, &'static str, fn(&DataItemInfo))>,
}

/// Represents a single expected output from a common analyzer
/// conformance test.
pub enum ExpectedOutput {
    /// Expect nothing, run the test unconditionally.
    /// Only fails on an analyzer panic.
    None,

    /// Analysis fails with diagnostics.
    AnalysisFailure {
        /// Text expected within at least one diagnostic.
        reason: Option<&'static str>,
    },

    /// Analysis succeeds with no diagnostics.
    AnalysisPass,
}

impl CommonTestRunner {
    /// Creates a new common test runner.
    pub fn new(name: &'static str) -> Self {
        CommonTestRunner {
            name,
            input: "",
            expected: ExpectedOutput::None,
            diagnostics: None,
            symbols: Vec::new(),
        }
    }

    /// Sets the input source file as the given static text.
    pub fn source(mut self, source: &'static str) -> Self {
        self.input = source;
        self
    }

    /// Modifies the current test runner to expect an analysis failure, with an optional
    /// reason provided.
    pub fn expect_fail(mut self, reason: Option<&'static str>) -> Self {
        self.expected = ExpectedOutput::AnalysisFailure { reason };
        self
    }

    /// Modifies the current test runner to expect analysis to pass.
    pub fn expect_pass(mut self) -> Self {
        self.expected = ExpectedOutput::AnalysisPass;
        self
    }

    /// Expects exactly the given number of diagnostics to be reported.
    pub fn expect_diagnostics(mut self, count: usize) -> Self {
        self.diagnostics = Some(count);
        self
    }

    /// Expects a data item to be declared within the given unit, running the given
    /// assertions over it.
    pub fn expect_symbol(
        mut self,
        unit: &'static str,
        name: &'static str,
        check: fn(&DataItemInfo),
    ) -> Self {
        self.symbols.push((unit, name, check));
        self
    }

    /// Executes this test runner, returning the outcome for further checks.
    /// Panics on test failure.
    pub fn run(self) -> CheckOutcome {
        let outcome = check_source(self.name, self.input);
        let messages: Vec<String> = outcome.diagnostics.iter().map(|d| d.to_string()).collect();

        match self.expected {
            // No testing required.
            ExpectedOutput::None => {}

            // Test that analysis failed.
            ExpectedOutput::AnalysisFailure { reason } => {
                if outcome.result.is_ok() {
                    panic!(
                        "Test {} expected analysis to fail, but analysis succeeded.",
                        self.name
                    );
                }
                if let Some(reason) = reason {
                    if !messages.iter().any(|m| m.contains(reason)) {
                        panic!(
                            "Test {} expected analysis to fail with reason '{}', but no diagnostic matched. Diagnostics: {:#?}",
                            self.name, reason, messages
                        );
                    }
                }
            }

            // Test that analysis succeeded.
            ExpectedOutput::AnalysisPass => {
                if let Err(e) = &outcome.result {
                    panic!(
                        "Test {} expected to pass, but failed with error: {}\nDiagnostics: {:#?}",
                        self.name, e, messages
                    );
                }
            }
        }

        if let Some(count) = self.diagnostics {
            assert_eq!(
                messages.len(),
                count,
                "Test {} expected {} diagnostic(s), found: {:#?}",
                self.name,
                count,
                messages
            );
        }

        for (unit, name, check) in &self.symbols {
            let key = SymbolKey::new(*unit, *name);
            match outcome.symbols.get(&key) {
                Some(item) => check(item),
                None => panic!("Test {} expected data item '{}' to be declared.", self.name, key),
            }
        }

        outcome
    }
}
