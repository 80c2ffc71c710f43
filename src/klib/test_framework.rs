//! Framework de testes do kernel
//!
//! Suites de autoteste rodam dentro do kernel (feature `self_test`), sem
//! alocação e sem formatação: cada caso só devolve um `TestResult`.

/// Resultado de teste
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestResult {
    Passed,
    Failed,
    Skipped,
}

impl TestResult {
    /// `Passed` se `cond`, senão `Failed`.
    pub const fn check(cond: bool) -> Self {
        if cond {
            TestResult::Passed
        } else {
            TestResult::Failed
        }
    }
}

/// Um caso de teste
pub struct TestCase {
    pub name: &'static str,
    pub func: fn() -> TestResult,
}

/// Totais de uma suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuiteReport {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SuiteReport {
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Executa suite de testes
pub fn run_test_suite(name: &'static str, tests: &[TestCase]) -> SuiteReport {
    crate::kinfo!("=== Executando suite:");
    crate::kinfo!(name);

    let mut report = SuiteReport::default();

    for test in tests {
        match (test.func)() {
            TestResult::Passed => {
                crate::kok!(test.name);
                report.passed += 1;
            }
            TestResult::Failed => {
                crate::kerror!(test.name);
                report.failed += 1;
            }
            TestResult::Skipped => {
                crate::kwarn!(test.name);
                report.skipped += 1;
            }
        }
    }

    crate::kinfo!("Resultados: passed=", report.passed);
    if report.failed != 0 {
        crate::kerror!("Resultados: failed=", report.failed);
    }
    report
}
