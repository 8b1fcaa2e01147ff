//! Reporting collaborator for non-fatal scan problems.
//!
//! Per-file and per-manifest failures never abort the run; they go through
//! an injected `Reporter` so the extraction core stays side-effect-free and
//! tests can capture what was reported.

/// Sink for warnings and errors raised while scanning a project.
pub trait Reporter {
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

/// Default reporter: prints to stderr.
pub struct StderrReporter;

impl Reporter for StderrReporter {
    fn warn(&self, msg: &str) {
        eprintln!("warning: {}", msg);
    }

    fn error(&self, msg: &str) {
        eprintln!("error: {}", msg);
    }
}

/// Reporter that records messages for inspection in tests.
#[cfg(test)]
pub mod test_support {
    use super::Reporter;
    use std::cell::RefCell;

    #[derive(Default)]
    pub struct RecordingReporter {
        pub warnings: RefCell<Vec<String>>,
        pub errors: RefCell<Vec<String>>,
    }

    impl Reporter for RecordingReporter {
        fn warn(&self, msg: &str) {
            self.warnings.borrow_mut().push(msg.to_string());
        }

        fn error(&self, msg: &str) {
            self.errors.borrow_mut().push(msg.to_string());
        }
    }
}
