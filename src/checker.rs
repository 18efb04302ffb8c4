//! Runs generated cases against the operator and the reference.
//!
//! Each case goes through generate, invoke, reference, compare before the
//! next one starts. No outcome stops the run.
use crate::cases::{Case, CaseGenerator};
use crate::compare::{compare, compare_exact, Tolerance, Verdict};
use crate::config::CheckConfig;
use crate::errors::CheckError;
use crate::ndarray_ext::NdArray;
use crate::op::{run_op, Op};
use crate::ops::create_operator;
use crate::oracle::{reference_flip, reference_flip_last};
use log::{debug, info, warn};
use std::fmt;

/// Result of checking one case.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// Output matched the reference.
    Pass(Verdict),
    /// Output deviated from the reference beyond tolerance.
    Mismatch(Verdict),
    /// Output and reference shapes differ.
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    /// Flipping the output again did not restore the input.
    NotInvolutive(Verdict),
    /// The operator could not be created or failed to compute.
    OpFailed(String),
    /// The requested engine is not available in this build.
    Skipped(String),
}

impl Outcome {
    #[inline]
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass(_))
    }

    #[inline]
    pub fn is_skip(&self) -> bool {
        matches!(self, Outcome::Skipped(_))
    }

    #[inline]
    pub fn is_failure(&self) -> bool {
        !self.is_pass() && !self.is_skip()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Pass(v) => write!(f, "{}", v),
            Outcome::Mismatch(v) => write!(f, "mismatch: {}", v),
            Outcome::ShapeMismatch { expected, actual } => write!(
                f,
                "shape mismatch: expected {:?}, got {:?}",
                expected, actual
            ),
            Outcome::NotInvolutive(v) => write!(f, "flipping twice changed the input: {}", v),
            Outcome::OpFailed(s) => write!(f, "operator failed: {}", s),
            Outcome::Skipped(s) => write!(f, "skipped: {}", s),
        }
    }
}

/// A case index paired with its outcome.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseReport {
    pub index: usize,
    pub description: String,
    pub outcome: Outcome,
}

/// Outcomes of a whole run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    pub cases: Vec<CaseReport>,
}

impl Report {
    pub fn num_passed(&self) -> usize {
        self.cases.iter().filter(|c| c.outcome.is_pass()).count()
    }

    pub fn num_skipped(&self) -> usize {
        self.cases.iter().filter(|c| c.outcome.is_skip()).count()
    }

    pub fn num_failed(&self) -> usize {
        self.cases.iter().filter(|c| c.outcome.is_failure()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|c| c.outcome.is_failure())
    }

    /// True when no case failed. Skipped cases do not count as failures.
    pub fn passed(&self) -> bool {
        self.num_failed() == 0
    }

    /// Process exit status for this report: 0 on success, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            1
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} cases: {} passed, {} failed, {} skipped",
            self.cases.len(),
            self.num_passed(),
            self.num_failed(),
            self.num_skipped()
        )
    }
}

/// Conformance checker for the `Flip` operator.
pub struct Checker {
    generator: CaseGenerator,
    tolerance: Tolerance,
    check_involution: bool,
}

impl Checker {
    /// Validates `config` and prepares its cases.
    pub fn new(config: CheckConfig) -> Result<Self, CheckError> {
        let generator = CaseGenerator::from_config(&config)?;
        Ok(Checker {
            generator,
            tolerance: config.tolerance,
            check_involution: config.check_involution,
        })
    }

    #[inline]
    pub fn generator(&self) -> &CaseGenerator {
        &self.generator
    }

    /// Checks every case and collects the outcomes.
    pub fn run(&self) -> Report {
        info!("checking {} flip cases", self.generator.len());
        let mut report = Report::default();
        for case in self.generator.iter() {
            let outcome = self.check_case(&case);
            if outcome.is_pass() {
                debug!("{}: {}", case, outcome);
            } else {
                warn!("{}: {}", case, outcome);
            }
            report.cases.push(CaseReport {
                index: case.index,
                description: case.to_string(),
                outcome,
            });
        }
        info!("{}", report);
        report
    }

    /// Checks a single case.
    pub fn check_case(&self, case: &Case) -> Outcome {
        let op = match create_operator::<f32>(&case.operator_def()) {
            Ok(op) => op,
            Err(e) if e.is_unavailable() => return Outcome::Skipped(e.to_string()),
            Err(e) => return Outcome::OpFailed(e.to_string()),
        };
        self.check_case_with(case, op.as_ref())
    }

    /// Checks a single case against an already constructed operator.
    pub fn check_case_with(&self, case: &Case, op: &dyn Op<f32>) -> Outcome {
        let actual = match run_flip(op, &case.input) {
            Ok(y) => y,
            Err(e) => return Outcome::OpFailed(e),
        };
        let expected = match case.axis_arg {
            Some(_) => reference_flip(&case.input.view(), &case.axes),
            None => reference_flip_last(&case.input.view()),
        };

        let verdict = match compare(&actual.view(), &expected.view(), &self.tolerance) {
            Ok(v) => v,
            Err(CheckError::ShapeMismatch { expected, actual }) => {
                return Outcome::ShapeMismatch { expected, actual }
            }
            Err(e) => return Outcome::OpFailed(e.to_string()),
        };
        if !verdict.passed {
            return Outcome::Mismatch(verdict);
        }

        if self.check_involution {
            let restored = match run_flip(op, &actual) {
                Ok(y) => y,
                Err(e) => return Outcome::OpFailed(e),
            };
            match compare_exact(&restored.view(), &case.input.view()) {
                Ok(v) if v.passed => {}
                Ok(v) => return Outcome::NotInvolutive(v),
                Err(CheckError::ShapeMismatch { expected, actual }) => {
                    return Outcome::ShapeMismatch { expected, actual }
                }
                Err(e) => return Outcome::OpFailed(e.to_string()),
            }
        }

        Outcome::Pass(verdict)
    }
}

fn run_flip(op: &dyn Op<f32>, x: &NdArray<f32>) -> Result<NdArray<f32>, String> {
    let mut ys = run_op(op, &[x.view()]).map_err(|e| e.to_string())?;
    Ok(ys.remove(0))
}
