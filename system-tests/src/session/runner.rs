// system-tests/src/session/runner.rs
// ============================================================================
// Module: Ordered Suite Runner
// Description: Explicit case descriptors executed in a total order.
// Purpose: Run dependent cases serially and isolate their failures.
// Dependencies: serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! Cases are declared as an explicit list of [`OrderedCase`] descriptors.
//! [`SuiteRunner::new`] validates the list and fixes the execution order once;
//! [`SuiteRunner::run`] executes every case against a shared context.
//! Invariants:
//! - Pinned numbers and names are unique; names are non-blank.
//! - Pinned cases run in ascending number, unpinned cases afterwards in
//!   declaration order.
//! - Every case is attempted exactly once; a failure or panic is recorded and
//!   the next case still runs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::info;
use tracing::warn;

use crate::check::CaseFailure;
use crate::check::CaseResult;

// ============================================================================
// SECTION: Case Descriptors
// ============================================================================

/// Body of a case: reads and mutates the shared context.
pub type CaseFn<C> = fn(&mut C) -> CaseResult;

/// Position of a case in the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseOrder {
    /// Runs at this position relative to other pinned cases.
    Pinned(u32),
    /// Runs after every pinned case, in declaration order.
    Unpinned,
}

impl CaseOrder {
    /// Sort key placing pinned cases first.
    const fn sort_key(self) -> (u8, u32) {
        match self {
            Self::Pinned(order) => (0, order),
            Self::Unpinned => (1, 0),
        }
    }

    /// Returns the pinned number, if any.
    #[must_use]
    pub const fn pinned(self) -> Option<u32> {
        match self {
            Self::Pinned(order) => Some(order),
            Self::Unpinned => None,
        }
    }
}

/// A named case with an explicit order.
pub struct OrderedCase<C> {
    /// Case name used in logs and reports.
    name: &'static str,
    /// Case position.
    order: CaseOrder,
    /// Case body.
    run: CaseFn<C>,
}

impl<C> OrderedCase<C> {
    /// Declares a case pinned to `order`.
    #[must_use]
    pub const fn pinned(order: u32, name: &'static str, run: CaseFn<C>) -> Self {
        Self {
            name,
            order: CaseOrder::Pinned(order),
            run,
        }
    }

    /// Declares a case that runs after all pinned cases.
    #[must_use]
    pub const fn unpinned(name: &'static str, run: CaseFn<C>) -> Self {
        Self {
            name,
            order: CaseOrder::Unpinned,
            run,
        }
    }

    /// Returns the case name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the case order.
    #[must_use]
    pub const fn order(&self) -> CaseOrder {
        self.order
    }
}

impl<C> Clone for OrderedCase<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for OrderedCase<C> {}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Outcome of an executed case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// Every assertion held.
    Pass,
    /// An assertion failed, a request failed, or the case panicked.
    Fail,
}

/// Report entry for one executed case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseRecord {
    /// One-based execution position.
    pub position: usize,
    /// Pinned number, absent for unpinned cases.
    pub order: Option<u32>,
    /// Case name.
    pub name: String,
    /// Case outcome.
    pub status: CaseStatus,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
    /// Failure description for failed cases.
    pub detail: Option<String>,
}

impl CaseRecord {
    /// Returns true when the case passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == CaseStatus::Pass
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Invalid case lists.
///
/// # Invariants
/// - Raised before any case runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunnerError {
    /// A case name is empty or whitespace.
    #[error("case names must not be blank")]
    BlankName,
    /// Two cases share a name.
    #[error("duplicate case name: {0}")]
    DuplicateName(String),
    /// Two cases are pinned to the same number.
    #[error("cases `{first}` and `{second}` are both pinned to {order}")]
    DuplicateOrder {
        /// Shared pinned number.
        order: u32,
        /// Case declared first.
        first: String,
        /// Case declared second.
        second: String,
    },
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Validated cases in execution order.
pub struct SuiteRunner<C> {
    /// Cases sorted into execution order.
    cases: Vec<OrderedCase<C>>,
}

impl<C> SuiteRunner<C> {
    /// Validates `cases` and fixes their execution order.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] for blank names, duplicate names, or duplicate
    /// pinned numbers.
    pub fn new(mut cases: Vec<OrderedCase<C>>) -> Result<Self, RunnerError> {
        let mut names = BTreeSet::new();
        let mut pinned: BTreeMap<u32, &'static str> = BTreeMap::new();
        for case in &cases {
            if case.name.trim().is_empty() {
                return Err(RunnerError::BlankName);
            }
            if !names.insert(case.name) {
                return Err(RunnerError::DuplicateName(case.name.to_string()));
            }
            if let CaseOrder::Pinned(order) = case.order {
                if let Some(first) = pinned.insert(order, case.name) {
                    return Err(RunnerError::DuplicateOrder {
                        order,
                        first: first.to_string(),
                        second: case.name.to_string(),
                    });
                }
            }
        }
        cases.sort_by_key(|case| case.order.sort_key());
        Ok(Self {
            cases,
        })
    }

    /// Returns the cases in execution order.
    #[must_use]
    pub fn cases(&self) -> &[OrderedCase<C>] {
        &self.cases
    }

    /// Runs every case once, serially, against `context`.
    pub fn run(&self, context: &mut C) -> Vec<CaseRecord> {
        let mut records = Vec::with_capacity(self.cases.len());
        for (index, case) in self.cases.iter().enumerate() {
            info!(case = case.name, "case started");
            let started = Instant::now();
            let outcome = catch_unwind(AssertUnwindSafe(|| (case.run)(context)))
                .unwrap_or_else(|payload| Err(CaseFailure::Panicked(panic_message(&*payload))));
            let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            let (status, detail) = match outcome {
                Ok(()) => {
                    info!(case = case.name, duration_ms, "case passed");
                    (CaseStatus::Pass, None)
                }
                Err(failure) => {
                    warn!(case = case.name, duration_ms, error = %failure, "case failed");
                    (CaseStatus::Fail, Some(failure.to_string()))
                }
            };
            records.push(CaseRecord {
                position: index + 1,
                order: case.order.pinned(),
                name: case.name.to_string(),
                status,
                duration_ms,
                detail,
            });
        }
        records
    }
}

/// Extracts a readable message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}
