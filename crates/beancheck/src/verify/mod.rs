//! Contract verifiers

mod bean;
mod exception;
mod report;

pub use bean::BeanContractVerifier;
pub use exception::{ExceptionContractVerifier, CAUSE_MESSAGE, EXCEPTION_MESSAGE};
pub use report::{
    BatchEntry, BatchOutcome, BatchReport, BeanReport, ExceptionReport, PropertyResult,
    PropertyVerdict, ShapeResult, ShapeVerdict, Verdict, VerificationFailure,
};
