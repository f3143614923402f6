//! Shared pieces of the multi-step flows (new sale, transport board)

pub mod usecase_metadata;
pub mod usecase_result;

pub use usecase_metadata::UseCaseMetadata;
pub use usecase_result::{UseCaseError, UseCaseResult};
