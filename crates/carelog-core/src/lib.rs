//! # CareLog Core
//!
//! The domain layer of the CareLog backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! the health-log entities, the fixed-window rate limiter, and the rule-based
//! insight annotator.

pub mod domain;
pub mod error;
pub mod insight;
pub mod limiter;
pub mod ports;

pub use error::DomainError;
