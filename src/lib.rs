// Main library entry point for rmlog: removes debug prints from Go sources.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ports;

pub use application::{process_file, CleanupUsecase, FileReport, Transformation, WriteMode};
pub use domain::rules::{MatchRule, RuleSet};
pub use error::{Error, Result};
