//! CV reading agent toolkit.
//!
//! The crate wires four stages together:
//!
//! - [`tools`]: a `pdf_reader_tool` that extracts text from PDF files through a
//!   fallback chain of [`loader`] backends;
//! - [`agent`]: an agent carrying that tool, hosted on an agent platform or
//!   run in-process over an OpenAI chat model;
//! - [`runner`]: a batch runner that asks every query of a CSV table with the
//!   CV attached and records the answers (see [`dataset`]);
//! - [`evaluator`]: an LLM judge scoring each answer against its reference.
//!
//! [`pipeline::run_pipeline`] runs them end to end.

pub mod agent;
pub mod backends;
pub mod chat;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluator;
pub mod loader;
pub mod pipeline;
pub mod runner;
pub mod tools;

#[cfg(test)]
mod test_support;

pub use agent::{Agent, AgentSpec, Attachment};
pub use error::CvError;
