//! Chat provider backends.

pub mod openai;
