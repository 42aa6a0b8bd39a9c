//! Types shared by every Plume crate.

pub mod span;

pub use span::{LineIndex, Span};
