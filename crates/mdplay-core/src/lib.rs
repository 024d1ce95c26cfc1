//! mdplay Core
//!
//! This crate provides core types, text coordinates, and error definitions
//! shared by the mdplay tokenizer and code runner.
//!
//! # Overview
//!
//! The core crate contains:
//! - [`ElementKind`] - The closed set of markdown constructs the tokenizer detects
//! - [`PlaygroundError`] - Error types
//! - [`Position`], [`TextRange`] - Source location types
//! - [`LineIndex`], [`OffsetMap`] - Conversions between lines, chars and bytes

pub mod enums;
pub mod error;
pub mod index;
pub mod types;

pub use enums::ElementKind;
pub use error::{PlaygroundError, Result};
pub use index::{LineIndex, OffsetMap};
pub use types::{Position, TextRange};
