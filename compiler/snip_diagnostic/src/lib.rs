//! Diagnostic system for script build errors.
//!
//! Every diagnostic carries:
//! - an error code for searchability (`E0xxx` lexer, `E1xxx` parser)
//! - a message saying what went wrong
//! - labeled spans saying where
//! - optional notes and suggestions saying why and how to fix it
//!
//! [`emitter::render_report`] turns a batch of diagnostics into the plain-text
//! report that ends up in an execution's failure message.

mod diagnostic;
pub mod emitter;
mod error_code;

pub use diagnostic::{
    await_outside_async, expected_expression, invalid_assignment_target, invalid_binding_name,
    unclosed_delimiter, unexpected_token, Diagnostic, Label,
};
pub use error_code::ErrorCode;
