//! Thrown values and constructors for the runtime's own errors.
//!
//! Runtime faults raised by the evaluator are ordinary script `Error`
//! values, so `try`/`catch` handles them the same way as user throws.

use std::sync::Arc;

use crate::value::ErrorValue;
use crate::{Interpreter, Value};

/// Builtin error constructor names.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Error,
    TypeError,
    RangeError,
    ReferenceError,
    SyntaxError,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 5] = [
        ErrorKind::Error,
        ErrorKind::TypeError,
        ErrorKind::RangeError,
        ErrorKind::ReferenceError,
        ErrorKind::SyntaxError,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Error => "Error",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::SyntaxError => "SyntaxError",
        }
    }
}

/// A value in flight from `throw` (or a runtime fault) to a `catch`.
#[derive(Clone, Debug)]
pub struct Thrown {
    pub value: Value,
    /// Stack at the throw site. For `Error` values this is the stack
    /// captured when the error was constructed.
    pub stack: Arc<str>,
}

impl Thrown {
    pub fn new(value: Value, interp: &Interpreter) -> Self {
        let stack = match &value {
            Value::Error(error) => Arc::clone(&error.stack),
            other => {
                let trace = interp.stack_trace();
                let header = format!("Uncaught {}", other.inspect());
                Arc::from(join_header(&header, &trace))
            }
        };
        Thrown { value, stack }
    }

    /// One-line rendering: `Error: boom`, or `Uncaught "text"` for
    /// non-error values.
    pub fn message(&self) -> String {
        match &self.value {
            Value::Error(error) => error.to_string(),
            other => format!("Uncaught {}", other.inspect()),
        }
    }
}

/// Construct an `Error` value whose stack is the interpreter's current one.
pub fn make_error(interp: &Interpreter, name: &str, message: &str) -> Value {
    let error = ErrorValue {
        name: Arc::from(name),
        message: Arc::from(message),
        stack: Arc::from(""),
    };
    let header = error.to_string();
    let stack = Arc::from(join_header(&header, &interp.stack_trace()));
    Value::Error(Arc::new(ErrorValue { stack, ..error }))
}

fn join_header(header: &str, trace: &str) -> String {
    if trace.is_empty() {
        header.to_string()
    } else {
        format!("{header}\n{trace}")
    }
}

fn throw(interp: &Interpreter, kind: ErrorKind, message: impl AsRef<str>) -> Thrown {
    let value = make_error(interp, kind.name(), message.as_ref());
    Thrown::new(value, interp)
}

pub fn type_error(interp: &Interpreter, message: impl AsRef<str>) -> Thrown {
    throw(interp, ErrorKind::TypeError, message)
}

pub fn reference_error(interp: &Interpreter, message: impl AsRef<str>) -> Thrown {
    throw(interp, ErrorKind::ReferenceError, message)
}

pub fn range_error(interp: &Interpreter, message: impl AsRef<str>) -> Thrown {
    throw(interp, ErrorKind::RangeError, message)
}

pub fn syntax_error(interp: &Interpreter, message: impl AsRef<str>) -> Thrown {
    throw(interp, ErrorKind::SyntaxError, message)
}

// Common messages

pub fn not_defined(interp: &Interpreter, name: &str) -> Thrown {
    reference_error(interp, format!("{name} is not defined"))
}

pub fn not_a_function(interp: &Interpreter, what: &str) -> Thrown {
    type_error(interp, format!("{what} is not a function"))
}

pub fn const_assignment(interp: &Interpreter) -> Thrown {
    type_error(interp, "Assignment to constant variable.")
}

pub fn read_of_nullish(interp: &Interpreter, target: &Value, key: &str) -> Thrown {
    type_error(
        interp,
        format!("Cannot read properties of {} (reading '{key}')", target.to_display()),
    )
}

pub fn write_to_nullish(interp: &Interpreter, target: &Value, key: &str) -> Thrown {
    type_error(
        interp,
        format!("Cannot set properties of {} (setting '{key}')", target.to_display()),
    )
}

pub fn call_depth_exceeded(interp: &Interpreter) -> Thrown {
    range_error(interp, "Maximum call stack size exceeded")
}
