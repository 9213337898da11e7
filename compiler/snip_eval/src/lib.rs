//! Async evaluator for Snip scripts.
//!
//! [`CompiledFunction`] is the entry point: compile a source text as the
//! body of an `async` function with named parameters, then
//! [`invoke`](CompiledFunction::invoke) it with argument values. Evaluation
//! futures are `Send + 'static`, so invocations may run concurrently on a
//! multi-threaded runtime.
//!
//! Host code exposes functionality to scripts through [`Value::native`],
//! [`Value::native_async`] and the [`HostObject`] trait.

mod compiled;
mod environment;
mod errors;
mod host;
mod interpreter;
mod json;
mod methods;
mod native;
mod operators;
mod prelude;
mod promise;
mod script;
mod stack;
mod tasks;
mod value;

pub use compiled::{call_function, BuildFault, CompiledFunction, RunFault};
pub use environment::{AssignError, Env, Mutability};
pub use errors::{
    make_error, range_error, reference_error, syntax_error, type_error, ErrorKind, Thrown,
};
pub use host::HostObject;
pub use interpreter::{EvalOptions, Interpreter, MAX_CALL_DEPTH};
pub use json::CircularStructure;
pub use native::{arg, NativeFn, NativeFunction};
pub use operators::{evaluate_binary, evaluate_unary};
pub use promise::Promise;
pub use script::{Closure, Script};
pub use value::{number_to_string, ArrayRef, ErrorValue, ObjectRef, Properties, Value};
