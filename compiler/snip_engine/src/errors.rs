//! Engine-level faults and the script errors raised by the API surface.

use snip_eval::{type_error, Interpreter, Thrown};

use crate::execution::ExecutionStatus;
use crate::id::ExecutionId;

/// The engine or a caller drove an execution out of order.
///
/// Distinct from build and run faults, which are about the user's code.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContractViolation {
    #[error("run report of execution {report} delivered to execution {record}")]
    ForeignReport {
        record: ExecutionId,
        report: ExecutionId,
    },
    #[error("execution {id} cannot {action} while {status}")]
    InvalidState {
        id: ExecutionId,
        action: &'static str,
        status: ExecutionStatus,
    },
}

pub(crate) fn unknown_message_type(interp: &Interpreter, name: &str) -> Thrown {
    type_error(
        interp,
        format!("Unknown message type \"{name}\", expected \"info\", \"warning\" or \"error\""),
    )
}

pub(crate) fn not_a_render_function(interp: &Interpreter) -> Thrown {
    type_error(interp, "reactive() expects a render function")
}
