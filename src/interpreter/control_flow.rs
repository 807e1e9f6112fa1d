use crate::diagnostic::Span;
use crate::value::Value;

/// Outcome of executing a single statement.
///
/// `Return` unwinds through enclosing blocks and loops (each still
/// restoring its scope) until the nearest call frame catches it. The span
/// is the `return` keyword, kept so a top-level `return` can be reported
/// at its source position.
pub enum ControlFlow {
    Next,
    Return(Value, Span),
}
