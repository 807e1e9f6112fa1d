pub mod ast;
pub mod diagnostic;
pub mod interpreter;
pub mod lexer;
pub mod value;

pub use ast::{Expr, ExprKind, Stmt};
pub use lexer::Token;
pub use value::Value;
