use std::rc::Rc;

use crate::diagnostic::Span;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Greater,
    GreaterEq,
    Less,
    LessEq,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Value),
    Grouping(Box<Expr>),
    Unary {
        op: UnaryOp,
        /// Span of the operator token, used for operand type faults
        op_span: Span,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        op_span: Span,
        right: Box<Expr>,
    },
    /// Short-circuiting `and`/`or`
    Logical {
        left: Box<Expr>,
        op: LogicalOp,
        right: Box<Expr>,
    },
    Variable(Rc<str>),
    Assign {
        name: Rc<str>,
        name_span: Span,
        value: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Print(Expr),
    VarDecl {
        name: Rc<str>,
        name_span: Span,
        initializer: Option<Expr>,
    },
    /// Top-level `name = expr;` statement, distinct from assignment
    /// expressions: it needs no `var` and no enclosing expression context.
    Reassign {
        name: Rc<str>,
        name_span: Span,
        value: Option<Expr>,
    },
    Block(Vec<Stmt>),
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
    },
    /// `for` loops desugar into this at parse time: the initializer runs
    /// once inside the loop scope, and the increment is appended to the body.
    While {
        initializer: Option<Box<Stmt>>,
        condition: Expr,
        body: Vec<Stmt>,
    },
    Function {
        name: Rc<str>,
        name_span: Span,
        params: Vec<Rc<str>>,
        body: Vec<Stmt>,
    },
    Return {
        value: Option<Expr>,
        span: Span,
    },
}
