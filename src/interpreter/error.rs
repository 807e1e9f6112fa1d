use crate::diagnostic::{Diagnostic, Label, Span};

#[derive(Debug, Clone)]
pub enum RuntimeError {
    UndefinedVariable { name: String, span: Span },
    AlreadyDefined { name: String, span: Span },
    TypeError { message: String, span: Span },
    DivisionByZero { span: Span },
    NotCallable { span: Span },
    Arity { expected: usize, got: usize, span: Span },
    TopLevelReturn { span: Span },
}

impl RuntimeError {
    pub fn type_error(message: impl Into<String>, span: Span) -> Self {
        Self::TypeError {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UndefinedVariable { span, .. } => *span,
            Self::AlreadyDefined { span, .. } => *span,
            Self::TypeError { span, .. } => *span,
            Self::DivisionByZero { span } => *span,
            Self::NotCallable { span } => *span,
            Self::Arity { span, .. } => *span,
            Self::TopLevelReturn { span } => *span,
        }
    }

    /// Convert to a diagnostic for pretty printing
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::UndefinedVariable { name, span } => {
                Diagnostic::error(format!("Undefined variable '{}'.", name))
                    .with_code("E0201")
                    .with_label(Label::new(*span, "not found in any enclosing scope"))
            }
            Self::AlreadyDefined { name, span } => {
                Diagnostic::error(format!("Variable '{}' already defined.", name))
                    .with_code("E0202")
                    .with_label(Label::new(*span, "redeclared in the same scope"))
                    .with_help("assign to the existing variable or pick another name")
            }
            Self::TypeError { message, span } => Diagnostic::error(message.clone())
                .with_code("E0203")
                .with_label(Label::new(*span, "")),
            Self::DivisionByZero { span } => Diagnostic::error("Cannot divide by zero.")
                .with_code("E0204")
                .with_label(Label::new(*span, "division by zero here")),
            Self::NotCallable { span } => Diagnostic::error("Can only call functions.")
                .with_code("E0205")
                .with_label(Label::new(*span, "this value is not callable")),
            Self::Arity {
                expected,
                got,
                span,
            } => Diagnostic::error(format!("Expected {} arguments but got {}.", expected, got))
                .with_code("E0206")
                .with_label(Label::new(*span, "in this call")),
            Self::TopLevelReturn { span } => {
                Diagnostic::error("Can't return from top-level code.")
                    .with_code("E0207")
                    .with_label(Label::new(*span, "no enclosing function"))
            }
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::UndefinedVariable { name, .. } => {
                write!(f, "Undefined variable '{}'.", name)
            }
            RuntimeError::AlreadyDefined { name, .. } => {
                write!(f, "Variable '{}' already defined.", name)
            }
            RuntimeError::TypeError { message, .. } => write!(f, "{}", message),
            RuntimeError::DivisionByZero { .. } => write!(f, "Cannot divide by zero."),
            RuntimeError::NotCallable { .. } => write!(f, "Can only call functions."),
            RuntimeError::Arity { expected, got, .. } => {
                write!(f, "Expected {} arguments but got {}.", expected, got)
            }
            RuntimeError::TopLevelReturn { .. } => write!(f, "Can't return from top-level code."),
        }
    }
}

impl std::error::Error for RuntimeError {}
