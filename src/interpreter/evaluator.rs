use crate::ast::{BinaryOp, Expr, ExprKind, LogicalOp, Stmt, UnaryOp};
use crate::diagnostic::Diagnostic;
use crate::interpreter::control_flow::ControlFlow;
use crate::interpreter::environment::Environment;
use crate::interpreter::error::RuntimeError;
use crate::interpreter::parser::TokenParser;
use crate::value::{Function, Value};
use chumsky::Parser as _;
use std::cell::RefCell;
use std::rc::Rc;

/// Destination for `print` output. Scripts write here instead of straight
/// to stdout so tests and the REPL can capture lines.
pub trait OutputSink {
    fn write_line(&mut self, line: &str);
}

pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_line(&mut self, line: &str) {
        println!("{}", line);
    }
}

impl OutputSink for Vec<String> {
    fn write_line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

impl OutputSink for Rc<RefCell<Vec<String>>> {
    fn write_line(&mut self, line: &str) {
        self.borrow_mut().push(line.to_string());
    }
}

pub struct Interpreter<S: OutputSink> {
    globals: Environment,
    env: Environment,
    out: S,
}

impl Default for Interpreter<StdoutSink> {
    fn default() -> Self {
        Self::new(StdoutSink)
    }
}

impl<S: OutputSink> Interpreter<S> {
    pub fn new(out: S) -> Self {
        let globals = Environment::new();
        let env = globals.clone();
        Self { globals, env, out }
    }

    pub fn output(&self) -> &S {
        &self.out
    }

    pub fn into_output(self) -> S {
        self.out
    }

    /// Run a program. A `return` that unwinds all the way out of the
    /// statement list is a fault, not a silent exit.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in statements {
            match self.execute_statement(stmt)? {
                ControlFlow::Next => {}
                ControlFlow::Return(_, span) => {
                    return Err(RuntimeError::TopLevelReturn { span });
                }
            }
        }
        Ok(())
    }

    /// Swap the current scope for `env`, run `f`, and restore the caller's
    /// scope whether `f` succeeded, faulted, or returned early.
    fn with_env<T>(&mut self, env: Environment, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.env, env);
        let result = f(self);
        self.env = saved;
        result
    }

    fn execute_block(&mut self, statements: &[Stmt]) -> Result<ControlFlow, RuntimeError> {
        let scope = Environment::with_parent(Rc::new(self.env.clone()));
        self.with_env(scope, |interp| {
            for stmt in statements {
                match interp.execute_statement(stmt)? {
                    ControlFlow::Next => {}
                    flow => return Ok(flow),
                }
            }
            Ok(ControlFlow::Next)
        })
    }

    fn execute_statement(&mut self, stmt: &Stmt) -> Result<ControlFlow, RuntimeError> {
        match stmt {
            Stmt::Expr(expr) => {
                self.evaluate(expr)?;
                Ok(ControlFlow::Next)
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                self.out.write_line(&value.to_string());
                Ok(ControlFlow::Next)
            }
            Stmt::VarDecl {
                name,
                name_span,
                initializer,
            } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                if !self.env.define(name, value) {
                    return Err(RuntimeError::AlreadyDefined {
                        name: name.to_string(),
                        span: *name_span,
                    });
                }
                Ok(ControlFlow::Next)
            }
            Stmt::Reassign {
                name,
                name_span,
                value,
            } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                if !self.env.assign(name, value) {
                    return Err(RuntimeError::UndefinedVariable {
                        name: name.to_string(),
                        span: *name_span,
                    });
                }
                Ok(ControlFlow::Next)
            }
            Stmt::Block(statements) => self.execute_block(statements),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute_block(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute_block(else_branch)
                } else {
                    Ok(ControlFlow::Next)
                }
            }
            Stmt::While {
                initializer,
                condition,
                body,
            } => {
                // One scope for the whole loop: the initializer's binding
                // and any mutations in the body persist across iterations.
                let scope = Environment::with_parent(Rc::new(self.env.clone()));
                self.with_env(scope, |interp| {
                    if let Some(initializer) = initializer {
                        match interp.execute_statement(initializer)? {
                            ControlFlow::Next => {}
                            flow => return Ok(flow),
                        }
                    }
                    while interp.evaluate(condition)?.is_truthy() {
                        for stmt in body {
                            match interp.execute_statement(stmt)? {
                                ControlFlow::Next => {}
                                flow => return Ok(flow),
                            }
                        }
                    }
                    Ok(ControlFlow::Next)
                })
            }
            Stmt::Function {
                name,
                name_span,
                params,
                body,
            } => {
                let function = Value::Function(Rc::new(Function {
                    name: name.clone(),
                    params: params.clone(),
                    body: body.clone(),
                }));
                if !self.env.define(name, function) {
                    return Err(RuntimeError::AlreadyDefined {
                        name: name.to_string(),
                        span: *name_span,
                    });
                }
                Ok(ControlFlow::Next)
            }
            Stmt::Return { value, span } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                Ok(ControlFlow::Return(value, *span))
            }
        }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match &expr.kind {
            ExprKind::Literal(value) => Ok(value.clone()),
            ExprKind::Grouping(inner) => self.evaluate(inner),
            ExprKind::Unary {
                op,
                op_span,
                operand,
            } => {
                let value = self.evaluate(operand)?;
                match op {
                    UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
                    UnaryOp::Neg => match value.as_number() {
                        Some(n) => Ok(Value::Number(-n)),
                        None => Err(RuntimeError::type_error(
                            "Operand must be a number.",
                            *op_span,
                        )),
                    },
                }
            }
            ExprKind::Binary {
                left,
                op,
                op_span,
                right,
            } => {
                // Both operands evaluate, left first, before any type check.
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                self.binary_op(left, *op, *op_span, right)
            }
            ExprKind::Logical { left, op, right } => {
                let left = self.evaluate(left)?;
                match op {
                    LogicalOp::Or if left.is_truthy() => Ok(left),
                    LogicalOp::And if !left.is_truthy() => Ok(left),
                    _ => self.evaluate(right),
                }
            }
            ExprKind::Variable(name) => match self.env.get(name) {
                Some(value) => Ok(value),
                None => Err(RuntimeError::UndefinedVariable {
                    name: name.to_string(),
                    span: expr.span,
                }),
            },
            ExprKind::Assign {
                name,
                name_span,
                value,
            } => {
                let value = self.evaluate(value)?;
                if !self.env.assign(name, value.clone()) {
                    return Err(RuntimeError::UndefinedVariable {
                        name: name.to_string(),
                        span: *name_span,
                    });
                }
                Ok(value)
            }
            ExprKind::Call { callee, args } => {
                let callee_span = callee.span;
                let callee = self.evaluate(callee)?;
                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(self.evaluate(arg)?);
                }
                let function = match callee {
                    Value::Function(function) => function,
                    _ => return Err(RuntimeError::NotCallable { span: callee_span }),
                };
                if arg_values.len() != function.params.len() {
                    return Err(RuntimeError::Arity {
                        expected: function.params.len(),
                        got: arg_values.len(),
                        span: expr.span,
                    });
                }
                self.call_function(&function, arg_values)
            }
        }
    }

    /// Call frames hang off the globals, not the caller's scope: a function
    /// body sees its parameters and global bindings only.
    fn call_function(
        &mut self,
        function: &Function,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let frame = Environment::with_parent(Rc::new(self.globals.clone()));
        for (param, arg) in function.params.iter().zip(args) {
            frame.define(param, arg);
        }
        self.with_env(frame, |interp| {
            for stmt in &function.body {
                match interp.execute_statement(stmt)? {
                    ControlFlow::Next => {}
                    ControlFlow::Return(value, _) => return Ok(value),
                }
            }
            Ok(Value::Nil)
        })
    }

    fn binary_op(
        &self,
        left: Value,
        op: BinaryOp,
        op_span: crate::diagnostic::Span,
        right: Value,
    ) -> Result<Value, RuntimeError> {
        match op {
            BinaryOp::Add => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => {
                    Ok(Value::String(Rc::from(format!("{}{}", a, b))))
                }
                (Value::String(a), Value::Number(b)) => {
                    Ok(Value::String(Rc::from(format!("{}{}", a, b))))
                }
                (Value::Number(a), Value::String(b)) => {
                    Ok(Value::String(Rc::from(format!("{}{}", a, b))))
                }
                _ => Err(RuntimeError::type_error(
                    "Operands must be two numbers or two strings.",
                    op_span,
                )),
            },
            BinaryOp::Sub => {
                let (a, b) = Self::number_operands(&left, &right, op_span)?;
                Ok(Value::Number(a - b))
            }
            BinaryOp::Mul => {
                let (a, b) = Self::number_operands(&left, &right, op_span)?;
                Ok(Value::Number(a * b))
            }
            BinaryOp::Div => {
                let (a, b) = Self::number_operands(&left, &right, op_span)?;
                if b == 0.0 {
                    return Err(RuntimeError::DivisionByZero { span: op_span });
                }
                Ok(Value::Number(a / b))
            }
            BinaryOp::Eq => Ok(Value::Bool(left == right)),
            BinaryOp::NotEq => Ok(Value::Bool(left != right)),
            BinaryOp::Greater => {
                let (a, b) = Self::number_operands(&left, &right, op_span)?;
                Ok(Value::Bool(a > b))
            }
            BinaryOp::GreaterEq => {
                let (a, b) = Self::number_operands(&left, &right, op_span)?;
                Ok(Value::Bool(a >= b))
            }
            BinaryOp::Less => {
                let (a, b) = Self::number_operands(&left, &right, op_span)?;
                Ok(Value::Bool(a < b))
            }
            BinaryOp::LessEq => {
                let (a, b) = Self::number_operands(&left, &right, op_span)?;
                Ok(Value::Bool(a <= b))
            }
        }
    }

    fn number_operands(
        left: &Value,
        right: &Value,
        op_span: crate::diagnostic::Span,
    ) -> Result<(f64, f64), RuntimeError> {
        match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(RuntimeError::type_error(
                "Operands must be numbers.",
                op_span,
            )),
        }
    }
}

/// Lex and parse a source string, collecting every diagnostic instead of
/// stopping at the first.
pub fn parse(source: &str) -> Result<Vec<Stmt>, Vec<Diagnostic>> {
    let tokens = match crate::lexer::lexer().parse(source).into_output() {
        Some(tokens) => tokens,
        None => {
            return Err(vec![Diagnostic::error("Lexer failed to tokenize input")
                .with_code("E0001")]);
        }
    };

    let mut parser = TokenParser::from_lexer_output(tokens, source.len());
    let result = parser.parse_with_errors();
    if result.errors.is_empty() {
        Ok(result.statements)
    } else {
        Err(result.errors.iter().map(|e| e.to_diagnostic()).collect())
    }
}

/// One-shot convenience: run a source string and collect printed lines.
/// Errors come back as plain strings; callers that want spans use
/// `parse_and_run_with_diagnostics`.
pub fn parse_and_run(source: &str) -> Result<Vec<String>, String> {
    let tokens = match crate::lexer::lexer().parse(source).into_output() {
        Some(tokens) => tokens,
        None => return Err("Lexer failed".to_string()),
    };

    let mut parser = TokenParser::from_lexer_output(tokens, source.len());
    let statements = parser.parse()?;

    let mut interpreter = Interpreter::new(Vec::new());
    interpreter
        .interpret(&statements)
        .map_err(|e| format!("Runtime error: {}", e))?;
    Ok(interpreter.into_output())
}

pub fn parse_and_run_with_diagnostics(source: &str) -> Result<Vec<String>, Vec<Diagnostic>> {
    let statements = parse(source)?;
    let mut interpreter = Interpreter::new(Vec::new());
    interpreter
        .interpret(&statements)
        .map_err(|e| vec![e.to_diagnostic()])?;
    Ok(interpreter.into_output())
}
