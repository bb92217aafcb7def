//! Scope and type checking over the parsed program. Validation never
//! rewrites the tree; it either rejects the program or passes it through
//! unchanged together with any warnings it collected.

#[cfg(test)]
mod sema_tests;

use crate::ast::*;
use crate::scope::ScopeStack;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SemanticError>;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum SemanticError {
    #[error("'{0}' is not declared in this scope")]
    Undeclared(Identifier),
    #[error("'{0}' is already declared in this scope")]
    Redeclared(Identifier),
    #[error("'{0}' is not a function")]
    NotAFunction(Identifier),
    #[error("'{0}' names a function, not a variable")]
    NotAVariable(Identifier),
    #[error("operator '{op}' cannot be applied to '{left}' and '{right}'")]
    BadOperands {
        op: BinaryOp,
        left: Type,
        right: Type,
    },
    #[error("cannot assign '{found}' to '{name}' of type '{expected}'")]
    AssignmentMismatch {
        name: Identifier,
        expected: Type,
        found: Type,
    },
    #[error("condition has type '{0}', expected 'bool'")]
    ConditionNotBool(Type),
    #[error("function '{function}' returns '{expected}', found '{found}'")]
    ReturnMismatch {
        function: Identifier,
        expected: Type,
        found: Type,
    },
    #[error("function '{function}' must return a value of type '{expected}'")]
    MissingReturnValue {
        function: Identifier,
        expected: Type,
    },
}

#[derive(Debug, Eq, PartialEq)]
pub enum Warning {
    UnusedVariable(Identifier),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnusedVariable(name) => {
                write!(f, "variable '{name}' is declared but never used")
            }
        }
    }
}

/// The checked program plus everything worth telling the user about
/// that did not stop compilation.
#[derive(Debug)]
pub struct ValidatedAst {
    pub ast: Ast,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Category {
    Variable,
    Function,
}

#[derive(Debug)]
struct SymbolInfo {
    ty: Type,
    category: Category,
    is_used: bool,
}

impl SymbolInfo {
    fn variable(ty: Type) -> Self {
        Self {
            ty,
            category: Category::Variable,
            is_used: false,
        }
    }

    fn function(ty: Type) -> Self {
        Self {
            ty,
            category: Category::Function,
            is_used: true,
        }
    }
}

struct Analyzer {
    scopes: ScopeStack<SymbolInfo>,
    warnings: Vec<Warning>,
    // Name and return type of the function whose body is being checked.
    current_function: Option<(Identifier, Type)>,
}

pub fn validate(ast: Ast) -> Result<ValidatedAst> {
    let mut analyzer = Analyzer::new();
    analyzer.check_program(&ast)?;
    Ok(ValidatedAst {
        ast,
        warnings: analyzer.warnings,
    })
}

impl Analyzer {
    fn new() -> Self {
        let mut scopes = ScopeStack::new();
        // printf is the one ambient symbol every program starts with.
        let _ = scopes.declare("printf".to_owned(), SymbolInfo::function(Type::Int));
        Self {
            scopes,
            warnings: Vec::new(),
            current_function: None,
        }
    }

    fn check_program(&mut self, ast: &Ast) -> Result<()> {
        for function in &ast.functions {
            self.scopes
                .declare(
                    function.name.clone(),
                    SymbolInfo::function(function.return_type),
                )
                .map_err(SemanticError::Redeclared)?;
            self.current_function = Some((function.name.clone(), function.return_type));
            self.check_block(&function.body)?;
        }
        self.current_function = None;
        // The global scope holds only functions, so it closes silently.
        Ok(())
    }

    fn check_block(&mut self, block: &Block) -> Result<()> {
        self.scopes.push_scope();
        let checked = block
            .statements
            .iter()
            .try_for_each(|statement| self.check_statement(statement));
        self.close_scope();
        checked
    }

    /// Pops the innermost scope and reports its never-read variables.
    fn close_scope(&mut self) {
        let closed = self.scopes.pop_scope();
        let mut unused: Vec<Identifier> = closed
            .into_iter()
            .filter(|(_, info)| info.category == Category::Variable && !info.is_used)
            .map(|(name, _)| name)
            .collect();
        unused.sort_unstable();
        self.warnings
            .extend(unused.into_iter().map(Warning::UnusedVariable));
    }

    fn check_statement(&mut self, statement: &Statement) -> Result<()> {
        match statement {
            Statement::Declaration(d) => self.check_declaration(d),
            Statement::Assignment(a) => self.check_assignment(a),
            Statement::If(i) => self.check_if(i),
            Statement::For(f) => self.check_for(f),
            Statement::While(w) => {
                self.check_condition(&w.condition)?;
                self.check_block(&w.body)
            }
            Statement::DoWhile(d) => {
                // Body first: the condition may read variables the body
                // assigned, but never ones it declared.
                self.check_block(&d.body)?;
                self.check_condition(&d.condition)
            }
            Statement::Return(value) => self.check_return(value.as_ref()),
            Statement::Call(call) => self.check_call(call),
            Statement::Compound(block) => self.check_block(block),
        }
    }

    fn check_declaration(&mut self, declaration: &Declaration) -> Result<()> {
        if let Some(init) = &declaration.init {
            let found = self.check_exp(init)?;
            if found != declaration.var_type {
                return Err(SemanticError::AssignmentMismatch {
                    name: declaration.name.clone(),
                    expected: declaration.var_type,
                    found,
                });
            }
        }
        self.scopes
            .declare(
                declaration.name.clone(),
                SymbolInfo::variable(declaration.var_type),
            )
            .map_err(SemanticError::Redeclared)
    }

    fn check_assignment(&mut self, assignment: &Assignment) -> Result<()> {
        let found = self.check_exp(&assignment.value)?;
        let info = self
            .scopes
            .lookup_mut(&assignment.target)
            .ok_or_else(|| SemanticError::Undeclared(assignment.target.clone()))?;
        if info.category != Category::Variable {
            return Err(SemanticError::NotAVariable(assignment.target.clone()));
        }
        // Being the target of an assignment counts as use; write-only
        // variables are not reported.
        info.is_used = true;
        if found == info.ty {
            Ok(())
        } else {
            Err(SemanticError::AssignmentMismatch {
                name: assignment.target.clone(),
                expected: info.ty,
                found,
            })
        }
    }

    fn check_if(&mut self, if_st: &If) -> Result<()> {
        self.check_condition(&if_st.condition)?;
        self.check_block(&if_st.then)?;
        if let Some(els) = &if_st.els {
            self.check_block(els)?;
        }
        Ok(())
    }

    /// A `for` opens one scope for its header so a declared counter is
    /// visible in the condition, post step, and body.
    fn check_for(&mut self, for_st: &For) -> Result<()> {
        self.scopes.push_scope();
        let checked = self.check_for_parts(for_st);
        self.close_scope();
        checked
    }

    fn check_for_parts(&mut self, for_st: &For) -> Result<()> {
        match &for_st.init {
            Some(ForInit::Decl(d)) => self.check_declaration(d)?,
            Some(ForInit::Assign(a)) => self.check_assignment(a)?,
            None => {}
        }
        if let Some(condition) = &for_st.condition {
            self.check_condition(condition)?;
        }
        if let Some(post) = &for_st.post {
            self.check_assignment(post)?;
        }
        self.check_block(&for_st.body)
    }

    fn check_return(&mut self, value: Option<&Exp>) -> Result<()> {
        let (function, expected) = self
            .current_function
            .clone()
            .expect("return outside of a function body");
        match value {
            Some(exp) => {
                let found = self.check_exp(exp)?;
                if expected != Type::Void && found == expected {
                    Ok(())
                } else {
                    Err(SemanticError::ReturnMismatch {
                        function,
                        expected,
                        found,
                    })
                }
            }
            None if expected == Type::Void => Ok(()),
            None => Err(SemanticError::MissingReturnValue { function, expected }),
        }
    }

    /// Callee must name a function; arguments are not type-checked since
    /// the grammar only admits string literals for printf.
    fn check_call(&mut self, call: &FunctionCall) -> Result<()> {
        let info = self
            .scopes
            .lookup(&call.name)
            .ok_or_else(|| SemanticError::Undeclared(call.name.clone()))?;
        if info.category != Category::Function {
            return Err(SemanticError::NotAFunction(call.name.clone()));
        }
        Ok(())
    }

    fn check_condition(&mut self, condition: &Exp) -> Result<()> {
        let found = self.check_exp(condition)?;
        if found == Type::Bool {
            Ok(())
        } else {
            Err(SemanticError::ConditionNotBool(found))
        }
    }

    fn check_exp(&mut self, exp: &Exp) -> Result<Type> {
        match exp {
            Exp::Constant(c) => Ok(c.get_type()),
            Exp::Var(name) => self.check_var(name),
            Exp::Binary(op, left, right) => {
                let left = self.check_exp(left)?;
                let right = self.check_exp(right)?;
                Self::type_binary(*op, left, right)
            }
        }
    }

    fn check_var(&mut self, name: &str) -> Result<Type> {
        let info = self
            .scopes
            .lookup_mut(name)
            .ok_or_else(|| SemanticError::Undeclared(name.to_owned()))?;
        if info.category != Category::Variable {
            return Err(SemanticError::NotAVariable(name.to_owned()));
        }
        info.is_used = true;
        Ok(info.ty)
    }

    /// Exact-match typing with no conversions: arithmetic is int by int,
    /// relational compares two values of one type, logical combines two
    /// bools.
    fn type_binary(op: BinaryOp, left: Type, right: Type) -> Result<Type> {
        let result = if op.is_arithmetic() {
            (left == Type::Int && right == Type::Int).then_some(Type::Int)
        } else if op.is_relational() {
            (left == right).then_some(Type::Bool)
        } else {
            (left == Type::Bool && right == Type::Bool).then_some(Type::Bool)
        };
        result.ok_or(SemanticError::BadOperands { op, left, right })
    }
}
