use std::fmt;

pub type Identifier = String;

#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    pub functions: Vec<FunctionDefinition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub name: Identifier,
    pub return_type: Type,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Declaration(Declaration),
    Assignment(Assignment),
    If(If),
    For(For),
    While(While),
    DoWhile(DoWhile),
    Return(Option<Exp>),
    Call(FunctionCall),
    Compound(Block),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub var_type: Type,
    pub name: Identifier,
    pub init: Option<Exp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: Identifier,
    pub value: Exp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub condition: Exp,
    pub then: Block,
    pub els: Option<Block>,
}

/// Header parts are all optional; an absent condition means the loop
/// always continues.
#[derive(Debug, Clone, PartialEq)]
pub struct For {
    pub init: Option<ForInit>,
    pub condition: Option<Exp>,
    pub post: Option<Assignment>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Decl(Declaration),
    Assign(Assignment),
}

#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub condition: Exp,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoWhile {
    pub body: Block,
    pub condition: Exp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: Identifier,
    pub args: Vec<Exp>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Exp {
    Binary(BinaryOp, Box<Exp>, Box<Exp>),
    Var(Identifier),
    Constant(Constant),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Int(i64),
    Str(String),
}

impl Constant {
    pub fn get_type(&self) -> Type {
        match self {
            Self::Int(_) => Type::Int,
            Self::Str(_) => Type::String,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    LessThan,
    GreaterThan,
    LessOrEqual,
    GreaterOrEqual,
    IsEqual,
    IsNotEqual,
    LogicalAnd,
    LogicalOr,
}

impl BinaryOp {
    #[inline]
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide
        )
    }

    #[inline]
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            Self::LessThan
                | Self::GreaterThan
                | Self::LessOrEqual
                | Self::GreaterOrEqual
                | Self::IsEqual
                | Self::IsNotEqual
        )
    }

    #[inline]
    pub fn is_logical(self) -> bool {
        matches!(self, Self::LogicalAnd | Self::LogicalOr)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessOrEqual => "<=",
            Self::GreaterOrEqual => ">=",
            Self::IsEqual => "==",
            Self::IsNotEqual => "!=",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
        };
        write!(f, "{s}")
    }
}

/// `Bool` and `String` never appear in declarations; they only arise
/// while typing conditions and literals.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Type {
    Int,
    Char,
    Float,
    Void,
    Bool,
    String,
}

impl Type {
    /// Types a variable declaration may carry.
    pub fn from_var_keyword(kw: &str) -> Option<Self> {
        match kw {
            "int" => Some(Self::Int),
            "char" => Some(Self::Char),
            "float" => Some(Self::Float),
            _ => None,
        }
    }

    /// Types a function may return.
    pub fn from_return_keyword(kw: &str) -> Option<Self> {
        match kw {
            "void" => Some(Self::Void),
            _ => Self::from_var_keyword(kw),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::Int => "int",
            Self::Char => "char",
            Self::Float => "float",
            Self::Void => "void",
            Self::Bool => "bool",
            Self::String => "string",
        };
        write!(f, "{s}")
    }
}

impl Exp {
    pub fn var(name: impl Into<Identifier>) -> Self {
        Self::Var(name.into())
    }

    pub fn int(value: i64) -> Self {
        Self::Constant(Constant::Int(value))
    }

    pub fn binary(op: BinaryOp, left: Exp, right: Exp) -> Self {
        Self::Binary(op, Box::new(left), Box::new(right))
    }
}
