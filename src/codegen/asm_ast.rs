//! Typed model of the 32-bit NASM output. Printing lives in the
//! emission stage; this module only describes shapes.

#[derive(Debug, Eq, PartialEq)]
pub struct AsmAst {
    pub strings: Vec<StringConst>,
    pub functions: Vec<AsmFunction>,
}

/// One interned string literal in the data section. The label is
/// assigned at interning time and the text still carries its raw
/// escapes.
#[derive(Debug, Eq, PartialEq)]
pub struct StringConst {
    pub label: String,
    pub text: String,
}

#[derive(Debug, Eq, PartialEq)]
pub struct AsmFunction {
    pub name: String,
    pub instructions: Vec<Instruction>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Reg {
    Eax,
    Ebx,
    Ebp,
    Esp,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Operand {
    Reg(Reg),
    Imm(i64),
    /// Stack slot addressed relative to ebp; offsets are negative.
    Frame(i32),
    /// A data-section label used by value, e.g. a pushed string address.
    Data(String),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Instruction {
    Push(Operand),
    Pop(Operand),
    Mov(Operand, Operand),
    Add(Operand, Operand),
    Sub(Operand, Operand),
    Imul(Operand, Operand),
    Cdq,
    Idiv(Operand),
    Cmp(Operand, Operand),
    Jmp(String),
    JmpCC(Condition, String),
    Label(String),
    Call(String),
    /// Expands to the full epilogue on emission: restore esp, pop ebp,
    /// ret.
    Ret,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Condition {
    E,
    Ne,
    L,
    Le,
    G,
    Ge,
}
