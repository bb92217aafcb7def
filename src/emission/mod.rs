//! NASM text rendering via `Display` impls over the codegen model.
//! Labels print flush left; everything else is indented two spaces.

use crate::codegen::asm_ast::*;
use std::fmt;

impl fmt::Display for AsmAst {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.strings.is_empty() {
            writeln!(f, "section .data")?;
            for string in &self.strings {
                writeln!(f, "{string}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "section .text")?;
        writeln!(f, "extern printf")?;
        for function in &self.functions {
            writeln!(f)?;
            write!(f, "{function}")?;
        }
        Ok(())
    }
}

impl fmt::Display for StringConst {
    /// Every literal gets a trailing newline and NUL appended.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "  {} db \"{}\", 10, 0", self.label, self.text)
    }
}

impl fmt::Display for AsmFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "global {}", self.name)?;
        writeln!(f, "{}:", self.name)?;
        for instruction in &self.instructions {
            write!(f, "{instruction}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Push(o) => writeln!(f, "  push {o}"),
            Self::Pop(o) => writeln!(f, "  pop {o}"),
            Self::Mov(dst, src) => writeln!(f, "  mov {dst}, {src}"),
            Self::Add(dst, src) => writeln!(f, "  add {dst}, {src}"),
            Self::Sub(dst, src) => writeln!(f, "  sub {dst}, {src}"),
            Self::Imul(dst, src) => writeln!(f, "  imul {dst}, {src}"),
            Self::Cdq => writeln!(f, "  cdq"),
            Self::Idiv(o) => writeln!(f, "  idiv {o}"),
            Self::Cmp(left, right) => writeln!(f, "  cmp {left}, {right}"),
            Self::Jmp(label) => writeln!(f, "  jmp {label}"),
            Self::JmpCC(condition, label) => writeln!(f, "  j{condition} {label}"),
            Self::Label(label) => writeln!(f, "{label}:"),
            Self::Call(name) => writeln!(f, "  call {name}"),
            Self::Ret => {
                writeln!(f, "  mov esp, ebp")?;
                writeln!(f, "  pop ebp")?;
                writeln!(f, "  ret")
            }
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Reg(r) => write!(f, "{r}"),
            Self::Imm(value) => write!(f, "{value}"),
            Self::Frame(offset) => write!(f, "[ebp{offset:+}]"),
            Self::Data(label) => write!(f, "{label}"),
        }
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::Eax => "eax",
            Self::Ebx => "ebx",
            Self::Ebp => "ebp",
            Self::Esp => "esp",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::E => "e",
            Self::Ne => "ne",
            Self::L => "l",
            Self::Le => "le",
            Self::G => "g",
            Self::Ge => "ge",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use crate::codegen;
    use crate::lexer;
    use crate::parser;

    fn emit(src: &str) -> String {
        let tokens = lexer::lex(src).unwrap();
        let ast = parser::parse(&tokens).unwrap();
        codegen::codegen(&ast).unwrap().to_string()
    }

    #[test]
    fn test_minimal_function() {
        let text = emit("int main() { int x = 10; return x; }");
        let expected = "\
section .text
extern printf

global main
main:
  push ebp
  mov ebp, esp
  sub esp, 4
  mov eax, 10
  mov [ebp-4], eax
  mov eax, [ebp-4]
  mov esp, ebp
  pop ebp
  ret
";
        assert_eq!(expected, text);
    }

    #[test]
    fn test_printf_program_has_a_data_section() {
        let text = emit("int main() { printf(\"hi\"); return 0; }");
        let expected = "\
section .data
  S0 db \"hi\", 10, 0

section .text
extern printf

global main
main:
  push ebp
  mov ebp, esp
  push S0
  call printf
  add esp, 4
  mov eax, 0
  mov esp, ebp
  pop ebp
  ret
";
        assert_eq!(expected, text);
    }

    #[test]
    fn test_labels_are_flush_left() {
        let text = emit("int main() { int x = 1; while (x > 0) { x--; } return x; }");
        assert!(text.contains("\n.Lwhile0:\n"));
        assert!(text.contains("\n  je .Lend_while0\n"));
        assert!(text.contains("\n  jg .Ltrue1\n"));
    }

    #[test]
    fn test_raw_escapes_pass_through() {
        let text = emit("int main() { printf(\"a\\tb\"); return 0; }");
        assert!(text.contains("S0 db \"a\\tb\", 10, 0"));
    }
}
