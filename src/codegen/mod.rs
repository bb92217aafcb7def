//! Tree-walking lowering to the NASM model in [`asm_ast`]. Every
//! expression evaluates into eax; ebx is the only scratch register and
//! binary operands spill through the stack so nested expressions cannot
//! clobber each other.

pub mod asm_ast;

use crate::ast::*;
use crate::scope::ScopeStack;
use asm_ast::*;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodegenError>;

/// Conditions here are internal invariant violations: a validated tree
/// never triggers them, but lowering still refuses to guess.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum CodegenError {
    #[error("no stack slot for variable '{0}'")]
    UnresolvedVariable(Identifier),
    #[error("string literal has no value lowering outside a call argument")]
    StrayStringLiteral,
    #[error("operator '{0}' has no lowering")]
    UnloweredOperator(BinaryOp),
}

pub fn codegen(ast: &Ast) -> Result<AsmAst> {
    let mut generator = Generator::new();
    let functions = ast
        .functions
        .iter()
        .map(|f| generator.gen_function(f))
        .collect::<Result<Vec<_>>>()?;
    Ok(AsmAst {
        strings: generator.strings,
        functions,
    })
}

struct Generator {
    strings: Vec<StringConst>,
    label_counter: usize,
    offsets: ScopeStack<i32>,
    current_offset: i32,
}

impl Generator {
    fn new() -> Self {
        Self {
            strings: Vec::new(),
            label_counter: 0,
            offsets: ScopeStack::new(),
            current_offset: 0,
        }
    }

    /// One shared counter numbers every label pair in the order the
    /// constructs are reached, conditions included.
    fn fresh_label(&mut self) -> usize {
        let n = self.label_counter;
        self.label_counter += 1;
        n
    }

    fn intern_string(&mut self, text: &str) -> String {
        let label = format!("S{}", self.strings.len());
        self.strings.push(StringConst {
            label: label.clone(),
            text: text.to_owned(),
        });
        label
    }

    fn gen_function(&mut self, function: &FunctionDefinition) -> Result<AsmFunction> {
        // Each function gets a fresh frame; slots from the previous one
        // must not leak through.
        self.offsets = ScopeStack::new();
        self.current_offset = 0;

        let mut out = vec![
            Instruction::Push(Operand::Reg(Reg::Ebp)),
            Instruction::Mov(Operand::Reg(Reg::Ebp), Operand::Reg(Reg::Esp)),
        ];
        self.gen_block(&function.body, &mut out)?;
        // A body that falls off the end emits no epilogue of its own.
        Ok(AsmFunction {
            name: function.name.clone(),
            instructions: out,
        })
    }

    fn gen_block(&mut self, block: &Block, out: &mut Vec<Instruction>) -> Result<()> {
        self.offsets.push_scope();
        let generated = block
            .statements
            .iter()
            .try_for_each(|statement| self.gen_statement(statement, out));
        // Slots stay allocated until the epilogue; only the names go out
        // of scope.
        self.offsets.pop_scope();
        generated
    }

    fn gen_statement(&mut self, statement: &Statement, out: &mut Vec<Instruction>) -> Result<()> {
        match statement {
            Statement::Declaration(d) => self.gen_declaration(d, out),
            Statement::Assignment(a) => self.gen_assignment(a, out),
            Statement::If(i) => self.gen_if(i, out),
            Statement::For(f) => self.gen_for(f, out),
            Statement::While(w) => self.gen_while(w, out),
            Statement::DoWhile(d) => self.gen_do_while(d, out),
            Statement::Return(value) => self.gen_return(value.as_ref(), out),
            Statement::Call(call) => self.gen_call(call, out),
            Statement::Compound(block) => self.gen_block(block, out),
        }
    }

    /// Every declaration grows the frame by one 4-byte slot, whatever
    /// the declared type.
    fn gen_declaration(&mut self, declaration: &Declaration, out: &mut Vec<Instruction>) -> Result<()> {
        out.push(Instruction::Sub(
            Operand::Reg(Reg::Esp),
            Operand::Imm(4),
        ));
        self.current_offset -= 4;
        let offset = self.current_offset;
        self.offsets.insert(declaration.name.clone(), offset);
        if let Some(init) = &declaration.init {
            self.gen_exp(init, out)?;
            out.push(Instruction::Mov(
                Operand::Frame(offset),
                Operand::Reg(Reg::Eax),
            ));
        }
        Ok(())
    }

    fn gen_assignment(&mut self, assignment: &Assignment, out: &mut Vec<Instruction>) -> Result<()> {
        self.gen_exp(&assignment.value, out)?;
        let offset = self.slot(&assignment.target)?;
        out.push(Instruction::Mov(
            Operand::Frame(offset),
            Operand::Reg(Reg::Eax),
        ));
        Ok(())
    }

    fn gen_if(&mut self, if_st: &If, out: &mut Vec<Instruction>) -> Result<()> {
        let n = self.fresh_label();
        let end_label = format!(".Lend_if{n}");
        self.gen_exp(&if_st.condition, out)?;
        out.push(Instruction::Cmp(Operand::Reg(Reg::Eax), Operand::Imm(0)));
        match &if_st.els {
            Some(els) => {
                let else_label = format!(".Lelse{n}");
                out.push(Instruction::JmpCC(Condition::E, else_label.clone()));
                self.gen_block(&if_st.then, out)?;
                out.push(Instruction::Jmp(end_label.clone()));
                out.push(Instruction::Label(else_label));
                self.gen_block(els, out)?;
            }
            None => {
                out.push(Instruction::JmpCC(Condition::E, end_label.clone()));
                self.gen_block(&if_st.then, out)?;
            }
        }
        out.push(Instruction::Label(end_label));
        Ok(())
    }

    fn gen_while(&mut self, while_st: &While, out: &mut Vec<Instruction>) -> Result<()> {
        let n = self.fresh_label();
        let top_label = format!(".Lwhile{n}");
        let end_label = format!(".Lend_while{n}");
        out.push(Instruction::Label(top_label.clone()));
        self.gen_exp(&while_st.condition, out)?;
        out.push(Instruction::Cmp(Operand::Reg(Reg::Eax), Operand::Imm(0)));
        out.push(Instruction::JmpCC(Condition::E, end_label.clone()));
        self.gen_block(&while_st.body, out)?;
        out.push(Instruction::Jmp(top_label));
        out.push(Instruction::Label(end_label));
        Ok(())
    }

    fn gen_do_while(&mut self, do_while: &DoWhile, out: &mut Vec<Instruction>) -> Result<()> {
        let n = self.fresh_label();
        let top_label = format!(".Ldo_while{n}");
        out.push(Instruction::Label(top_label.clone()));
        self.gen_block(&do_while.body, out)?;
        self.gen_exp(&do_while.condition, out)?;
        out.push(Instruction::Cmp(Operand::Reg(Reg::Eax), Operand::Imm(0)));
        out.push(Instruction::JmpCC(Condition::Ne, top_label));
        Ok(())
    }

    fn gen_for(&mut self, for_st: &For, out: &mut Vec<Instruction>) -> Result<()> {
        let n = self.fresh_label();
        self.offsets.push_scope();
        let generated = self.gen_for_parts(for_st, n, out);
        self.offsets.pop_scope();
        generated
    }

    fn gen_for_parts(&mut self, for_st: &For, n: usize, out: &mut Vec<Instruction>) -> Result<()> {
        let top_label = format!(".Lfor{n}");
        let end_label = format!(".Lend_for{n}");
        match &for_st.init {
            Some(ForInit::Decl(d)) => self.gen_declaration(d, out)?,
            Some(ForInit::Assign(a)) => self.gen_assignment(a, out)?,
            None => {}
        }
        out.push(Instruction::Label(top_label.clone()));
        if let Some(condition) = &for_st.condition {
            self.gen_exp(condition, out)?;
            out.push(Instruction::Cmp(Operand::Reg(Reg::Eax), Operand::Imm(0)));
            out.push(Instruction::JmpCC(Condition::E, end_label.clone()));
        }
        self.gen_block(&for_st.body, out)?;
        if let Some(post) = &for_st.post {
            self.gen_assignment(post, out)?;
        }
        out.push(Instruction::Jmp(top_label));
        out.push(Instruction::Label(end_label));
        Ok(())
    }

    /// Every `return` carries its own full epilogue.
    fn gen_return(&mut self, value: Option<&Exp>, out: &mut Vec<Instruction>) -> Result<()> {
        if let Some(exp) = value {
            self.gen_exp(exp, out)?;
        }
        out.push(Instruction::Ret);
        Ok(())
    }

    fn gen_call(&mut self, call: &FunctionCall, out: &mut Vec<Instruction>) -> Result<()> {
        match call.args.first() {
            Some(Exp::Constant(Constant::Str(text))) => {
                let label = self.intern_string(text);
                out.push(Instruction::Push(Operand::Data(label)));
            }
            Some(other) => {
                self.gen_exp(other, out)?;
                out.push(Instruction::Push(Operand::Reg(Reg::Eax)));
            }
            None => {
                out.push(Instruction::Call(call.name.clone()));
                return Ok(());
            }
        }
        out.push(Instruction::Call(call.name.clone()));
        out.push(Instruction::Add(Operand::Reg(Reg::Esp), Operand::Imm(4)));
        Ok(())
    }

    fn gen_exp(&mut self, exp: &Exp, out: &mut Vec<Instruction>) -> Result<()> {
        match exp {
            Exp::Constant(Constant::Int(value)) => {
                out.push(Instruction::Mov(Operand::Reg(Reg::Eax), Operand::Imm(*value)));
                Ok(())
            }
            Exp::Constant(Constant::Str(_)) => Err(CodegenError::StrayStringLiteral),
            Exp::Var(name) => {
                let offset = self.slot(name)?;
                out.push(Instruction::Mov(
                    Operand::Reg(Reg::Eax),
                    Operand::Frame(offset),
                ));
                Ok(())
            }
            Exp::Binary(op, left, right) => self.gen_binary(*op, left, right, out),
        }
    }

    fn gen_binary(
        &mut self,
        op: BinaryOp,
        left: &Exp,
        right: &Exp,
        out: &mut Vec<Instruction>,
    ) -> Result<()> {
        // Right first, parked on the stack while the left side claims
        // eax; the pop leaves the right operand in ebx.
        self.gen_exp(right, out)?;
        out.push(Instruction::Push(Operand::Reg(Reg::Eax)));
        self.gen_exp(left, out)?;
        out.push(Instruction::Pop(Operand::Reg(Reg::Ebx)));

        let eax = Operand::Reg(Reg::Eax);
        let ebx = Operand::Reg(Reg::Ebx);
        match op {
            BinaryOp::Add => out.push(Instruction::Add(eax, ebx)),
            BinaryOp::Subtract => out.push(Instruction::Sub(eax, ebx)),
            BinaryOp::Multiply => out.push(Instruction::Imul(eax, ebx)),
            BinaryOp::Divide => {
                out.push(Instruction::Cdq);
                out.push(Instruction::Idiv(ebx));
            }
            op if op.is_relational() => self.gen_comparison(op, out)?,
            op => return Err(CodegenError::UnloweredOperator(op)),
        }
        Ok(())
    }

    /// Comparisons materialize 0 or 1 in eax through a fresh label pair.
    fn gen_comparison(&mut self, op: BinaryOp, out: &mut Vec<Instruction>) -> Result<()> {
        let condition = match op {
            BinaryOp::LessThan => Condition::L,
            BinaryOp::GreaterThan => Condition::G,
            BinaryOp::LessOrEqual => Condition::Le,
            BinaryOp::GreaterOrEqual => Condition::Ge,
            BinaryOp::IsEqual => Condition::E,
            BinaryOp::IsNotEqual => Condition::Ne,
            op => return Err(CodegenError::UnloweredOperator(op)),
        };
        let n = self.fresh_label();
        let true_label = format!(".Ltrue{n}");
        let end_label = format!(".Lend_cmp{n}");
        out.push(Instruction::Cmp(Operand::Reg(Reg::Eax), Operand::Reg(Reg::Ebx)));
        out.push(Instruction::JmpCC(condition, true_label.clone()));
        out.push(Instruction::Mov(Operand::Reg(Reg::Eax), Operand::Imm(0)));
        out.push(Instruction::Jmp(end_label.clone()));
        out.push(Instruction::Label(true_label));
        out.push(Instruction::Mov(Operand::Reg(Reg::Eax), Operand::Imm(1)));
        out.push(Instruction::Label(end_label));
        Ok(())
    }

    fn slot(&self, name: &str) -> Result<i32> {
        self.offsets
            .lookup(name)
            .copied()
            .ok_or_else(|| CodegenError::UnresolvedVariable(name.to_owned()))
    }
}
