mod args;
mod driver_error;

use args::Args;
use clap::Parser;
use driver_error::DriverError;
use sxcc::*;
use std::fs;
use std::path::PathBuf;

#[cfg(feature = "lexer")]
fn tokenize(args: &Args) -> Result<lexer::Tokens, DriverError> {
    let source = fs::read_to_string(&args.input)?;
    let tokens = lexer::lex(&source)?;
    if args.lex {
        dbg!(&tokens);
    }
    Ok(tokens)
}

#[cfg(feature = "parser")]
fn parse(tokens: &[lexer::Token], args: &Args) -> Result<ast::Ast, DriverError> {
    let ast = parser::parse(tokens)?;
    if args.parse {
        dbg!(&ast);
    }
    Ok(ast)
}

#[cfg(feature = "semantic_analysis")]
fn validate(ast: ast::Ast, args: &Args) -> Result<ast::Ast, DriverError> {
    let validated = semantic_analysis::validate(ast)?;
    for warning in &validated.warnings {
        eprintln!("warning: {warning}");
    }
    if args.validate {
        dbg!(&validated.ast);
    }
    Ok(validated.ast)
}

#[cfg(feature = "codegen")]
fn gen_asm(ast: &ast::Ast, args: &Args) -> Result<codegen::asm_ast::AsmAst, DriverError> {
    let asm_ast = codegen::codegen(ast)?;
    if args.codegen {
        dbg!(&asm_ast);
    }
    Ok(asm_ast)
}

#[cfg(feature = "emission")]
fn emit_asm(asm_ast: &codegen::asm_ast::AsmAst, args: &Args) -> Result<(), DriverError> {
    let asm_file: PathBuf = match &args.output {
        Some(path) => path.clone(),
        None => args.input.with_extension("asm"),
    };
    fs::write(asm_file, asm_ast.to_string())?;
    Ok(())
}

fn main() -> Result<(), DriverError> {
    let args = Args::parse();

    if !args.input.exists() {
        let filename = args.input.to_string_lossy().to_string();
        return Err(DriverError::InputFileDoesNotExist(filename));
    }

    #[cfg(feature = "lexer")]
    let tokens = tokenize(&args)?;

    if args.lex {
        return Ok(());
    }

    #[cfg(feature = "parser")]
    let ast = parse(&tokens, &args)?;

    if args.parse {
        return Ok(());
    }

    #[cfg(feature = "semantic_analysis")]
    let ast = validate(ast, &args)?;

    if args.validate {
        return Ok(());
    }

    #[cfg(feature = "codegen")]
    let asm_ast = gen_asm(&ast, &args)?;

    if args.codegen {
        return Ok(());
    }

    #[cfg(feature = "emission")]
    emit_asm(&asm_ast, &args)?;

    Ok(())
}
