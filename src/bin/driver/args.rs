use clap::Parser;
use std::path::PathBuf;

/// Restricted-C to 32-bit NASM compiler.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Parser)]
#[command(name = "sxcc", version, about)]
pub struct Args {
    /// Source file to compile.
    pub input: PathBuf,

    /// Where to write the assembly; defaults to the input path with an
    /// `.asm` extension.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Stop after lexing and dump the tokens.
    #[cfg(feature = "lexer")]
    #[arg(long)]
    pub lex: bool,

    /// Stop after parsing and dump the tree.
    #[cfg(feature = "parser")]
    #[arg(long)]
    pub parse: bool,

    /// Stop after semantic analysis and dump the validated tree.
    #[cfg(feature = "semantic_analysis")]
    #[arg(long)]
    pub validate: bool,

    /// Stop after code generation and dump the assembly tree.
    #[cfg(feature = "codegen")]
    #[arg(long)]
    pub codegen: bool,
}
