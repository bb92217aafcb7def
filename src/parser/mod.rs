mod cursor;
mod parse_error;
#[cfg(test)]
mod parser_tests;

use crate::ast::*;
use crate::lexer::{Token, TokenKind};
use cursor::Cursor;
pub use parse_error::{ParseError, Result};

impl TryFrom<&Token> for BinaryOp {
    type Error = ParseError;
    fn try_from(t: &Token) -> std::result::Result<Self, ParseError> {
        if t.kind != TokenKind::Operator {
            return Err(ParseError::UnknownOperator(t.clone()));
        }
        match t.lexeme.as_str() {
            "+" => Ok(BinaryOp::Add),
            "-" => Ok(BinaryOp::Subtract),
            "*" => Ok(BinaryOp::Multiply),
            "/" => Ok(BinaryOp::Divide),
            "<" => Ok(BinaryOp::LessThan),
            ">" => Ok(BinaryOp::GreaterThan),
            "<=" => Ok(BinaryOp::LessOrEqual),
            ">=" => Ok(BinaryOp::GreaterOrEqual),
            "==" => Ok(BinaryOp::IsEqual),
            "!=" => Ok(BinaryOp::IsNotEqual),
            "&&" => Ok(BinaryOp::LogicalAnd),
            "||" => Ok(BinaryOp::LogicalOr),
            _ => Err(ParseError::UnknownOperator(t.clone())),
        }
    }
}

fn parse_identifier(cursor: &mut Cursor) -> Result<Identifier> {
    let next = cursor.next_or_error()?;
    if next.kind == TokenKind::Identifier {
        Ok(next.lexeme.clone())
    } else {
        Err(ParseError::ExpectedIdentifier(next.clone()))
    }
}

fn parse_term(cursor: &mut Cursor) -> Result<Exp> {
    let next = cursor.next_or_error()?.clone();
    match next.kind {
        TokenKind::Number => {
            let value = next
                .lexeme
                .parse::<i64>()
                .map_err(|_| ParseError::BadConstant(next.lexeme.clone()))?;
            Ok(Exp::int(value))
        }
        TokenKind::Identifier => Ok(Exp::Var(next.lexeme)),
        TokenKind::String => Ok(Exp::Constant(Constant::Str(next.lexeme))),
        _ => Err(ParseError::BadTerm(next)),
    }
}

fn parse_binary_op(cursor: &mut Cursor) -> Result<BinaryOp> {
    let next = cursor.next_or_error()?;
    BinaryOp::try_from(next)
}

/// Flat left-associative chain: arithmetic and relational operators all
/// bind at one level, left to right, with no parenthesized
/// sub-expressions. `a + b * c` is `(a + b) * c` here. `&&`/`||` are
/// not part of the chain and stop it.
fn parse_expression(cursor: &mut Cursor) -> Result<Exp> {
    let mut left = parse_term(cursor)?;
    while cursor
        .peek()
        .filter(|t| t.is_expression_operator())
        .is_some()
    {
        let op = parse_binary_op(cursor)?;
        let right = parse_term(cursor)?;
        left = Exp::binary(op, left, right);
    }
    Ok(left)
}

/// `IDENTIFIER '=' expression` or `IDENTIFIER ('++'|'--')`, the latter
/// desugared on the spot into `x = x + 1` / `x = x - 1`. The trailing
/// `;` belongs to the caller inside a `for` header.
fn parse_assignment(cursor: &mut Cursor, for_header: bool) -> Result<Assignment> {
    let target = parse_identifier(cursor)?;
    let next = cursor.next_or_error()?.clone();
    let value = if next.is_operator("=") {
        parse_expression(cursor)?
    } else if next.is_incdec() {
        let op = if next.lexeme == "++" {
            BinaryOp::Add
        } else {
            BinaryOp::Subtract
        };
        Exp::binary(op, Exp::var(target.clone()), Exp::int(1))
    } else {
        return Err(ParseError::ExpectedAssignOp(next));
    };
    if !for_header {
        cursor.expect(TokenKind::Delimiter, ";")?;
    }
    Ok(Assignment { target, value })
}

fn parse_declaration(cursor: &mut Cursor) -> Result<Declaration> {
    let kw = cursor.next_or_error()?.clone();
    let var_type = Type::from_var_keyword(&kw.lexeme)
        .ok_or_else(|| ParseError::BadTypeKeyword(kw.lexeme.clone()))?;
    let name = parse_identifier(cursor)?;
    let has_init = cursor.bump_if(TokenKind::Operator, "=");
    let init = has_init.then(|| parse_expression(cursor)).transpose()?;
    cursor.expect(TokenKind::Delimiter, ";")?;
    Ok(Declaration {
        var_type,
        name,
        init,
    })
}

fn parse_if_statement(cursor: &mut Cursor) -> Result<Statement> {
    cursor.expect(TokenKind::Keyword, "if")?;
    cursor.expect(TokenKind::Delimiter, "(")?;
    let condition = parse_expression(cursor)?;
    cursor.expect(TokenKind::Delimiter, ")")?;
    let then = parse_compound_statement(cursor)?;
    let else_present = cursor.bump_if(TokenKind::Keyword, "else");
    let els = else_present
        .then(|| parse_compound_statement(cursor))
        .transpose()?;
    Ok(Statement::If(If {
        condition,
        then,
        els,
    }))
}

fn parse_for_statement(cursor: &mut Cursor) -> Result<Statement> {
    cursor.expect(TokenKind::Keyword, "for")?;
    cursor.expect(TokenKind::Delimiter, "(")?;

    let peek = cursor.peek_or_error()?.clone();
    let init = if peek.is_type_keyword() {
        // parse_declaration consumes the separating ';'.
        Some(ForInit::Decl(parse_declaration(cursor)?))
    } else if peek.kind == TokenKind::Identifier {
        let assign = parse_assignment(cursor, true)?;
        cursor.expect(TokenKind::Delimiter, ";")?;
        Some(ForInit::Assign(assign))
    } else if peek.is_delimiter(";") {
        cursor.bump();
        None
    } else {
        return Err(ParseError::BadForInit(peek));
    };

    let has_condition = !cursor.peek_or_error()?.is_delimiter(";");
    let condition = has_condition.then(|| parse_expression(cursor)).transpose()?;
    cursor.expect(TokenKind::Delimiter, ";")?;

    let has_post = cursor.peek_or_error()?.kind == TokenKind::Identifier;
    let post = has_post
        .then(|| parse_assignment(cursor, true))
        .transpose()?;
    cursor.expect(TokenKind::Delimiter, ")")?;

    let body = parse_compound_statement(cursor)?;
    Ok(Statement::For(For {
        init,
        condition,
        post,
        body,
    }))
}

fn parse_while_statement(cursor: &mut Cursor) -> Result<Statement> {
    cursor.expect(TokenKind::Keyword, "while")?;
    cursor.expect(TokenKind::Delimiter, "(")?;
    let condition = parse_expression(cursor)?;
    cursor.expect(TokenKind::Delimiter, ")")?;
    let body = parse_compound_statement(cursor)?;
    Ok(Statement::While(While { condition, body }))
}

fn parse_do_while_statement(cursor: &mut Cursor) -> Result<Statement> {
    cursor.expect(TokenKind::Keyword, "do")?;
    let body = parse_compound_statement(cursor)?;
    cursor.expect(TokenKind::Keyword, "while")?;
    cursor.expect(TokenKind::Delimiter, "(")?;
    let condition = parse_expression(cursor)?;
    cursor.expect(TokenKind::Delimiter, ")")?;
    cursor.expect(TokenKind::Delimiter, ";")?;
    Ok(Statement::DoWhile(DoWhile { body, condition }))
}

fn parse_return_statement(cursor: &mut Cursor) -> Result<Statement> {
    cursor.expect(TokenKind::Keyword, "return")?;
    if cursor.bump_if(TokenKind::Delimiter, ";") {
        return Ok(Statement::Return(None));
    }
    let value = parse_expression(cursor)?;
    cursor.expect(TokenKind::Delimiter, ";")?;
    Ok(Statement::Return(Some(value)))
}

/// Not a general call grammar: the only callable is `printf`, with zero
/// or one string-literal argument.
fn parse_function_call(cursor: &mut Cursor) -> Result<FunctionCall> {
    cursor.expect(TokenKind::Keyword, "printf")?;
    cursor.expect(TokenKind::Delimiter, "(")?;
    let mut args = Vec::new();
    if cursor.peek_or_error()?.kind == TokenKind::String {
        let literal = cursor.next_or_error()?.lexeme.clone();
        args.push(Exp::Constant(Constant::Str(literal)));
    }
    cursor.expect(TokenKind::Delimiter, ")")?;
    cursor.expect(TokenKind::Delimiter, ";")?;
    Ok(FunctionCall {
        name: "printf".to_owned(),
        args,
    })
}

fn parse_statement(cursor: &mut Cursor) -> Result<Statement> {
    let peek = cursor.peek_or_error()?;
    match peek {
        t if t.is_type_keyword() => parse_declaration(cursor).map(Statement::Declaration),
        t if t.is_keyword("if") => parse_if_statement(cursor),
        t if t.is_keyword("for") => parse_for_statement(cursor),
        t if t.is_keyword("while") => parse_while_statement(cursor),
        t if t.is_keyword("do") => parse_do_while_statement(cursor),
        t if t.is_keyword("return") => parse_return_statement(cursor),
        t if t.is_keyword("printf") => parse_function_call(cursor).map(Statement::Call),
        t if t.kind == TokenKind::Identifier => {
            let second = cursor.peek_nth_or_error(1)?;
            if second.is_operator("=") || second.is_incdec() {
                parse_assignment(cursor, false).map(Statement::Assignment)
            } else {
                Err(ParseError::UnexpectedStatement(peek.clone()))
            }
        }
        t => Err(ParseError::UnexpectedStatement(t.clone())),
    }
}

fn parse_compound_statement(cursor: &mut Cursor) -> Result<Block> {
    cursor.expect(TokenKind::Delimiter, "{")?;
    let mut statements = Vec::new();
    while !cursor.peek_or_error()?.is_delimiter("}") {
        statements.push(parse_statement(cursor)?);
    }
    cursor.bump();
    Ok(Block { statements })
}

fn parse_function_definition(cursor: &mut Cursor) -> Result<FunctionDefinition> {
    let kw = cursor.next_or_error()?.clone();
    if kw.kind != TokenKind::Keyword {
        return Err(ParseError::BadTypeKeyword(kw.lexeme));
    }
    let return_type =
        Type::from_return_keyword(&kw.lexeme).ok_or(ParseError::BadTypeKeyword(kw.lexeme))?;
    let name = parse_identifier(cursor)?;
    // Parameter lists are always empty in this subset.
    cursor.expect(TokenKind::Delimiter, "(")?;
    cursor.expect(TokenKind::Delimiter, ")")?;
    let body = parse_compound_statement(cursor)?;
    Ok(FunctionDefinition {
        name,
        return_type,
        body,
    })
}

/// Consumes every token or fails; a program is a non-empty sequence of
/// function definitions.
pub fn parse(tokens: &[Token]) -> Result<Ast> {
    let mut functions = Vec::new();
    let mut cursor = Cursor::new(tokens);

    while !cursor.at_end() {
        let f = parse_function_definition(&mut cursor)?;
        functions.push(f);
    }
    if functions.is_empty() {
        return Err(ParseError::EmptyProgram);
    }
    Ok(Ast { functions })
}
