use super::*;
use crate::lexer;

fn parse_source(src: &str) -> Result<Ast> {
    let tokens = lexer::lex(src).unwrap();
    parse(&tokens)
}

fn parse_expr(src: &str) -> Result<Exp> {
    let tokens = lexer::lex(src).unwrap();
    let mut cursor = Cursor::new(&tokens);
    parse_expression(&mut cursor)
}

#[test]
fn test_scenario_a_shape() {
    let ast = parse_source("int main() { int x = 10; return x; }").unwrap();
    let expected = Ast {
        functions: vec![FunctionDefinition {
            name: "main".into(),
            return_type: Type::Int,
            body: Block {
                statements: vec![
                    Statement::Declaration(Declaration {
                        var_type: Type::Int,
                        name: "x".into(),
                        init: Some(Exp::int(10)),
                    }),
                    Statement::Return(Some(Exp::var("x"))),
                ],
            },
        }],
    };
    assert_eq!(expected, ast);
}

#[test]
fn test_flat_precedence_left_to_right() {
    // No precedence: a + b * c associates as (a + b) * c.
    let exp = parse_expr("a + b * c").unwrap();
    let expected = Exp::binary(
        BinaryOp::Multiply,
        Exp::binary(BinaryOp::Add, Exp::var("a"), Exp::var("b")),
        Exp::var("c"),
    );
    assert_eq!(expected, exp);
}

#[test]
fn test_relational_chains_like_any_other_operator() {
    let exp = parse_expr("a + b < c").unwrap();
    let expected = Exp::binary(
        BinaryOp::LessThan,
        Exp::binary(BinaryOp::Add, Exp::var("a"), Exp::var("b")),
        Exp::var("c"),
    );
    assert_eq!(expected, exp);
}

#[test]
fn test_logical_operators_stop_the_chain() {
    // && is lexed but is not part of the expression grammar; the chain
    // ends before it and the leftover token is the caller's problem.
    let src = "int main() { int x = 1 && 2; }";
    assert!(parse_source(src).is_err());
}

#[test]
fn test_no_parenthesized_subexpressions() {
    assert!(parse_expr("(1 + 2)").is_err());
}

#[test]
fn test_postfix_increment_desugars() {
    let ast = parse_source("int main() { x++; }").unwrap();
    let expected = Statement::Assignment(Assignment {
        target: "x".into(),
        value: Exp::binary(BinaryOp::Add, Exp::var("x"), Exp::int(1)),
    });
    assert_eq!(vec![expected], ast.functions[0].body.statements);
}

#[test]
fn test_postfix_decrement_in_for_header_desugars() {
    let ast = parse_source("int main() { for (i = 3; i > 0; i--) { } }").unwrap();
    let Statement::For(for_st) = &ast.functions[0].body.statements[0] else {
        panic!("expected for statement");
    };
    let expected_post = Assignment {
        target: "i".into(),
        value: Exp::binary(BinaryOp::Subtract, Exp::var("i"), Exp::int(1)),
    };
    assert_eq!(Some(expected_post), for_st.post);
}

#[test]
fn test_for_header_parts_all_optional() {
    let ast = parse_source("int main() { for (;;) { } }").unwrap();
    let Statement::For(for_st) = &ast.functions[0].body.statements[0] else {
        panic!("expected for statement");
    };
    assert_eq!(None, for_st.init);
    assert_eq!(None, for_st.condition);
    assert_eq!(None, for_st.post);
}

#[test]
fn test_for_init_declaration() {
    let ast = parse_source("int main() { for (int i = 0; i < 3; i++) { } }").unwrap();
    let Statement::For(for_st) = &ast.functions[0].body.statements[0] else {
        panic!("expected for statement");
    };
    assert!(matches!(for_st.init, Some(ForInit::Decl(_))));
}

#[test]
fn test_if_requires_braced_bodies() {
    assert!(parse_source("int main() { if (x > 0) return 1; }").is_err());
    assert!(parse_source("int main() { if (x > 0) { } else { } }").is_ok());
}

#[test]
fn test_do_while_requires_trailing_semicolon() {
    assert!(parse_source("int main() { do { } while (x > 0) }").is_err());
    assert!(parse_source("int main() { do { x--; } while (x > 0); }").is_ok());
}

#[test]
fn test_valueless_return() {
    let ast = parse_source("void f() { return; }").unwrap();
    assert_eq!(
        vec![Statement::Return(None)],
        ast.functions[0].body.statements
    );
}

#[test]
fn test_printf_with_string_argument() {
    let ast = parse_source("int main() { printf(\"hi\"); }").unwrap();
    let expected = Statement::Call(FunctionCall {
        name: "printf".into(),
        args: vec![Exp::Constant(Constant::Str("hi".into()))],
    });
    assert_eq!(vec![expected], ast.functions[0].body.statements);
}

#[test]
fn test_printf_with_no_argument() {
    let ast = parse_source("int main() { printf(); }").unwrap();
    let Statement::Call(call) = &ast.functions[0].body.statements[0] else {
        panic!("expected call statement");
    };
    assert!(call.args.is_empty());
}

#[test]
fn test_parameter_parens_must_be_empty() {
    assert!(parse_source("int main(void) { }").is_err());
    assert!(parse_source("int f(int a) { }").is_err());
}

#[test]
fn test_missing_semicolon_reports_expected_and_got() {
    let err = parse_source("int main() { int x = 1 }").unwrap_err();
    let ParseError::ExpectedButGot { expected, got } = err else {
        panic!("expected ExpectedButGot, got {err:?}");
    };
    assert_eq!(expected.lexeme, ";");
    assert_eq!(got.lexeme, "}");
}

#[test]
fn test_unexpected_statement_token() {
    let err = parse_source("int main() { else; }").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedStatement(_)));
}

#[test]
fn test_empty_input_is_rejected() {
    assert_eq!(parse(&[]), Err(ParseError::EmptyProgram));
}

#[test]
fn test_every_token_is_consumed() {
    // Trailing junk after the last function definition fails instead of
    // being silently ignored.
    assert!(parse_source("int main() { } }").is_err());
}

#[test]
fn test_two_function_definitions() {
    let ast = parse_source("int one() { return 1; } void two() { return; }").unwrap();
    assert_eq!(2, ast.functions.len());
    assert_eq!("one", ast.functions[0].name);
    assert_eq!(Type::Void, ast.functions[1].return_type);
}
