use super::*;
use crate::lexer;
use crate::parser;

fn analyze(src: &str) -> Result<ValidatedAst> {
    let tokens = lexer::lex(src).unwrap();
    let ast = parser::parse(&tokens).unwrap();
    validate(ast)
}

#[test]
fn test_valid_program_passes_through_unchanged() {
    let src = "int main() { int x = 10; int y = 20; int z = x + y; return z; }";
    let tokens = lexer::lex(src).unwrap();
    let ast = parser::parse(&tokens).unwrap();
    let validated = validate(ast.clone()).unwrap();
    assert_eq!(ast, validated.ast);
    assert!(validated.warnings.is_empty());
    // A second run over the same tree reaches the same verdict; no
    // state survives a validate call.
    let revalidated = validate(validated.ast).unwrap();
    assert_eq!(ast, revalidated.ast);
    assert!(revalidated.warnings.is_empty());
}

#[test]
fn test_returning_a_string_from_an_int_function() {
    let err = analyze("int f() { return \"s\"; }").unwrap_err();
    assert_eq!(
        err,
        SemanticError::ReturnMismatch {
            function: "f".into(),
            expected: Type::Int,
            found: Type::String,
        }
    );
}

#[test]
fn test_undeclared_identifier_is_named() {
    let err = analyze("int main() { return missing; }").unwrap_err();
    assert_eq!(err, SemanticError::Undeclared("missing".into()));
}

#[test]
fn test_undeclared_assignment_target() {
    let err = analyze("int main() { ghost = 1; return 0; }").unwrap_err();
    assert_eq!(err, SemanticError::Undeclared("ghost".into()));
}

#[test]
fn test_duplicate_declaration_in_same_scope() {
    let err = analyze("int main() { int x = 1; int x = 2; return 0; }").unwrap_err();
    assert_eq!(err, SemanticError::Redeclared("x".into()));
}

#[test]
fn test_shadowing_in_inner_block_is_fine() {
    let src = "int main() { int x = 1; if (x == 1) { int x = 2; return x; } return x; }";
    assert!(analyze(src).is_ok());
}

#[test]
fn test_string_initializer_for_int() {
    let err = analyze("int main() { int x = \"hi\"; return x; }").unwrap_err();
    assert_eq!(
        err,
        SemanticError::AssignmentMismatch {
            name: "x".into(),
            expected: Type::Int,
            found: Type::String,
        }
    );
}

#[test]
fn test_condition_must_be_bool() {
    // A bare int is not a condition; no implicit truthiness.
    let err = analyze("int main() { int x = 1; while (x) { x--; } return x; }").unwrap_err();
    assert_eq!(err, SemanticError::ConditionNotBool(Type::Int));
}

#[test]
fn test_relational_result_is_bool_not_int() {
    let err = analyze("int main() { int x = 1 < 2; return x; }").unwrap_err();
    assert_eq!(
        err,
        SemanticError::AssignmentMismatch {
            name: "x".into(),
            expected: Type::Int,
            found: Type::Bool,
        }
    );
}

#[test]
fn test_arithmetic_rejects_mixed_operands() {
    let err = analyze("int main() { int x = 1 + \"two\"; return x; }").unwrap_err();
    assert_eq!(
        err,
        SemanticError::BadOperands {
            op: BinaryOp::Add,
            left: Type::Int,
            right: Type::String,
        }
    );
}

#[test]
fn test_unused_variable_warns_at_scope_close() {
    let validated = analyze("int main() { int x = 1; int y = 2; return x; }").unwrap();
    assert_eq!(
        validated.warnings,
        vec![Warning::UnusedVariable("y".into())]
    );
}

#[test]
fn test_write_only_variable_counts_as_used() {
    let validated = analyze("int main() { int x = 1; x = 2; return 0; }").unwrap();
    assert!(validated.warnings.is_empty());
}

#[test]
fn test_inner_scope_warns_before_outer() {
    let src = "int main() { int a = 1; if (a == 1) { int b = 2; } return a; }";
    let validated = analyze(src).unwrap();
    assert_eq!(
        validated.warnings,
        vec![Warning::UnusedVariable("b".into())]
    );
}

#[test]
fn test_assigning_to_a_function_name() {
    let err = analyze("int main() { printf = 1; return 0; }").unwrap_err();
    assert_eq!(err, SemanticError::NotAVariable("printf".into()));
}

#[test]
fn test_function_redefinition() {
    let err = analyze("int main() { return 0; } int main() { return 1; }").unwrap_err();
    assert_eq!(err, SemanticError::Redeclared("main".into()));
}

#[test]
fn test_void_function_returning_a_value() {
    let err = analyze("void f() { return 1; }").unwrap_err();
    assert_eq!(
        err,
        SemanticError::ReturnMismatch {
            function: "f".into(),
            expected: Type::Void,
            found: Type::Int,
        }
    );
}

#[test]
fn test_valueless_return_in_int_function() {
    let err = analyze("int main() { return; }").unwrap_err();
    assert_eq!(
        err,
        SemanticError::MissingReturnValue {
            function: "main".into(),
            expected: Type::Int,
        }
    );
}

#[test]
fn test_for_counter_spans_header_and_body() {
    let src = "int main() { int s = 0; for (int i = 0; i < 3; i++) { s = s + i; } return s; }";
    let validated = analyze(src).unwrap();
    assert!(validated.warnings.is_empty());
}

#[test]
fn test_do_while_condition_sees_outer_assignments_only() {
    // The body's own declarations close before the condition is typed.
    let src = "int main() { do { int t = 1; } while (t == 1); return 0; }";
    let err = analyze(src).unwrap_err();
    assert_eq!(err, SemanticError::Undeclared("t".into()));
}

#[test]
fn test_logical_operators_combine_bools() {
    // The grammar never builds these, but the typing rules still cover
    // trees that carry them.
    let condition = Exp::binary(
        BinaryOp::LogicalAnd,
        Exp::binary(BinaryOp::LessThan, Exp::int(1), Exp::int(2)),
        Exp::binary(BinaryOp::IsEqual, Exp::int(3), Exp::int(3)),
    );
    let ast = Ast {
        functions: vec![FunctionDefinition {
            name: "main".into(),
            return_type: Type::Int,
            body: Block {
                statements: vec![
                    Statement::If(If {
                        condition,
                        then: Block {
                            statements: vec![Statement::Return(Some(Exp::int(1)))],
                        },
                        els: None,
                    }),
                    Statement::Return(Some(Exp::int(0))),
                ],
            },
        }],
    };
    assert!(validate(ast).is_ok());
}

#[test]
fn test_logical_operators_reject_ints() {
    let condition = Exp::binary(BinaryOp::LogicalOr, Exp::int(1), Exp::int(0));
    let ast = Ast {
        functions: vec![FunctionDefinition {
            name: "main".into(),
            return_type: Type::Int,
            body: Block {
                statements: vec![
                    Statement::If(If {
                        condition,
                        then: Block { statements: vec![] },
                        els: None,
                    }),
                    Statement::Return(Some(Exp::int(0))),
                ],
            },
        }],
    };
    assert_eq!(
        validate(ast).unwrap_err(),
        SemanticError::BadOperands {
            op: BinaryOp::LogicalOr,
            left: Type::Int,
            right: Type::Int,
        }
    );
}

#[test]
fn test_printf_call_is_accepted() {
    let validated = analyze("int main() { printf(\"ok\"); return 0; }").unwrap();
    assert!(validated.warnings.is_empty());
}
