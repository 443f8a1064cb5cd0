//! Cross-cutting parser edge cases and end-to-end scenarios.

use cic_util::Symbol;

use crate::ast::{BinaryOp, Expr, PostfixOp, Program, Stmt, TypeDecl};
use crate::parse;

fn sym(s: &str) -> Symbol {
    Symbol::intern(s)
}

fn parse_ok(source: &str) -> Program {
    let mut program = Program::new();
    parse(&mut program, "test.ci", source).expect("expected program to parse");
    program
}

fn parse_err(source: &str) -> cic_util::ParseError {
    let mut program = Program::new();
    parse(&mut program, "test.ci", source).expect_err("expected program to be rejected")
}

fn class_method_body(program: &Program, class: &str, index: usize) -> Vec<Stmt> {
    match program.try_lookup(sym(class)) {
        Some(TypeDecl::Class(c)) => match c.methods[index].body.as_ref().unwrap() {
            Stmt::Block(b) => b.stmts.clone(),
            other => panic!("expected block body, got {:?}", other),
        },
        other => panic!("expected class, got {:?}", other),
    }
}

// =============================================================================
// LINE NUMBERS
// =============================================================================

#[test]
fn test_node_lines_match_first_token() {
    let source = "\
public class Calc {
\tint total;

\tpublic void Add(int amount) {
\t\ttotal = total
\t\t\t+ amount;
\t\tif (total < 0)
\t\t\ttotal = 0;
\t}
}";
    let program = parse_ok(source);
    let class = match program.try_lookup(sym("Calc")) {
        Some(TypeDecl::Class(c)) => c,
        other => panic!("expected class, got {:?}", other),
    };
    assert_eq!(class.line, 1);
    assert_eq!(class.fields[0].line, 2);

    let method = &class.methods[0];
    assert_eq!(method.line, 4);

    let body = match method.body.as_ref().unwrap() {
        Stmt::Block(b) => b,
        other => panic!("expected block, got {:?}", other),
    };
    assert_eq!(body.line, 4);

    // The assignment starts on line 5 even though it continues onto line 6.
    assert_eq!(body.stmts[0].line(), 5);
    match &body.stmts[0] {
        Stmt::Expr(Expr::Binary(b)) => {
            assert_eq!(b.line, 5);
            // The nested addition's first token is `total` on line 5.
            assert_eq!(b.right.line(), 5);
        }
        other => panic!("expected assignment, got {:?}", other),
    }

    assert_eq!(body.stmts[1].line(), 7);
    match &body.stmts[1] {
        Stmt::If(i) => assert_eq!(i.on_true.line(), 8),
        other => panic!("expected if, got {:?}", other),
    }
}

#[test]
fn test_error_line_is_token_line() {
    let err = parse_err("class C {\n\tint x;\n\tpublic int y;\n}");
    assert_eq!(err.line, 3);
    assert_eq!(err.message, "Field cannot be public");
}

// =============================================================================
// INCREMENT RESTRICTION IN CONTEXT
// =============================================================================

#[test]
fn test_for_advance_is_not_a_restricted_context() {
    let program = parse_ok("class L { void M() { for (int i = 0; i < 10; i++) { } } }");
    let body = class_method_body(&program, "L", 0);
    match &body[0] {
        Stmt::For(f) => {
            assert!(matches!(f.init.as_ref().unwrap(), Expr::Var(v) if v.value.is_some()));
            assert!(matches!(f.cond.as_ref().unwrap(), Expr::Binary(b) if b.op == BinaryOp::Less));
            assert!(
                matches!(f.advance.as_ref().unwrap(), Expr::Postfix(p) if p.op == PostfixOp::Increment)
            );
            assert!(matches!(&*f.body, Stmt::Block(b) if b.stmts.is_empty()));
        }
        other => panic!("expected for, got {:?}", other),
    }
}

#[test]
fn test_xcrement_rejected_inside_method() {
    let err = parse_err("class C { void M() { if (a && ++b) { } } }");
    assert!(
        err.message.contains("++") && err.message.contains("&&"),
        "{}",
        err.message
    );
}

// =============================================================================
// CONTROL-FLOW SCOPING
// =============================================================================

#[test]
fn test_break_at_file_scope() {
    assert_eq!(parse_err("break;").message, "Expected class or enum");
}

#[test]
fn test_break_in_method_outside_loop() {
    assert_eq!(
        parse_err("class C { void M() { break; } }").message,
        "Break outside loop or switch"
    );
}

#[test]
fn test_continue_in_method_outside_loop() {
    assert_eq!(
        parse_err("class C { void M() { continue; } }").message,
        "Continue outside loop"
    );
}

// =============================================================================
// GENERIC ARITY IN DECLARATIONS
// =============================================================================

#[test]
fn test_generic_field_declarations() {
    let program = parse_ok(
        "class C {\n\
         \tList<int> numbers;\n\
         \tDictionary<string, int> ages;\n\
         \tList<List<int>> matrix;\n\
         }",
    );
    let class = match program.try_lookup(sym("C")) {
        Some(TypeDecl::Class(c)) => c,
        other => panic!("expected class, got {:?}", other),
    };
    assert_eq!(class.fields.len(), 3);

    match &class.fields[2].type_expr {
        Expr::Symbol(outer) => {
            assert_eq!(outer.name, sym("List"));
            match &outer.type_args[0] {
                Expr::Symbol(inner) => {
                    assert_eq!(inner.name, sym("List"));
                    assert_eq!(inner.type_args.len(), 1);
                }
                other => panic!("expected nested generic, got {:?}", other),
            }
        }
        other => panic!("expected generic type, got {:?}", other),
    }
}

#[test]
fn test_generic_arity_in_declaration() {
    assert_eq!(
        parse_err("class C { List<int, int> xs; }").message,
        "Expected 1 type argument(s) for 'List'"
    );
    assert_eq!(
        parse_err("class C { Dictionary<int> m; }").message,
        "Expected 2 type argument(s) for 'Dictionary'"
    );
}

#[test]
fn test_generic_initializer_with_construction() {
    let program = parse_ok("class C { void M() { List<int> xs = new List<int>(); } }");
    let body = class_method_body(&program, "C", 0);
    match &body[0] {
        Stmt::Expr(Expr::Var(v)) => {
            assert!(matches!(v.value.as_deref(), Some(Expr::Prefix(_))));
        }
        other => panic!("expected var, got {:?}", other),
    }
}

// =============================================================================
// INTERPOLATED STRINGS IN STATEMENTS
// =============================================================================

#[test]
fn test_interpolated_string_in_method() {
    let program = parse_ok("class C { string M() { return $\"n={n,4:x2}!\"; } }");
    let body = class_method_body(&program, "C", 0);
    match &body[0] {
        Stmt::Return(r) => match r.value.as_ref().unwrap() {
            Expr::Interpolated(e) => {
                assert_eq!(e.parts.len(), 1);
                assert_eq!(e.parts[0].prefix, sym("n="));
                assert!(e.parts[0].width.is_some());
                assert_eq!(e.parts[0].format, Some('x'));
                assert_eq!(e.parts[0].precision, Some(2));
                assert_eq!(e.suffix, sym("!"));
            }
            other => panic!("expected interpolated string, got {:?}", other),
        },
        other => panic!("expected return, got {:?}", other),
    }
}

// =============================================================================
// NATIVE CAPTURE
// =============================================================================

#[test]
fn test_native_capture_exact_text() {
    let program = parse_ok("native { {} { \"}\" } }");
    assert_eq!(program.top_level_natives.len(), 1);
    assert_eq!(program.top_level_natives[0], " {} { \"}\" } ");
}

#[test]
fn test_native_capture_multiline() {
    let program = parse_ok("native {\n#define N 1\nint helper(void) { return N; }\n}");
    assert_eq!(
        program.top_level_natives[0],
        "\n#define N 1\nint helper(void) { return N; }\n"
    );
}

#[test]
fn test_native_brace_in_string_does_not_close() {
    let program = parse_ok("class C { void M() { native { puts(\"}\"); } } }");
    let body = class_method_body(&program, "C", 0);
    match &body[0] {
        Stmt::Native(n) => assert_eq!(n.content, " puts(\"}\"); "),
        other => panic!("expected native, got {:?}", other),
    }
}

#[test]
fn test_unterminated_top_level_native() {
    let err = parse_err("native { {}");
    assert_eq!(err.message, "Native block not terminated");
}

// =============================================================================
// WHOLE-PROGRAM SCENARIOS
// =============================================================================

#[test]
fn test_mixed_program() {
    let source = "\
/// Hues.
public enum Color {
\tRed,
\tGreen,
\tBlue
}

native { static int calls = 0; }

public abstract class Shape {
\tprotected double scale = 1;
\tpublic abstract double Area();
\tpublic void Rescale!(double factor) { scale *= factor; }
}

public sealed class Circle : Shape {
\tdouble radius;
\tpublic override double Area() => radius * radius * 3;
}";
    let program = parse_ok(source);
    assert_eq!(program.top_level_natives.len(), 1);

    match program.try_lookup(sym("Color")) {
        Some(TypeDecl::Enum(e)) => {
            assert_eq!(e.doc, Some(sym("Hues.")));
            assert_eq!(e.constants.len(), 3);
        }
        other => panic!("expected enum, got {:?}", other),
    }

    match program.try_lookup(sym("Circle")) {
        Some(TypeDecl::Class(c)) => {
            assert_eq!(c.base_class, Some(sym("Shape")));
            let area = &c.methods[0];
            assert!(matches!(area.body.as_ref().unwrap(), Stmt::Return(_)));
        }
        other => panic!("expected class, got {:?}", other),
    }

    match program.try_lookup(sym("Shape")) {
        Some(TypeDecl::Class(c)) => {
            assert!(c.methods.iter().any(|m| m.is_mutator));
        }
        other => panic!("expected class, got {:?}", other),
    }
}

#[test]
fn test_switch_and_foreach_program() {
    let source = "\
class Counter {
\tint Tally(Dictionary<string, int> votes) {
\t\tint total = 0;
\t\tforeach ((string name, int count) in votes) {
\t\t\tswitch (count) {
\t\t\tcase 0:
\t\t\t\tcontinue;
\t\t\tcase 1:
\t\t\tcase 2:
\t\t\t\ttotal += count;
\t\t\tdefault:
\t\t\t\ttotal += count * 2;
\t\t\t}
\t\t}
\t\treturn total;
\t}
}";
    let program = parse_ok(source);
    let body = class_method_body(&program, "Counter", 0);
    assert_eq!(body.len(), 3);
    match &body[1] {
        Stmt::Foreach(f) => {
            assert_eq!(f.vars.len(), 2);
            let block = match &*f.body {
                Stmt::Block(b) => b.clone(),
                other => panic!("expected block, got {:?}", other),
            };
            match &block.stmts[0] {
                Stmt::Switch(s) => {
                    assert_eq!(s.cases.len(), 2);
                    assert_eq!(s.cases[1].values.len(), 2);
                    assert!(s.default_body.is_some());
                    match &s.cases[0].body[0] {
                        Stmt::Continue(c) => assert_eq!(c.target, f.id),
                        other => panic!("expected continue, got {:?}", other),
                    }
                }
                other => panic!("expected switch, got {:?}", other),
            }
        }
        other => panic!("expected foreach, got {:?}", other),
    }
}
