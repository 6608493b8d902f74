//! Type checker tests over parsed source.

use worms_checker::ty::Ty;
use worms_checker::{check, check_into};

fn parse(source: &str) -> worms_ast::ast::Program {
    match worms_parser::parse(source) {
        Ok(p) => p,
        Err(e) => panic!("parse error: {}", e.message),
    }
}

fn check_ok(source: &str) -> worms_checker::CheckResult {
    let result = check(&parse(source));
    assert!(
        result.is_ok(),
        "unexpected diagnostics: {:?}",
        result.diagnostics
    );
    result
}

fn first_error(source: &str) -> worms_ast::diagnostic::Diagnostic {
    let result = check(&parse(source));
    assert!(!result.is_ok(), "expected a type error for {:?}", source);
    result.diagnostics[0].clone()
}

#[test]
fn globals_are_inferred_from_first_assignment() {
    let result = check_ok("x := 3.0; b := x < 4.0; e := self;");
    assert_eq!(result.globals.get("x"), Some(&Ty::Double));
    assert_eq!(result.globals.get("b"), Some(&Ty::Bool));
    assert_eq!(result.globals.get("e"), Some(&Ty::Entity));
}

#[test]
fn reassignment_must_keep_the_inferred_type() {
    let err = first_error("x := 3.0; x := true;");
    assert!(err.message.contains("inferred as double"));
}

#[test]
fn entity_in_arithmetic_is_rejected_at_the_operand() {
    let source = "e := searchObj(0.0); d := e + 1.0;";
    let err = first_error(source);
    assert!(err.message.contains("must be double"));
    // The diagnostic points at the entity operand, not the whole program.
    assert_eq!(&source[err.span.start..err.span.end], "e");
}

#[test]
fn null_literal_is_an_entity() {
    check_ok("e := null; b := e == self;");
    let err = first_error("x := null + 1.0;");
    assert!(err.message.contains("must be double"));
}

#[test]
fn condition_must_be_bool() {
    let err = first_error("if (1.0) skip;");
    assert!(err.message.contains("if condition must be bool"));
    let err = first_error("while (self) skip;");
    assert!(err.message.contains("while condition must be bool"));
}

#[test]
fn equality_requires_matching_types() {
    check_ok("b := 1.0 == 2.0; c := true != false; d := self == null;");
    let err = first_error("b := 1.0 == true;");
    assert!(err.message.contains("same type"));
}

#[test]
fn logical_operators_take_bools() {
    let err = first_error("b := 1.0 && true;");
    assert!(err.message.contains("'&&' must be bool"));
}

#[test]
fn unary_operators() {
    check_ok("x := -(1.0 + 2.0); b := !(x < 0.0);");
    let err = first_error("b := !1.0;");
    assert!(err.message.contains("'!' must be bool"));
}

#[test]
fn foreach_variable_is_an_entity() {
    check_ok("foreach (worm, w) { if (sameTeam(self, w)) print(getHP(w)); }");
    let err = first_error("foreach (food, f) x := f + 1.0;");
    assert!(err.message.contains("must be double"));
}

#[test]
fn foreach_variable_may_not_shadow_a_double_global() {
    let err = first_error("x := 1.0; foreach (worm, x) skip;");
    assert!(err.message.contains("shadows a double global"));
}

#[test]
fn foreach_variable_does_not_leak() {
    let err = first_error("foreach (worm, w) skip; print(w);");
    assert!(err.message.contains("undeclared variable 'w'"));
}

#[test]
fn use_before_assignment_is_an_error() {
    let err = first_error("print(y);");
    assert!(err.message.contains("undeclared variable 'y'"));
}

#[test]
fn action_arguments_must_be_double() {
    check_ok("turn(0.5); fire(10.0);");
    let err = first_error("turn(true);");
    assert!(err.message.contains("argument of turn must be double"));
}

#[test]
fn query_signatures_are_enforced() {
    check_ok("d := getX(self); b := sameTeam(self, self); r := random(0.0, 1.0);");
    let err = first_error("d := getX(1.0);");
    assert!(err.message.contains("argument of getX must be entity"));
    let err = first_error("d := getX(self, self);");
    assert!(err.message.contains("takes 1 argument"));
    let err = first_error("d := teleport(1.0);");
    assert!(err.message.contains("unknown query 'teleport'"));
}

#[test]
fn calls_must_name_a_declared_procedure() {
    check_ok("proc step { move(); } step();");
    let err = first_error("step();");
    assert!(err.message.contains("undefined procedure 'step'"));
}

#[test]
fn procedures_share_the_global_scope() {
    // 'x' is first assigned inside the procedure, which comes first in
    // the source, so the later use in main agrees.
    check_ok("proc init { x := 0.0; } init(); x := x + 1.0;");
}

#[test]
fn inference_follows_source_order_across_procedures() {
    // The top-level assignment precedes the procedure, so it fixes the
    // type even though the procedure body never runs first.
    let source = "x := 1.0; proc flip { x := true; } flip();";
    let err = first_error(source);
    assert!(err.message.contains("inferred as double"));
    assert_eq!(&source[err.span.start..err.span.end], "true");

    // Flipped declaration order flips which assignment wins.
    let err = first_error("proc flip { x := true; } x := 1.0; flip();");
    assert!(err.message.contains("inferred as bool"));
}

#[test]
fn errors_do_not_cascade() {
    // One bad operand produces one diagnostic, not a chain of
    // follow-on complaints about the <error> type.
    let result = check(&parse("x := y + 1.0; z := x * 2.0;"));
    assert_eq!(result.diagnostics.len(), 1);
    assert!(result.diagnostics[0].message.contains("undeclared"));
}

#[test]
fn check_into_yields_a_typed_program() {
    let typed = check_into(parse("x := 1.0;")).unwrap_or_else(|e| panic!("{:?}", e));
    assert_eq!(typed.globals.get("x"), Some(&Ty::Double));
    assert!(check_into(parse("x := 1.0; x := true;")).is_err());
}
