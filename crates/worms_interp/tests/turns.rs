//! Turn budget semantics: suspension, carry-over, retry, and skip.

use std::sync::Arc;

use worms_ast::ast::ActionKind;
use worms_interp::arena::ArenaWorld;
use worms_interp::{compile, ExecutionContext, Outcome, Status};

fn context(source: &str) -> ExecutionContext {
    let typed = match compile(source) {
        Ok(t) => t,
        Err(e) => panic!("compile error: {}", e),
    };
    ExecutionContext::new(Arc::new(typed))
}

fn arena() -> ArenaWorld {
    let mut world = ArenaWorld::new(7);
    world.add_worm(0.0, 0.0, 1);
    world
}

fn kinds(world: &ArenaWorld) -> Vec<ActionKind> {
    world.trace().iter().map(|(call, _)| call.kind).collect()
}

#[test]
fn unaffordable_action_suspends_before_the_action() {
    let mut world = arena();
    let mut ctx = context("turn(1.0); move(); fire(10.0);");
    // turn and move cost 1 each; fire costs 4 and must wait.
    assert_eq!(ctx.resume(&mut world, 2.0), Outcome::Suspended);
    assert_eq!(kinds(&world), vec![ActionKind::Turn, ActionKind::Move]);
    assert_eq!(ctx.status(), Status::Suspended);
    assert_eq!(ctx.points(), 0.0);
}

#[test]
fn suspended_action_is_retried_not_skipped() {
    let mut world = arena();
    let mut ctx = context("fire(10.0);");
    assert_eq!(ctx.resume(&mut world, 3.0), Outcome::Suspended);
    assert!(world.trace().is_empty());
    // Budgets accumulate: 3 + 2 covers the cost of 4.
    assert_eq!(ctx.points(), 3.0);
    assert_eq!(ctx.resume(&mut world, 2.0), Outcome::Finished);
    assert_eq!(kinds(&world), vec![ActionKind::Fire]);
    assert_eq!(ctx.points(), 1.0);
}

#[test]
fn skip_forfeits_remaining_points() {
    let mut world = arena();
    let mut ctx = context("move(); skip; move();");
    assert_eq!(ctx.resume(&mut world, 5.0), Outcome::Suspended);
    assert_eq!(kinds(&world), vec![ActionKind::Move]);
    // skip threw away the 4 leftover points.
    assert_eq!(ctx.points(), 0.0);
    assert_eq!(ctx.resume(&mut world, 1.0), Outcome::Finished);
    assert_eq!(kinds(&world), vec![ActionKind::Move, ActionKind::Move]);
}

#[test]
fn loop_suspends_mid_iteration_and_picks_up_there() {
    let mut world = arena();
    let mut ctx = context("x := 0.0; while (x < 3.0) { x := x + 1.0; move(); }");
    assert_eq!(ctx.resume(&mut world, 2.0), Outcome::Suspended);
    assert_eq!(kinds(&world).len(), 2);
    assert_eq!(ctx.resume(&mut world, 2.0), Outcome::Finished);
    assert_eq!(kinds(&world).len(), 3);
}

#[test]
fn zero_cost_program_finishes_in_one_resume() {
    let mut world = arena();
    let mut ctx = context("x := 1.0; print(x + 1.0);");
    assert_eq!(ctx.resume(&mut world, 0.0), Outcome::Finished);
    assert_eq!(world.log_lines(), ["2.0"]);
}

#[test]
fn resuming_a_finished_context_stays_finished() {
    let mut world = arena();
    let mut ctx = context("move();");
    assert_eq!(ctx.resume(&mut world, 1.0), Outcome::Finished);
    assert_eq!(ctx.resume(&mut world, 10.0), Outcome::Finished);
    // No action ran twice.
    assert_eq!(kinds(&world), vec![ActionKind::Move]);
}

#[test]
fn resuming_a_crashed_context_reports_the_same_fault() {
    let mut world = arena();
    let mut ctx = context("x := 1.0 / 0.0;");
    let first = ctx.resume(&mut world, 0.0);
    assert!(matches!(first, Outcome::Crashed(_)));
    let second = ctx.resume(&mut world, 100.0);
    assert_eq!(first, second);
    assert_eq!(ctx.status(), Status::Crashed);
}

#[test]
fn scripted_costs_drive_the_turn_boundary() {
    // A host charging 10 per turn and 5 per move: a 12-point budget
    // covers the turn but not the first move, which waits for the next
    // grant and leaves the leftover 2 points in place.
    let mut world = arena();
    world.set_cost(ActionKind::Turn, 10.0);
    world.set_cost(ActionKind::Move, 5.0);
    let mut ctx = context("turn(1.5); move(); move();");
    assert_eq!(ctx.resume(&mut world, 12.0), Outcome::Suspended);
    assert_eq!(kinds(&world), vec![ActionKind::Turn]);
    assert_eq!(ctx.points(), 2.0);
    assert_eq!(ctx.resume(&mut world, 10.0), Outcome::Finished);
    assert_eq!(
        kinds(&world),
        vec![ActionKind::Turn, ActionKind::Move, ActionKind::Move]
    );
    assert_eq!(ctx.points(), 2.0);
}

#[test]
fn exact_budget_is_affordable() {
    let mut world = arena();
    let mut ctx = context("fire(10.0);");
    assert_eq!(ctx.resume(&mut world, 4.0), Outcome::Finished);
    assert_eq!(ctx.points(), 0.0);
}
