//! Language semantics run against the reference arena.

use std::sync::Arc;

use worms_ast::ast::ActionKind;
use worms_interp::arena::ArenaWorld;
use worms_interp::{compile, ExecutionContext, Fault, Outcome, World};

fn context(source: &str) -> ExecutionContext {
    let typed = match compile(source) {
        Ok(t) => t,
        Err(e) => panic!("compile error: {}", e),
    };
    ExecutionContext::new(Arc::new(typed))
}

fn run(source: &str, world: &mut ArenaWorld) -> Outcome {
    let mut ctx = context(source);
    let mut outcome = ctx.resume(world, 100.0);
    // Drive skips through; a real host would space these over turns.
    let mut turns = 0;
    while outcome == Outcome::Suspended {
        turns += 1;
        assert!(turns < 100, "program did not settle");
        outcome = ctx.resume(world, 100.0);
    }
    outcome
}

fn solo_arena() -> ArenaWorld {
    let mut world = ArenaWorld::new(7);
    world.add_worm(0.0, 0.0, 1);
    world
}

fn crash(source: &str, world: &mut ArenaWorld) -> Fault {
    match run(source, world) {
        Outcome::Crashed(fault) => fault,
        other => panic!("expected a crash, got {:?}", other),
    }
}

#[test]
fn print_formats_values() {
    let mut world = solo_arena();
    let outcome = run(
        "print(1.5); print(2.0); print(true); print(!false); print(null);",
        &mut world,
    );
    assert_eq!(outcome, Outcome::Finished);
    assert_eq!(world.log_lines(), ["1.5", "2.0", "true", "true", "null"]);
}

#[test]
fn arithmetic_and_comparison() {
    let mut world = solo_arena();
    run(
        "x := (1.0 + 2.0) * 4.0 / 2.0 - 1.0; print(x); print(x <= 5.0); print(x == 5.0);",
        &mut world,
    );
    assert_eq!(world.log_lines(), ["5.0", "true", "true"]);
}

#[test]
fn branches_pick_the_right_arm() {
    let mut world = solo_arena();
    run(
        "x := 2.0; if (x > 1.0) print(true); else print(false); \
         if (x > 3.0) print(1.0); else print(0.0);",
        &mut world,
    );
    assert_eq!(world.log_lines(), ["true", "0.0"]);
}

#[test]
fn while_loop_counts() {
    let mut world = solo_arena();
    run(
        "n := 0.0; while (n < 4.0) n := n + 1.0; print(n);",
        &mut world,
    );
    assert_eq!(world.log_lines(), ["4.0"]);
}

#[test]
fn procedures_run_in_call_order() {
    let mut world = solo_arena();
    run(
        "proc step { move(); } proc dance { turn(1.0); step(); } dance(); step();",
        &mut world,
    );
    let kinds: Vec<_> = world.trace().iter().map(|(c, _)| c.kind).collect();
    assert_eq!(
        kinds,
        vec![ActionKind::Turn, ActionKind::Move, ActionKind::Move]
    );
}

#[test]
fn short_circuit_skips_the_right_operand() {
    let mut world = solo_arena();
    let outcome = run(
        "b := true || 1.0 / 0.0 > 0.0; c := false && 1.0 / 0.0 > 0.0; print(b); print(c);",
        &mut world,
    );
    assert_eq!(outcome, Outcome::Finished);
    assert_eq!(world.log_lines(), ["true", "false"]);
}

#[test]
fn foreach_iterates_a_snapshot_taken_at_entry() {
    let mut world = solo_arena();
    // Each fire spawns a projectile, but the loop only visits the
    // single entity that existed when it started.
    run(
        "n := 0.0; foreach (any, e) { fire(1.0); n := n + 1.0; } print(n);",
        &mut world,
    );
    assert_eq!(world.log_lines(), ["1.0"]);
}

#[test]
fn foreach_variable_shadows_and_restores_an_entity_global() {
    let mut world = solo_arena();
    run(
        "e := null; foreach (worm, e) print(e == null); print(e == null);",
        &mut world,
    );
    // Bound inside the loop, back to the null global after.
    assert_eq!(world.log_lines(), ["false", "true"]);
}

#[test]
fn foreach_filters_by_class() {
    let mut world = solo_arena();
    world.add_food(3.0, 0.0);
    world.add_food(4.0, 0.0);
    run(
        "n := 0.0; foreach (food, f) n := n + 1.0; \
         w := 0.0; foreach (worm, x) w := w + 1.0; \
         print(n); print(w);",
        &mut world,
    );
    assert_eq!(world.log_lines(), ["2.0", "1.0"]);
}

#[test]
fn queries_read_world_state() {
    let mut world = ArenaWorld::new(7);
    let me = world.add_worm(2.0, 3.0, 1);
    let friend = world.add_worm(10.0, 10.0, 1);
    let enemy = world.add_worm(-10.0, 10.0, 2);
    world.set_me(me);
    if let Some(e) = world.entity_mut(friend) {
        e.hp = 6.0;
    }
    let _ = enemy;
    run(
        "print(getX(self)); print(getY(self)); print(getRadius(self)); print(getDir(self)); \
         allies := 0.0; foreach (worm, w) if (sameTeam(self, w)) allies := allies + 1.0; \
         print(allies);",
        &mut world,
    );
    assert_eq!(world.log_lines(), ["2.0", "3.0", "1.0", "0.0", "2.0"]);
}

#[test]
fn search_object_finds_the_nearest_along_a_direction() {
    let mut world = solo_arena();
    world.add_food(5.0, 0.0);
    world.add_food(9.0, 0.0);
    run(
        "e := searchObj(0.0); print(e == null); print(getX(e)); \
         miss := searchObj(3.0); print(miss == null);",
        &mut world,
    );
    assert_eq!(world.log_lines(), ["false", "5.0", "true"]);
}

#[test]
fn moving_updates_the_world() {
    let mut world = solo_arena();
    let me = world.me();
    run("move(); move(); jump();", &mut world);
    let e = world.entity(me).unwrap();
    // Two radius-1 steps plus one 2-radius jump, facing east.
    assert!((e.x - 4.0).abs() < 1e-9);
    assert!(e.y.abs() < 1e-9);
}

#[test]
fn eating_consumes_food_and_heals() {
    let mut world = solo_arena();
    let food = world.add_food(0.5, 0.0);
    let me = world.me();
    run("eat();", &mut world);
    assert!(!world.entity(food).unwrap().alive);
    assert_eq!(world.entity(me).unwrap().hp, 12.0);
}

#[test]
fn team_branching_fires_at_enemies_only() {
    let mut world = ArenaWorld::new(7);
    let me = world.add_worm(0.0, 0.0, 1);
    world.add_worm(5.0, 0.0, 1);
    world.add_worm(-5.0, 0.0, 2);
    world.set_me(me);
    run(
        "foreach (worm, w) { if (!sameTeam(self, w)) fire(10.0); }",
        &mut world,
    );
    let kinds: Vec<_> = world.trace().iter().map(|(c, _)| c.kind).collect();
    assert_eq!(kinds, vec![ActionKind::Fire]);
}

#[test]
fn random_is_deterministic_per_seed() {
    let source = "x := random(0.0, 10.0); y := random(0.0, 10.0); print(x); print(y); \
                  if (x < 5.0) turn(1.0); else turn(-1.0);";
    let mut first = solo_arena();
    run(source, &mut first);
    let mut second = solo_arena();
    run(source, &mut second);
    assert_eq!(first.log_lines(), second.log_lines());
    assert_eq!(first.trace(), second.trace());
}

// ── Faults ──────────────────────────────────────────────────────

#[test]
fn division_by_zero_crashes() {
    let mut world = solo_arena();
    let fault = crash("x := 1.0 / 0.0;", &mut world);
    assert!(matches!(fault, Fault::DivisionByZero { .. }));
}

#[test]
fn nan_comparison_crashes() {
    let mut world = solo_arena();
    // Square up to infinity, then infinity - infinity is NaN; ordering
    // against NaN is a fault, not a silent false.
    let fault = crash(
        "x := 10.0; n := 0.0; \
         while (n < 11.0) { x := x * x; n := n + 1.0; } \
         y := x - x; b := y < 0.0;",
        &mut world,
    );
    assert!(matches!(fault, Fault::NanComparison { .. }));
}

#[test]
fn faults_carry_the_offending_span() {
    let mut world = solo_arena();
    let source = "x := 2.0 / 0.0;";
    let fault = crash(source, &mut world);
    let span = fault.span().unwrap();
    assert_eq!(&source[span.start..span.end], "2.0 / 0.0");
}

#[test]
fn reading_a_variable_before_its_assignment_runs_crashes() {
    let mut world = solo_arena();
    // Statically fine: the assignment comes first in source order.
    let fault = crash("if (false) x := 1.0; print(x);", &mut world);
    assert!(matches!(fault, Fault::UnassignedVariable { ref name, .. } if name == "x"));
}

#[test]
fn null_entity_query_crashes() {
    let mut world = solo_arena();
    let fault = crash("x := getX(null);", &mut world);
    assert!(matches!(fault, Fault::NullEntity { .. }));
}

#[test]
fn unbounded_recursion_crashes_instead_of_overflowing() {
    let mut world = solo_arena();
    let fault = crash("proc spin { spin(); } spin();", &mut world);
    assert!(matches!(fault, Fault::CallDepthExceeded { .. }));
}

#[test]
fn busy_loop_hits_the_step_limit() {
    let mut world = solo_arena();
    let fault = crash("while (true) x := 1.0;", &mut world);
    assert_eq!(fault, Fault::StepLimitExceeded);
}

#[test]
fn stale_entity_reference_crashes_after_the_world_moves_on() {
    let mut world = solo_arena();
    let food = world.add_food(5.0, 0.0);
    let mut ctx = context("e := searchObj(0.0); skip; print(getX(e));");
    assert_eq!(ctx.resume(&mut world, 10.0), Outcome::Suspended);
    world.remove(food);
    let outcome = ctx.resume(&mut world, 10.0);
    assert!(matches!(
        outcome,
        Outcome::Crashed(Fault::VanishedEntity { .. })
    ));
}
