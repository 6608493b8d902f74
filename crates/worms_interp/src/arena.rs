//! A reference implementation of [`World`] for tests and simple host
//! integrations.
//!
//! The arena keeps a flat entity table, performs actions with simple
//! planar physics, and records everything: every performed action lands
//! in a trace and every `print` line in a log buffer. Randomness is
//! seeded, so a program run against the same arena twice produces the
//! same trace.

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use worms_ast::ast::{ActionKind, EntityClass};

use crate::world::{ActionCall, ActionOutcome, EntityRef, World};

/// Angular tolerance for `searchObj`, in radians.
const SEARCH_TOLERANCE: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct ArenaEntity {
    pub class: EntityClass,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub dir: f64,
    pub hp: f64,
    pub ap: f64,
    pub team: u32,
    pub alive: bool,
}

pub struct ArenaWorld {
    entities: BTreeMap<u64, ArenaEntity>,
    me: EntityRef,
    next_id: u64,
    rng: StdRng,
    costs: BTreeMap<ActionKind, f64>,
    trace: Vec<(ActionCall, ActionOutcome)>,
    log: Vec<String>,
}

impl ArenaWorld {
    pub fn new(seed: u64) -> Self {
        let mut costs = BTreeMap::new();
        costs.insert(ActionKind::Turn, 1.0);
        costs.insert(ActionKind::Move, 1.0);
        costs.insert(ActionKind::Jump, 2.0);
        costs.insert(ActionKind::Fire, 4.0);
        costs.insert(ActionKind::Eat, 3.0);
        Self {
            entities: BTreeMap::new(),
            me: EntityRef(0),
            next_id: 1,
            rng: StdRng::seed_from_u64(seed),
            costs,
            trace: Vec::new(),
            log: Vec::new(),
        }
    }

    fn add(&mut self, entity: ArenaEntity) -> EntityRef {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.insert(id, entity);
        EntityRef(id)
    }

    /// Add a worm. The first worm added becomes the program's worm
    /// unless `set_me` says otherwise.
    pub fn add_worm(&mut self, x: f64, y: f64, team: u32) -> EntityRef {
        let r = self.add(ArenaEntity {
            class: EntityClass::Worm,
            x,
            y,
            radius: 1.0,
            dir: 0.0,
            hp: 10.0,
            ap: 0.0,
            team,
            alive: true,
        });
        if self.me == EntityRef(0) {
            self.me = r;
        }
        r
    }

    pub fn add_food(&mut self, x: f64, y: f64) -> EntityRef {
        self.add(ArenaEntity {
            class: EntityClass::Food,
            x,
            y,
            radius: 0.2,
            dir: 0.0,
            hp: 0.0,
            ap: 0.0,
            team: 0,
            alive: true,
        })
    }

    pub fn add_projectile(&mut self, x: f64, y: f64, dir: f64) -> EntityRef {
        self.add(ArenaEntity {
            class: EntityClass::Projectile,
            x,
            y,
            radius: 0.1,
            dir,
            hp: 0.0,
            ap: 0.0,
            team: 0,
            alive: true,
        })
    }

    pub fn set_me(&mut self, entity: EntityRef) {
        self.me = entity;
    }

    pub fn set_cost(&mut self, kind: ActionKind, cost: f64) {
        self.costs.insert(kind, cost);
    }

    /// Remove an entity outright, as if the game destroyed it.
    pub fn remove(&mut self, entity: EntityRef) {
        self.entities.remove(&entity.0);
    }

    pub fn entity(&self, entity: EntityRef) -> Option<&ArenaEntity> {
        self.entities.get(&entity.0)
    }

    pub fn entity_mut(&mut self, entity: EntityRef) -> Option<&mut ArenaEntity> {
        self.entities.get_mut(&entity.0)
    }

    /// Every performed action in order, with its outcome.
    pub fn trace(&self) -> &[(ActionCall, ActionOutcome)] {
        &self.trace
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    pub fn take_log(&mut self) -> Vec<String> {
        std::mem::take(&mut self.log)
    }

    fn me_entity(&self) -> Option<&ArenaEntity> {
        self.entities.get(&self.me.0)
    }

    fn matches(class: EntityClass, entity: &ArenaEntity) -> bool {
        class == EntityClass::Any || entity.class == class
    }

    fn advance_me(&mut self, distance: f64) {
        if let Some(me) = self.entities.get_mut(&self.me.0) {
            me.x += distance * me.dir.cos();
            me.y += distance * me.dir.sin();
        }
    }

    fn do_perform(&mut self, call: &ActionCall) -> ActionOutcome {
        match call.kind {
            ActionKind::Turn => {
                let delta = call.arg.unwrap_or(0.0);
                if let Some(me) = self.entities.get_mut(&self.me.0) {
                    me.dir = (me.dir + delta).rem_euclid(TAU);
                }
                ActionOutcome::Performed
            }
            ActionKind::Move => {
                let step = self.me_entity().map(|m| m.radius).unwrap_or(0.0);
                self.advance_me(step);
                ActionOutcome::Performed
            }
            ActionKind::Jump => {
                let step = self.me_entity().map(|m| 2.0 * m.radius).unwrap_or(0.0);
                self.advance_me(step);
                ActionOutcome::Performed
            }
            ActionKind::Fire => {
                let Some(me) = self.me_entity() else {
                    return ActionOutcome::Failed;
                };
                let (x, y, dir, r) = (me.x, me.y, me.dir, me.radius);
                self.add_projectile(x + r * dir.cos(), y + r * dir.sin(), dir);
                ActionOutcome::Performed
            }
            ActionKind::Eat => {
                let Some(me) = self.me_entity() else {
                    return ActionOutcome::Failed;
                };
                let (mx, my, mr) = (me.x, me.y, me.radius);
                let found = self
                    .entities
                    .iter()
                    .filter(|(_, e)| e.alive && e.class == EntityClass::Food)
                    .find(|(_, e)| {
                        let (dx, dy) = (e.x - mx, e.y - my);
                        (dx * dx + dy * dy).sqrt() <= mr + e.radius
                    })
                    .map(|(&id, _)| id);
                match found {
                    Some(id) => {
                        if let Some(food) = self.entities.get_mut(&id) {
                            food.alive = false;
                        }
                        if let Some(me) = self.entities.get_mut(&self.me.0) {
                            me.hp += 2.0;
                        }
                        ActionOutcome::Performed
                    }
                    None => ActionOutcome::Failed,
                }
            }
        }
    }
}

impl World for ArenaWorld {
    fn me(&self) -> EntityRef {
        self.me
    }

    fn position(&self, entity: EntityRef) -> Option<(f64, f64)> {
        self.entities.get(&entity.0).map(|e| (e.x, e.y))
    }

    fn radius(&self, entity: EntityRef) -> Option<f64> {
        self.entities.get(&entity.0).map(|e| e.radius)
    }

    fn orientation(&self, entity: EntityRef) -> Option<f64> {
        self.entities.get(&entity.0).map(|e| e.dir)
    }

    fn hit_points(&self, entity: EntityRef) -> Option<f64> {
        self.entities.get(&entity.0).map(|e| e.hp)
    }

    fn action_points(&self, entity: EntityRef) -> Option<f64> {
        self.entities.get(&entity.0).map(|e| e.ap)
    }

    fn same_team(&self, a: EntityRef, b: EntityRef) -> Option<bool> {
        let a = self.entities.get(&a.0)?;
        let b = self.entities.get(&b.0)?;
        Some(a.team == b.team)
    }

    fn living(&self, class: EntityClass) -> Vec<EntityRef> {
        self.entities
            .iter()
            .filter(|(_, e)| e.alive && Self::matches(class, e))
            .map(|(&id, _)| EntityRef(id))
            .collect()
    }

    fn search_object(&self, direction: f64) -> Option<EntityRef> {
        let me = self.me_entity()?;
        let (mx, my) = (me.x, me.y);
        self.entities
            .iter()
            .filter(|(&id, e)| id != self.me.0 && e.alive)
            .filter_map(|(&id, e)| {
                let (dx, dy) = (e.x - mx, e.y - my);
                let distance = (dx * dx + dy * dy).sqrt();
                if distance == 0.0 {
                    return None;
                }
                let bearing = dy.atan2(dx);
                let mut off = (bearing - direction).rem_euclid(TAU);
                if off > TAU / 2.0 {
                    off -= TAU;
                }
                (off.abs() <= SEARCH_TOLERANCE).then_some((id, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| EntityRef(id))
    }

    fn random_in_range(&mut self, lo: f64, hi: f64) -> f64 {
        if lo < hi {
            self.rng.random_range(lo..hi)
        } else {
            lo
        }
    }

    fn cost_of(&self, call: &ActionCall) -> f64 {
        self.costs.get(&call.kind).copied().unwrap_or(0.0)
    }

    fn perform(&mut self, call: &ActionCall) -> ActionOutcome {
        let cost = self.cost_of(call);
        let outcome = self.do_perform(call);
        if let Some(me) = self.entities.get_mut(&self.me.0) {
            me.ap = (me.ap - cost).max(0.0);
        }
        self.trace.push((*call, outcome));
        outcome
    }

    fn log(&mut self, line: String) {
        self.log.push(line);
    }
}
