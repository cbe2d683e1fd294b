//! The harvest patch population model.
//!
//! A [`HarvestNode`] keeps a bounded pool of plants around an origin. Picking
//! the last plant starts a one-shot regrowth timer; when it fires the patch
//! grows by one if it was picked lightly, or shrinks by one if it was
//! overharvested, and then repopulates.
//!
//! The node never reaches for globals. The world it spawns into and the
//! inventory it reports to are passed into each call, so it runs the same
//! under Bevy `Commands` as under a plain test double.

use std::fmt::Debug;
use std::time::Duration;

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::collider::ColliderShape;
use super::error::HarvestError;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// COLLABORATORS
// ═══════════════════════════════════════════════════════════════════════

/// Where plant instances physically live.
pub trait PlantWorld {
    type Instance: Copy + Eq + Debug;

    /// Create a visible plant at `position` and hand back its id.
    fn materialize(&mut self, template: &PlantTemplate, position: Vec3) -> Self::Instance;

    /// Full visual extents of a materialised plant, if known.
    fn bounds(&self, instance: Self::Instance) -> Option<Vec3>;

    fn attach_collider(&mut self, instance: Self::Instance, shape: ColliderShape);

    fn destroy(&mut self, instance: Self::Instance);
}

/// Receives the items a patch hands out.
pub trait HarvestSink {
    fn item_acquired(&mut self, pickup: ItemPickupEvent);
}

impl HarvestSink for Events<ItemPickupEvent> {
    fn item_acquired(&mut self, pickup: ItemPickupEvent) {
        self.send(pickup);
    }
}

impl HarvestSink for Vec<ItemPickupEvent> {
    fn item_acquired(&mut self, pickup: ItemPickupEvent) {
        self.push(pickup);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CONFIG & REPORTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct HarvestNodeConfig {
    pub origin: Vec3,
    pub spawn_radius: f32,
    pub initial_capacity: u32,
    pub overharvest_threshold: u32,
    pub regrowth_delay: Duration,
    pub template: Option<PlantTemplate>,
    /// Fixed seed for plant placement. `None` = seeded from entropy.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchState {
    Populated,
    Regrowing,
    /// Empty with no regrowth pending: the last spawn failed or the node was
    /// torn down. Only a successful spawn leaves it.
    Dormant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectOutcome {
    Collected {
        remaining: usize,
        regrowth_started: bool,
    },
    /// The instance was not in the pool; nothing changed.
    Stale,
}

/// What happened when a regrowth timer fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegrowthReport {
    pub previous_capacity: u32,
    pub capacity: u32,
    /// Plants picked in the cycle that just ended.
    pub harvested: u32,
    pub overharvested: bool,
    /// False if the repopulating spawn failed.
    pub respawned: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeStats {
    pub total_harvested: u32,
    pub cycles_completed: u32,
    pub overharvested_cycles: u32,
}

/// Capacity for the next cycle.
pub fn next_capacity(current: u32, overharvested: bool) -> u32 {
    let current = current.clamp(MIN_PATCH_CAPACITY, MAX_PATCH_CAPACITY);
    if overharvested {
        current.saturating_sub(1).max(MIN_PATCH_CAPACITY)
    } else {
        (current + 1).min(MAX_PATCH_CAPACITY)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// NODE
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct HarvestNode<I> {
    origin: Vec3,
    spawn_radius: f32,
    capacity: u32,
    overharvest_threshold: u32,
    regrowth_delay: Duration,
    template: Option<PlantTemplate>,
    pool: Vec<I>,
    harvested_this_cycle: u32,
    /// `Some` while regrowing. Owned here so dropping the node cancels it.
    regrowth: Option<Timer>,
    dormant: bool,
    rng: StdRng,
    stats: NodeStats,
}

impl<I: Copy + Eq + Debug> HarvestNode<I> {
    /// Build a node and immediately spawn its initial population.
    ///
    /// A missing template is logged and leaves the node [`PatchState::Dormant`].
    pub fn initialize<W>(config: HarvestNodeConfig, world: &mut W) -> Self
    where
        W: PlantWorld<Instance = I>,
    {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut node = Self {
            origin: config.origin,
            spawn_radius: config.spawn_radius.max(0.0),
            capacity: config
                .initial_capacity
                .clamp(MIN_PATCH_CAPACITY, MAX_PATCH_CAPACITY),
            overharvest_threshold: config.overharvest_threshold,
            regrowth_delay: config.regrowth_delay,
            template: config.template,
            pool: Vec::with_capacity(MAX_PATCH_CAPACITY as usize),
            harvested_this_cycle: 0,
            regrowth: None,
            dormant: false,
            rng,
            stats: NodeStats::default(),
        };

        if let Err(err) = node.spawn(node.capacity, world) {
            error!("[Harvest] Patch at {:?} failed to spawn: {}", node.origin, err);
            node.dormant = true;
        }
        node
    }

    /// Replace the pool with `count` fresh plants, clamped to
    /// `[MIN_PATCH_CAPACITY, capacity]` so a spawned patch is never empty.
    ///
    /// Fails without touching the node if there is no template to spawn from.
    pub fn spawn<W>(&mut self, count: u32, world: &mut W) -> Result<(), HarvestError>
    where
        W: PlantWorld<Instance = I>,
    {
        let template = self.template.clone().ok_or(HarvestError::MissingTemplate)?;

        for instance in self.pool.drain(..) {
            world.destroy(instance);
        }

        for _ in 0..count.clamp(MIN_PATCH_CAPACITY, self.capacity) {
            let position = self.sample_position();
            let instance = world.materialize(&template, position);
            let shape = ColliderShape::from_bounds(world.bounds(instance));
            world.attach_collider(instance, shape);
            self.pool.push(instance);
        }

        self.harvested_this_cycle = 0;
        self.regrowth = None;
        self.dormant = false;
        Ok(())
    }

    /// Pick one plant from the patch.
    pub fn collect<W>(
        &mut self,
        instance: I,
        world: &mut W,
        sink: Option<&mut dyn HarvestSink>,
    ) -> CollectOutcome
    where
        W: PlantWorld<Instance = I>,
    {
        let Some(index) = self.pool.iter().position(|&live| live == instance) else {
            warn!(
                "[Harvest] Ignoring collect of {:?}: not a live plant in patch at {:?}",
                instance, self.origin
            );
            return CollectOutcome::Stale;
        };

        self.pool.swap_remove(index);
        world.destroy(instance);
        self.harvested_this_cycle += 1;
        self.stats.total_harvested += 1;

        match (sink, self.template.as_ref()) {
            (Some(sink), Some(template)) => sink.item_acquired(template.pickup_event()),
            (None, _) => warn!("[Harvest] No inventory to receive harvest; pickup dropped"),
            (_, None) => warn!("[Harvest] Patch lost its template; nothing to hand out"),
        }

        let regrowth_started = self.pool.is_empty() && self.begin_regrowth();
        CollectOutcome::Collected {
            remaining: self.pool.len(),
            regrowth_started,
        }
    }

    /// Forget a plant that was removed by something other than this node.
    ///
    /// Does not count as a harvest and does not destroy anything. Returns
    /// false if the instance was not in the pool. Releasing the last plant
    /// starts regrowth like a final pick would.
    pub fn release(&mut self, instance: I) -> bool {
        let Some(index) = self.pool.iter().position(|&live| live == instance) else {
            return false;
        };
        self.pool.swap_remove(index);
        if self.pool.is_empty() {
            self.begin_regrowth();
        }
        true
    }

    /// Advance the regrowth timer. Returns a report on the frame it fires.
    pub fn tick<W>(&mut self, delta: Duration, world: &mut W) -> Option<RegrowthReport>
    where
        W: PlantWorld<Instance = I>,
    {
        let timer = self.regrowth.as_mut()?;
        timer.tick(delta);
        if !timer.finished() {
            return None;
        }
        Some(self.complete_regrowth(world))
    }

    /// Cancel any pending regrowth and destroy every live plant. The node is
    /// left [`PatchState::Dormant`].
    pub fn teardown<W>(&mut self, world: &mut W)
    where
        W: PlantWorld<Instance = I>,
    {
        self.regrowth = None;
        self.dormant = true;
        for instance in self.pool.drain(..) {
            world.destroy(instance);
        }
    }

    pub fn set_template(&mut self, template: Option<PlantTemplate>) {
        self.template = template;
    }

    fn begin_regrowth(&mut self) -> bool {
        if self.regrowth.is_some() {
            return false;
        }
        self.regrowth = Some(Timer::new(self.regrowth_delay, TimerMode::Once));
        info!(
            "[Harvest] Patch at {:?} depleted after {} picks; regrowing in {:.1}s",
            self.origin,
            self.harvested_this_cycle,
            self.regrowth_delay.as_secs_f32()
        );
        true
    }

    fn complete_regrowth<W>(&mut self, world: &mut W) -> RegrowthReport
    where
        W: PlantWorld<Instance = I>,
    {
        let previous_capacity = self.capacity;
        let harvested = self.harvested_this_cycle;
        let overharvested = harvested >= self.overharvest_threshold;

        self.capacity = next_capacity(previous_capacity, overharvested);
        self.stats.cycles_completed += 1;
        if overharvested {
            self.stats.overharvested_cycles += 1;
        }

        let respawned = match self.spawn(self.capacity, world) {
            Ok(()) => true,
            Err(err) => {
                error!("[Harvest] Patch at {:?} could not regrow: {}", self.origin, err);
                self.regrowth = None;
                self.dormant = true;
                false
            }
        };

        RegrowthReport {
            previous_capacity,
            capacity: self.capacity,
            harvested,
            overharvested,
            respawned,
        }
    }

    /// Uniform point in the disc of `spawn_radius` around the origin; depth
    /// stays at `origin.z`.
    fn sample_position(&mut self) -> Vec3 {
        let distance = self.spawn_radius * self.rng.gen::<f32>().sqrt();
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        self.origin + Vec3::new(distance * angle.cos(), distance * angle.sin(), 0.0)
    }

    // ─── accessors ──────────────────────────────────────────────────────

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn spawn_radius(&self) -> f32 {
        self.spawn_radius
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn overharvest_threshold(&self) -> u32 {
        self.overharvest_threshold
    }

    pub fn pool(&self) -> &[I] {
        &self.pool
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    pub fn contains(&self, instance: I) -> bool {
        self.pool.contains(&instance)
    }

    pub fn harvested_this_cycle(&self) -> u32 {
        self.harvested_this_cycle
    }

    pub fn is_regrowing(&self) -> bool {
        self.regrowth.is_some()
    }

    /// Time left before regrowth fires, if regrowing.
    pub fn regrowth_remaining(&self) -> Option<Duration> {
        self.regrowth.as_ref().map(Timer::remaining)
    }

    pub fn state(&self) -> PatchState {
        if self.regrowth.is_some() {
            PatchState::Regrowing
        } else if self.dormant {
            PatchState::Dormant
        } else {
            PatchState::Populated
        }
    }

    pub fn template(&self) -> Option<&PlantTemplate> {
        self.template.as_ref()
    }

    pub fn stats(&self) -> NodeStats {
        self.stats
    }
}
