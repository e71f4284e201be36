//! Rail animation scheduler
//!
//! Moves the rail to the selected item with a two-phase animation:
//! - **Stretch**: the rail grows to span its old and new positions
//! - **Shrink**: the rail contracts to its resting size on the target
//!
//! The scheduler is a state machine driven by [`RailTask`]s. It never waits:
//! every continuation is handed to the [`Clock`] and comes back through
//! [`RailScheduler::tick`]. Selections that arrive while an animation is in
//! flight are coalesced into a single pending slot (latest wins) and run
//! after the current animation commits. A phase is never interrupted.

use crate::clock::{Clock, RailTask, TaskQueue};
use crate::config::RailConfig;
use crate::style::{RailStyle, StyleSink};
use crate::tween;
use rail_core::{Bounds, BoundingBox, GeometryProvider, ItemId, RailState, Result};
use std::time::Duration;

/// Visible animation phase of the rail
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum AnimationPhase {
    /// At rest (possibly still locating a target whose layout is pending)
    #[default]
    Idle,
    /// Stretch style emitted; waiting out the stretch duration
    Stretching {
        target: ItemId,
        /// Target geometry when the stretch began
        destination: BoundingBox,
    },
    /// Shrink style emitted; waiting out the shrink duration
    Shrinking {
        target: ItemId,
        /// State committed once the shrink completes
        rest: RailState,
    },
}

impl AnimationPhase {
    /// Item being animated toward, if any
    pub fn target(&self) -> Option<ItemId> {
        match *self {
            AnimationPhase::Idle => None,
            AnimationPhase::Stretching { target, .. }
            | AnimationPhase::Shrinking { target, .. } => Some(target),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, AnimationPhase::Idle)
    }
}

/// A selection waiting for its geometry to be laid out
#[derive(Clone, Copy, Debug, PartialEq)]
struct Locating {
    item: ItemId,
    /// "Not laid out" answers received so far
    attempts: u32,
}

/// Scheduler for one rail indicator
///
/// Owns the committed [`RailState`] and the [`AnimationPhase`]; nothing else
/// mutates them. Collaborators are owned too, so a sink or provider can never
/// re-enter [`select`](Self::select) in the middle of a tick. To request a
/// selection from inside the loop, queue [`RailTask::Select`] on the clock.
///
/// ```rust
/// use rail_animation::{RailConfig, RailScheduler, RecordingSink, TaskQueue};
/// use rail_core::{Axis, GeometryMap, ItemId};
///
/// let geometry = GeometryMap::row(Axis::Horizontal, 5, 24.0, 4.0);
/// let mut rail = RailScheduler::new(
///     RailConfig::default(),
///     geometry,
///     RecordingSink::new(),
///     TaskQueue::new(),
/// );
///
/// rail.select(ItemId(1));
/// rail.run_until_settled();
/// rail.select(ItemId(4));
/// rail.run_until_settled();
///
/// assert!(rail.is_settled());
/// assert_eq!(rail.rail_state().unwrap().position, 84.0);
/// ```
pub struct RailScheduler<G, S, C = TaskQueue> {
    config: RailConfig,
    geometry: G,
    sink: S,
    clock: C,
    /// `None` until the first selection has been placed
    rail: Option<RailState>,
    phase: AnimationPhase,
    pending: Option<ItemId>,
    locating: Option<Locating>,
}

impl<G, S, C> RailScheduler<G, S, C>
where
    G: GeometryProvider,
    S: StyleSink,
    C: Clock,
{
    pub fn new(config: RailConfig, geometry: G, sink: S, clock: C) -> Self {
        tracing::debug!(
            "RailScheduler: created (axis={}, diameter={})",
            config.axis.as_str(),
            config.diameter
        );
        Self {
            config,
            geometry,
            sink,
            clock,
            rail: None,
            phase: AnimationPhase::Idle,
            pending: None,
            locating: None,
        }
    }

    // =========================================================================
    // Public Operations
    // =========================================================================

    /// Move the rail to `item`
    ///
    /// The first selection places the rail directly with no animation. Later
    /// selections animate. While an animation is in flight the request only
    /// replaces the pending slot; the animation in flight is left alone.
    pub fn select(&mut self, item: ItemId) {
        if let Some(target) = self.phase.target() {
            match self.pending.replace(item) {
                Some(previous) => tracing::debug!(
                    "Rail: selection {} replaces pending {} (animating to {})",
                    item,
                    previous,
                    target
                ),
                None => tracing::debug!("Rail: selection {} queued behind {}", item, target),
            }
            return;
        }

        match self.locating.as_mut() {
            // Nothing has been emitted for the located item yet, so retarget
            Some(locating) => {
                tracing::debug!("Rail: retargeting {} -> {}", locating.item, item);
                locating.item = item;
                locating.attempts = 0;
            }
            None => self.begin_locating(item),
        }
    }

    /// Run a task previously handed to the clock
    pub fn tick(&mut self, task: RailTask) {
        match task {
            RailTask::Locate => self.locate(),
            RailTask::Shrink => self.shrink(),
            RailTask::Commit => self.commit(),
            RailTask::Select(item) => self.select(item),
        }
    }

    /// True when at rest with nothing pending or being located
    pub fn is_settled(&self) -> bool {
        self.phase.is_idle() && self.pending.is_none() && self.locating.is_none()
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    /// Selection waiting for the current animation to finish
    pub fn pending(&self) -> Option<ItemId> {
        self.pending
    }

    /// Selection waiting for its geometry to be laid out
    pub fn locating(&self) -> Option<ItemId> {
        self.locating.map(|locating| locating.item)
    }

    /// Last committed state, `None` before the first placement
    pub fn rail_state(&self) -> Option<RailState> {
        self.rail
    }

    pub fn config(&self) -> &RailConfig {
        &self.config
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Layout changes are made through here between ticks
    pub fn geometry_mut(&mut self) -> &mut G {
        &mut self.geometry
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Target geometry on the active axis, `None` until it is laid out
    fn target_box(&self, item: ItemId) -> Result<Option<BoundingBox>> {
        let bounds = self.geometry.bounds_of(item)?;
        Ok(bounds
            .filter(Bounds::is_laid_out)
            .map(|bounds| self.config.axis.project(&bounds))
            .filter(BoundingBox::is_laid_out))
    }

    fn begin_locating(&mut self, item: ItemId) {
        self.locating = Some(Locating { item, attempts: 0 });
        self.clock.idle(RailTask::Locate);
    }

    /// Idle -> Stretching, or the initial placement
    fn locate(&mut self) {
        let Some(locating) = self.locating else {
            tracing::debug!("Rail: stale locate task ignored");
            return;
        };

        let destination = match self.target_box(locating.item) {
            Ok(Some(destination)) => destination,
            Ok(None) => {
                self.retry_locate(locating);
                return;
            }
            Err(err) => {
                tracing::warn!("Rail: dropping selection {}: {}", locating.item, err);
                self.locating = None;
                self.drain_pending();
                return;
            }
        };
        self.locating = None;

        let Some(current) = self.rail else {
            self.place(locating.item, destination);
            return;
        };

        match tween::stretch(current, destination, &self.config.tween()) {
            None => {
                tracing::debug!("Rail: already at {}", locating.item);
                self.drain_pending();
            }
            Some(frame) => {
                tracing::debug!(
                    "Rail: stretching to {} (pos={}, size={}, cross={})",
                    locating.item,
                    frame.position,
                    frame.size,
                    frame.cross_size
                );
                let style = RailStyle::stretched(frame, self.config.stretch_transition());
                self.emit(style);
                self.phase = AnimationPhase::Stretching {
                    target: locating.item,
                    destination,
                };
                let delay = self.config.stretch_duration();
                self.clock.after(delay, RailTask::Shrink);
            }
        }
    }

    fn retry_locate(&mut self, mut locating: Locating) {
        locating.attempts += 1;

        if let Some(limit) = self.config.geometry_retry_limit {
            if locating.attempts >= limit {
                tracing::warn!(
                    "Rail: geometry for {} not ready after {} attempts, giving up",
                    locating.item,
                    locating.attempts
                );
                self.locating = None;
                self.drain_pending();
                return;
            }
        }

        tracing::debug!(
            "Rail: geometry for {} not ready, retrying (attempt {})",
            locating.item,
            locating.attempts
        );
        self.locating = Some(locating);
        self.clock.idle(RailTask::Locate);
    }

    /// First placement: commit directly, no stretch or shrink
    fn place(&mut self, item: ItemId, destination: BoundingBox) {
        let state = tween::centered(destination, self.config.diameter);
        self.rail = Some(state);
        self.emit(RailStyle::placed(state));
        tracing::info!(
            "Rail initialized at {} (pos={}, size={})",
            item,
            state.position,
            state.size
        );
        self.drain_pending();
    }

    /// Stretching -> Shrinking
    fn shrink(&mut self) {
        let AnimationPhase::Stretching {
            target,
            destination,
        } = self.phase
        else {
            tracing::debug!("Rail: stale shrink task ignored in {:?}", self.phase);
            return;
        };

        // Layout may have moved the target while stretching
        let destination = match self.target_box(target) {
            Ok(Some(latest)) => latest,
            Ok(None) => {
                tracing::debug!(
                    "Rail: geometry for {} unavailable at shrink, using stretch target",
                    target
                );
                destination
            }
            Err(err) => {
                tracing::warn!(
                    "Rail: shrinking to last known geometry of {}: {}",
                    target,
                    err
                );
                destination
            }
        };

        let rest = tween::shrink(destination, self.config.diameter);
        self.emit(RailStyle::settled(rest, self.config.shrink_transition()));
        self.phase = AnimationPhase::Shrinking { target, rest };
        let delay = self.config.shrink_duration();
        self.clock.after(delay, RailTask::Commit);
    }

    /// Shrinking -> Idle
    fn commit(&mut self) {
        let AnimationPhase::Shrinking { target, rest } = self.phase else {
            tracing::debug!("Rail: stale commit task ignored in {:?}", self.phase);
            return;
        };

        self.rail = Some(rest);
        self.phase = AnimationPhase::Idle;
        tracing::info!(
            "Rail animation finished at {} (pos={}, size={})",
            target,
            rest.position,
            rest.size
        );
        self.drain_pending();
    }

    /// Start the pending selection on the next idle turn, or stay at rest
    fn drain_pending(&mut self) {
        if let Some(next) = self.pending.take() {
            tracing::debug!("Rail: draining pending selection {}", next);
            self.begin_locating(next);
        }
    }

    fn emit(&mut self, style: RailStyle) {
        // Fail open: the next phase is scheduled regardless
        if let Err(err) = self.sink.apply(&style) {
            tracing::warn!("Rail: style sink failed: {}", err);
        }
    }
}

// =============================================================================
// Virtual-time driving
// =============================================================================

impl<G, S> RailScheduler<G, S, TaskQueue>
where
    G: GeometryProvider,
    S: StyleSink,
{
    /// Run one loop turn; returns the number of tasks run
    pub fn pump(&mut self) -> usize {
        let tasks = self.clock.take_turn();
        let count = tasks.len();
        for task in tasks {
            self.tick(task);
        }
        count
    }

    /// Run turns until nothing is ready at the current time
    ///
    /// Does not return while a target keeps reporting "not laid out" and no
    /// `geometry_retry_limit` is configured.
    pub fn run_ready(&mut self) -> usize {
        let mut total = 0;
        while self.clock.has_ready() {
            total += self.pump();
        }
        total
    }

    /// Let `by` of virtual time pass, running everything that comes due
    pub fn advance(&mut self, by: Duration) -> usize {
        let end = self.clock.now() + by;
        let mut total = self.run_ready();
        while let Some(deadline) = self.clock.next_deadline() {
            if deadline > end {
                break;
            }
            self.clock.advance_to(deadline);
            total += self.run_ready();
        }
        self.clock.advance_to(end);
        total
    }

    /// Run until the queue is empty, jumping virtual time between deadlines
    pub fn run_until_settled(&mut self) -> usize {
        let mut total = self.run_ready();
        while let Some(deadline) = self.clock.next_deadline() {
            self.clock.advance_to(deadline);
            total += self.run_ready();
        }
        total
    }
}
