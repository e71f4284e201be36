//! Cooperative clock
//!
//! The scheduler never sleeps or spawns. Every wait becomes a [`RailTask`]
//! handed to a [`Clock`], and the host loop feeds due tasks back through
//! `RailScheduler::tick`. [`TaskQueue`] is a deterministic virtual-time loop
//! used by tests and the CLI; a GUI host implements [`Clock`] on top of its
//! own idle and timeout sources.

use rail_core::ItemId;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::time::Duration;

/// A continuation the scheduler asked to run later
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RailTask {
    /// Resolve the geometry of the item being located
    Locate,
    /// Stretch time is over; contract to the target
    Shrink,
    /// Shrink time is over; commit the resting state
    Commit,
    /// A selection routed through the loop instead of a direct call
    Select(ItemId),
}

/// Scheduling primitives provided by the host event loop
pub trait Clock {
    /// Run `task` once, as soon as the loop is idle
    fn idle(&mut self, task: RailTask);

    /// Run `task` once, after `delay`
    fn after(&mut self, delay: Duration, task: RailTask);
}

#[derive(Debug)]
struct Timer {
    deadline: Duration,
    seq: u64,
    task: RailTask,
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for Timer {}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timer {
    // Reversed so the max-heap pops the earliest deadline first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Virtual-time task loop
///
/// Each turn runs the timers already due, earliest first, then the idle tasks
/// queued before the turn began. Idle tasks queued while a turn runs wait for
/// the next turn, so a task that keeps rescheduling itself cannot starve the
/// loop.
#[derive(Debug, Default)]
pub struct TaskQueue {
    now: Duration,
    idle: VecDeque<RailTask>,
    timers: BinaryHeap<Timer>,
    next_seq: u64,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time, measured from queue creation
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Deadline of the earliest pending timer
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.peek().map(|timer| timer.deadline)
    }

    /// Move virtual time forward; moving backwards is ignored
    pub fn advance_to(&mut self, time: Duration) {
        if time > self.now {
            self.now = time;
        }
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// True if a turn would run anything right now
    pub fn has_ready(&self) -> bool {
        !self.idle.is_empty() || self.next_deadline().is_some_and(|d| d <= self.now)
    }

    /// Number of queued tasks, idle and timed
    pub fn len(&self) -> usize {
        self.idle.len() + self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idle.is_empty() && self.timers.is_empty()
    }

    /// Remove and return the tasks making up one loop turn
    pub fn take_turn(&mut self) -> Vec<RailTask> {
        let mut turn = Vec::with_capacity(self.idle.len());

        let now = self.now;
        while self.timers.peek().is_some_and(|t| t.deadline <= now) {
            if let Some(timer) = self.timers.pop() {
                turn.push(timer.task);
            }
        }

        turn.extend(self.idle.drain(..));
        turn
    }
}

impl Clock for TaskQueue {
    fn idle(&mut self, task: RailTask) {
        self.idle.push_back(task);
    }

    fn after(&mut self, delay: Duration, task: RailTask) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer {
            deadline: self.now + delay,
            seq,
            task,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_tasks_run_in_order() {
        let mut queue = TaskQueue::new();
        queue.idle(RailTask::Locate);
        queue.idle(RailTask::Select(ItemId(2)));

        assert_eq!(
            queue.take_turn(),
            vec![RailTask::Locate, RailTask::Select(ItemId(2))]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_timers_wait_for_deadline() {
        let mut queue = TaskQueue::new();
        queue.after(Duration::from_millis(100), RailTask::Shrink);

        assert!(!queue.has_ready());
        assert!(queue.take_turn().is_empty());
        assert_eq!(queue.next_deadline(), Some(Duration::from_millis(100)));

        queue.advance(Duration::from_millis(99));
        assert!(queue.take_turn().is_empty());

        queue.advance_to(Duration::from_millis(100));
        assert_eq!(queue.take_turn(), vec![RailTask::Shrink]);
    }

    #[test]
    fn test_timers_fire_by_deadline_then_insertion() {
        let mut queue = TaskQueue::new();
        queue.after(Duration::from_millis(150), RailTask::Commit);
        queue.after(Duration::from_millis(100), RailTask::Shrink);
        queue.after(Duration::from_millis(100), RailTask::Select(ItemId(4)));

        queue.advance_to(Duration::from_secs(1));
        assert_eq!(
            queue.take_turn(),
            vec![
                RailTask::Shrink,
                RailTask::Select(ItemId(4)),
                RailTask::Commit
            ]
        );
    }

    #[test]
    fn test_due_timers_run_before_idle() {
        let mut queue = TaskQueue::new();
        queue.idle(RailTask::Locate);
        queue.after(Duration::ZERO, RailTask::Commit);

        assert_eq!(queue.take_turn(), vec![RailTask::Commit, RailTask::Locate]);
    }

    #[test]
    fn test_time_never_moves_backwards() {
        let mut queue = TaskQueue::new();
        queue.advance_to(Duration::from_millis(50));
        queue.advance_to(Duration::from_millis(10));
        assert_eq!(queue.now(), Duration::from_millis(50));

        // Delays are relative to the current virtual time
        queue.after(Duration::from_millis(10), RailTask::Shrink);
        assert_eq!(queue.next_deadline(), Some(Duration::from_millis(60)));
        assert_eq!(queue.len(), 1);
    }
}
