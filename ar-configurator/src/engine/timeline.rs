//! Scheduled continuations for multi-step sequences.
//!
//! A sequence (placement retries, visibility escalation) is a chain of steps,
//! each woken after a delay measured in frame time. Steps are keyed by the
//! identity they act on. Superseding a key bumps its generation, and any step
//! scheduled under an older generation is dropped before it can resume.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

#[derive(Debug)]
struct PendingStep<K, S> {
    key: K,
    generation: Generation,
    wake_at: f64,
    order: u64,
    step: S,
}

/// Frame-clocked queue of pending steps.
#[derive(Debug)]
pub struct Timeline<K, S> {
    clock: f64,
    next_order: u64,
    generations: HashMap<K, u64>,
    pending: Vec<PendingStep<K, S>>,
}

impl<K: Copy + Eq + Hash, S> Default for Timeline<K, S> {
    fn default() -> Self {
        Self {
            clock: 0.0,
            next_order: 0,
            generations: HashMap::new(),
            pending: Vec::new(),
        }
    }
}

impl<K: Copy + Eq + Hash, S> Timeline<K, S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn generation(&self, key: K) -> Generation {
        Generation(self.generations.get(&key).copied().unwrap_or(0))
    }

    /// Queue `step` under the key's current generation, `delay` seconds from now.
    pub fn schedule(&mut self, key: K, step: S, delay: f32) {
        let generation = self.generation(key);
        let order = self.next_order;
        self.next_order += 1;
        self.pending.push(PendingStep {
            key,
            generation,
            wake_at: self.clock + f64::from(delay.max(0.0)),
            order,
            step,
        });
    }

    /// Cancel everything queued for `key`; returns the new generation.
    pub fn supersede(&mut self, key: K) -> Generation {
        let counter = self.generations.entry(key).or_insert(0);
        *counter += 1;
        let current = Generation(*counter);
        self.pending.retain(|p| p.key != key);
        current
    }

    pub fn is_pending(&self, key: K) -> bool {
        let current = self.generation(key);
        self.pending
            .iter()
            .any(|p| p.key == key && p.generation == current)
    }

    /// Advance the clock and hand back every live step that is now due,
    /// earliest first. Steps scheduled while handling the result wake on a
    /// later frame at the soonest.
    pub fn advance(&mut self, dt: f32) -> Vec<(K, S)> {
        self.clock += f64::from(dt.max(0.0));
        let clock = self.clock;

        let (mut due, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|p| p.wake_at <= clock + 1e-9);
        self.pending = waiting;

        due.sort_by(|a, b| {
            a.wake_at
                .total_cmp(&b.wake_at)
                .then(a.order.cmp(&b.order))
        });

        due.into_iter()
            .filter(|p| p.generation == self.generation(p.key))
            .map(|p| (p.key, p.step))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_wake_after_their_delay() {
        let mut timeline: Timeline<u8, &str> = Timeline::new();
        timeline.schedule(1, "a", 0.1);
        assert!(timeline.advance(0.05).is_empty());
        assert_eq!(timeline.advance(0.05), vec![(1, "a")]);
        assert!(!timeline.is_pending(1));
    }

    #[test]
    fn superseded_steps_never_resume() {
        let mut timeline: Timeline<u8, &str> = Timeline::new();
        timeline.schedule(1, "old", 0.0);
        timeline.schedule(2, "other", 0.0);
        timeline.supersede(1);
        timeline.schedule(1, "new", 0.0);
        let due = timeline.advance(0.016);
        assert_eq!(due, vec![(2, "other"), (1, "new")]);
    }

    #[test]
    fn due_steps_are_ordered_by_wake_time() {
        let mut timeline: Timeline<u8, u32> = Timeline::new();
        timeline.schedule(1, 2, 0.2);
        timeline.schedule(1, 1, 0.1);
        let due = timeline.advance(1.0);
        assert_eq!(due, vec![(1, 1), (1, 2)]);
    }
}
