//! Deferred ability casts.
//!
//! During a battle most hooks do not run where they trigger; they are
//! queued and drained at defined points in the round, ordered by the
//! caster's attack. Each side of a battle owns one queue.

use serde::{Deserialize, Serialize};

use crate::pets::{Hook, PetId};

/// One deferred cast: who casts, which hook, and the caster's attack at
/// enqueue time.
///
/// The attack hint only matters when the caster has left the deck by the
/// time the queue drains; live casters are re-keyed on their current
/// attack.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct QueuedCast {
    pub caster: PetId,
    pub hook: Hook,
    pub attack_hint: i32,
}

/// FIFO of deferred casts for one side of a battle.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CastQueue {
    entries: Vec<QueuedCast>,
}

impl CastQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cast: QueuedCast) {
        self.entries.push(cast);
    }

    /// Take every pending cast, leaving the queue empty.
    ///
    /// Casts enqueued while the drained batch executes land in the next
    /// batch; the battle loop drains until both sides are quiet.
    pub fn drain(&mut self) -> Vec<QueuedCast> {
        std::mem::take(&mut self.entries)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pets::PetIdGen;

    #[test]
    fn test_drain_empties_queue() {
        let mut ids = PetIdGen::new();
        let mut queue = CastQueue::new();
        queue.push(QueuedCast {
            caster: ids.next_id(),
            hook: Hook::Hurt,
            attack_hint: 3,
        });
        queue.push(QueuedCast {
            caster: ids.next_id(),
            hook: Hook::Faint,
            attack_hint: 1,
        });
        assert_eq!(queue.len(), 2);

        let batch = queue.drain();
        assert_eq!(batch.len(), 2);
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }
}
