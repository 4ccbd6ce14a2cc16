use std::collections::VecDeque;

use crate::tools::placement::state::ObjectId;

/// Recycles object handles so the engine can reuse spawned entities.
#[derive(Debug, Default, Clone)]
pub struct ObjectPool {
    enabled: bool,
    idle: VecDeque<ObjectId>,
    next_id: u64,
}

impl ObjectPool {
    /// Pool pre-filled with `size` idle handles, or a plain id allocator
    /// when disabled.
    pub fn new(enabled: bool, size: usize) -> Self {
        let mut pool = Self {
            enabled,
            ..Self::default()
        };
        if enabled {
            for _ in 0..size {
                let id = pool.allocate();
                pool.idle.push_back(id);
            }
        }
        pool
    }

    fn allocate(&mut self) -> ObjectId {
        self.next_id += 1;
        ObjectId(self.next_id)
    }

    pub fn acquire(&mut self) -> ObjectId {
        match self.idle.pop_front() {
            Some(id) => id,
            None => self.allocate(),
        }
    }

    /// Returns `true` when the handle was kept for reuse.
    pub fn release(&mut self, id: ObjectId) -> bool {
        if !self.enabled {
            return false;
        }
        self.idle.push_back(id);
        true
    }

    /// Apply new pooling settings without reissuing handles already in use.
    pub fn reconfigure(&mut self, enabled: bool, size: usize) {
        self.enabled = enabled;
        if !enabled {
            self.idle.clear();
            return;
        }
        while self.idle.len() < size {
            let id = self.allocate();
            self.idle.push_back(id);
        }
    }

    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    pub fn drain(&mut self) -> Vec<ObjectId> {
        self.idle.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_handles_are_reused_in_order() {
        let mut pool = ObjectPool::new(true, 3);
        let a = pool.acquire();
        assert_eq!(pool.idle_count(), 2);
        assert!(pool.release(a));
        assert_eq!(pool.acquire(), ObjectId(2));
        assert_eq!(pool.acquire(), ObjectId(3));
        assert_eq!(pool.acquire(), a);
        assert_eq!(pool.acquire(), ObjectId(4));
    }

    #[test]
    fn disabled_pool_never_keeps_handles() {
        let mut pool = ObjectPool::new(false, 5);
        assert_eq!(pool.idle_count(), 0);
        let id = pool.acquire();
        assert!(!pool.release(id));
        assert_ne!(pool.acquire(), id);
    }
}
