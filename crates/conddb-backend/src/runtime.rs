//! Process-wide count of live backend users.
//!
//! A guard is taken before a backend handle is opened and released after
//! the handle is dropped, so the count brackets every open connection. The
//! native library itself initializes lazily inside `git2`; the guard only
//! tracks the lifecycle and marks where it starts and ends in the logs.

use std::sync::Mutex;

struct RuntimeState {
    users: usize,
    generation: u64,
}

static RUNTIME: Mutex<RuntimeState> = Mutex::new(RuntimeState {
    users: 0,
    generation: 0,
});

fn lock() -> std::sync::MutexGuard<'static, RuntimeState> {
    // Poisoning cannot leave the counters inconsistent.
    RUNTIME.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Counts as one live backend user while held.
#[derive(Debug)]
pub struct RuntimeGuard {
    _private: (),
}

impl RuntimeGuard {
    /// Register a user; the first one starts a new generation.
    pub fn acquire() -> Self {
        let mut state = lock();
        if state.users == 0 {
            state.generation += 1;
            tracing::debug!(generation = state.generation, "first backend user registered");
        }
        state.users += 1;
        Self { _private: () }
    }

    /// Number of live guards in the process.
    pub fn active() -> usize {
        lock().users
    }

    /// How many times the user count has risen from zero in this process.
    pub fn generation() -> u64 {
        lock().generation
    }
}

impl Drop for RuntimeGuard {
    fn drop(&mut self) {
        let mut state = lock();
        state.users = state.users.saturating_sub(1);
        if state.users == 0 {
            tracing::debug!(generation = state.generation, "last backend user released");
        }
    }
}
