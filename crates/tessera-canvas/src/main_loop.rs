use parking_lot::{ReentrantMutex, ReentrantMutexGuard, const_reentrant_mutex};

static MAIN_LOOP: ReentrantMutex<()> = const_reentrant_mutex(());

/// Held while native objects are created or mutated.
///
/// Native surfaces are only usable from the thread that owns them; entering
/// the main loop marks that transition. The lock is re-entrant so nested
/// entry points (content set -> refresh -> image hand-off) can each take it.
#[must_use = "the main loop is released when the guard is dropped"]
pub struct MainLoopGuard {
    _guard: ReentrantMutexGuard<'static, ()>,
}

pub fn begin() -> MainLoopGuard {
    MainLoopGuard {
        _guard: MAIN_LOOP.lock(),
    }
}
