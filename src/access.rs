use parking_lot::MappedMutexGuard;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Exclusive access to one value of a [`ConcurrentMap`](crate::ConcurrentMap).
///
/// The handle holds the lock of the shard that owns the key for as long as
/// it lives, and dereferences to the value. Dropping it releases the lock.
/// Because the lock covers the whole shard, every other key routed to the
/// same shard is blocked while the handle is alive; keep it short-lived.
///
/// # Deadlock
///
/// Do not call another operation that needs the same shard (`access`, `get`,
/// `snapshot`, `len`, ...) from the thread that holds the handle. Shard locks
/// are not reentrant and the thread will block on itself.
pub struct Access<'a, V> {
    value: MappedMutexGuard<'a, V>,
}

impl<'a, V> Access<'a, V> {
    pub(crate) fn new(value: MappedMutexGuard<'a, V>) -> Self {
        Self { value }
    }
}

impl<V> Deref for Access<'_, V> {
    type Target = V;

    #[inline]
    fn deref(&self) -> &V {
        &self.value
    }
}

impl<V> DerefMut for Access<'_, V> {
    #[inline]
    fn deref_mut(&mut self) -> &mut V {
        &mut self.value
    }
}

impl<V: fmt::Debug> fmt::Debug for Access<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Access").field(&*self.value).finish()
    }
}
