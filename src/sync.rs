#[cfg(not(loom))]
pub(crate) use {
    parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    std::sync::atomic,
};

#[cfg(loom)]
pub(crate) use {
    loom::sync::atomic,
    self::rwlock::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// Loom's lock mirrors `std` and reports poisoning, `parking_lot` does not.
#[cfg(loom)]
mod rwlock {
    pub(crate) use loom::sync::{RwLockReadGuard, RwLockWriteGuard};

    pub(crate) struct RwLock<T>(loom::sync::RwLock<T>);

    impl<T> RwLock<T> {
        pub(crate) fn new(value: T) -> Self {
            Self(loom::sync::RwLock::new(value))
        }

        pub(crate) fn read(&self) -> RwLockReadGuard<'_, T> {
            self.0.read().unwrap_or_else(|poisoned| poisoned.into_inner())
        }

        pub(crate) fn write(&self) -> RwLockWriteGuard<'_, T> {
            self.0.write().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }
}
