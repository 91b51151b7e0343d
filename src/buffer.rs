use {
    crate::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            RwLock, RwLockReadGuard, RwLockWriteGuard,
        },
        Error, Result,
    },
    crossbeam_utils::CachePadded,
    std::ops::{Deref, DerefMut},
};

/// A named, fixed-length integer buffer guarded by a reader-writer lock.
///
/// The lock is instrumented: every acquisition is counted so that the number of simultaneous
/// shared holders, and any overlap between shared and exclusive holders, can be inspected after
/// a trial.
pub struct SharedBuffer {
    name: String,
    slots: RwLock<Option<Box<[i64]>>>,
    probe: Probe,
}

/// Shared access to the buffer. Any number may exist at once, but never alongside an
/// [`ExclusiveAccess`].
pub struct SharedAccess<'a> {
    probe: &'a Probe,
    slots: RwLockReadGuard<'a, Option<Box<[i64]>>>,
}

/// Exclusive access to the buffer.
///
/// Dropping the guard releases the lock, including when unwinding out of the critical section.
pub struct ExclusiveAccess<'a> {
    probe: &'a Probe,
    slots: RwLockWriteGuard<'a, Option<Box<[i64]>>>,
}

/// A snapshot of how the lock was held since the buffer was last initialized.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Occupancy {
    /// The largest number of shared holders observed at the same time.
    pub peak_readers: usize,
    /// How many acquisitions found a holder they should have excluded.
    pub overlaps: usize,
}

#[derive(Default)]
struct Probe {
    readers: CachePadded<AtomicUsize>,
    writers: CachePadded<AtomicUsize>,
    peak_readers: CachePadded<AtomicUsize>,
    overlaps: CachePadded<AtomicUsize>,
}

impl Probe {
    fn enter_shared(&self) {
        let readers = self.readers.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak_readers.fetch_max(readers, Ordering::AcqRel);

        if self.writers.load(Ordering::Acquire) != 0 {
            self.overlaps.fetch_add(1, Ordering::AcqRel);
        }
    }

    fn leave_shared(&self) {
        self.readers.fetch_sub(1, Ordering::AcqRel);
    }

    fn enter_exclusive(&self) {
        let writers = self.writers.fetch_add(1, Ordering::AcqRel);

        if writers != 0 || self.readers.load(Ordering::Acquire) != 0 {
            self.overlaps.fetch_add(1, Ordering::AcqRel);
        }
    }

    fn leave_exclusive(&self) {
        self.writers.fetch_sub(1, Ordering::AcqRel);
    }

    fn snapshot(&self) -> Occupancy {
        Occupancy {
            peak_readers: self.peak_readers.load(Ordering::Acquire),
            overlaps: self.overlaps.load(Ordering::Acquire),
        }
    }
}

impl SharedBuffer {
    /// Creates a buffer that must be [initialized](Self::initialize) before any task can use it.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: RwLock::new(None),
            probe: Probe::default(),
        }
    }

    /// Creates or replaces the contents with `len` zeroes and resets the lock statistics.
    ///
    /// Requiring `&mut self` means no task can be holding the buffer while this runs.
    pub fn initialize(&mut self, len: usize) {
        self.slots = RwLock::new(Some(vec![0; len].into_boxed_slice()));
        self.probe = Probe::default();
    }

    /// The name the buffer was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The number of slots, or `None` if the buffer has not been initialized.
    pub fn len(&self) -> Option<usize> {
        self.slots.read().as_ref().map(|slots| slots.len())
    }

    /// Blocks until no other holder, shared or exclusive, remains.
    pub fn exclusive(&self) -> Result<ExclusiveAccess<'_>> {
        let slots = self.slots.write();
        if slots.is_none() {
            return Err(self.missing());
        }

        self.probe.enter_exclusive();
        Ok(ExclusiveAccess {
            probe: &self.probe,
            slots,
        })
    }

    /// Blocks while an exclusive holder is active or waiting.
    pub fn shared(&self) -> Result<SharedAccess<'_>> {
        let slots = self.slots.read();
        if slots.is_none() {
            return Err(self.missing());
        }

        self.probe.enter_shared();
        Ok(SharedAccess {
            probe: &self.probe,
            slots,
        })
    }

    /// How the lock has been held since the last initialization.
    pub fn occupancy(&self) -> Occupancy {
        self.probe.snapshot()
    }

    fn missing(&self) -> Error {
        Error::Lookup {
            name: self.name.clone(),
        }
    }
}

// The probe counters are decremented in `drop`, which runs before the inner lock guard is
// released, so a counter never lags behind the lock it describes.

impl Drop for SharedAccess<'_> {
    fn drop(&mut self) {
        self.probe.leave_shared();
    }
}

impl Drop for ExclusiveAccess<'_> {
    fn drop(&mut self) {
        self.probe.leave_exclusive();
    }
}

impl Deref for SharedAccess<'_> {
    type Target = [i64];

    fn deref(&self) -> &Self::Target {
        self.slots.as_deref().unwrap_or_default()
    }
}

impl Deref for ExclusiveAccess<'_> {
    type Target = [i64];

    fn deref(&self) -> &Self::Target {
        self.slots.as_deref().unwrap_or_default()
    }
}

impl DerefMut for ExclusiveAccess<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.slots.as_deref_mut().unwrap_or_default()
    }
}
