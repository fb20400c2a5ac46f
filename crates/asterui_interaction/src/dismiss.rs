//! Scoped ownership of the global "pointer down outside" listener.
//!
//! A popup only needs to hear about outside clicks while it is open. The
//! listener is acquired when the popup opens and released when it closes; the
//! release also runs when the owner is dropped while still open.

use std::fmt;

/// Releases a listener when dropped.
#[must_use = "dropping the guard releases the listener immediately"]
pub struct ListenerGuard {
    release: Option<Box<dyn FnOnce()>>,
}

impl ListenerGuard {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A guard with nothing to release.
    pub fn noop() -> Self {
        Self { release: None }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("armed", &self.release.is_some())
            .finish()
    }
}

/// Registers the listener and hands back the guard that removes it.
pub type AcquireListenerFn = Box<dyn FnMut() -> ListenerGuard>;

/// Holds the outside-pointer listener for as long as its popup is open.
#[derive(Default)]
pub struct DismissScope {
    acquire: Option<AcquireListenerFn>,
    active: Option<ListenerGuard>,
}

impl DismissScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_acquire(acquire: impl FnMut() -> ListenerGuard + 'static) -> Self {
        Self {
            acquire: Some(Box::new(acquire)),
            active: None,
        }
    }

    /// Replaces the acquire hook, releasing any listener taken with the old one.
    pub fn set_acquire(&mut self, acquire: impl FnMut() -> ListenerGuard + 'static) {
        let was_active = self.release();
        self.acquire = Some(Box::new(acquire));

        if was_active {
            self.activate();
        }
    }

    /// Acquires the listener unless it is already held.
    pub fn activate(&mut self) {
        if self.active.is_some() {
            return;
        }

        self.active = Some(match self.acquire.as_mut() {
            Some(acquire) => acquire(),
            None => ListenerGuard::noop(),
        });
    }

    /// Releases the listener. Returns whether one was held.
    pub fn release(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

impl fmt::Debug for DismissScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DismissScope")
            .field("has_acquire", &self.acquire.is_some())
            .field("active", &self.active.is_some())
            .finish()
    }
}
