//! Location capability
//!
//! The router never touches a platform global. It reads and changes the
//! current fragment through [`LocationSource`], and learns about changes
//! through a listener whose lifetime is tied to a [`Subscription`].
//!
//! [`MemoryLocation`] is a complete in-memory implementation with a history
//! stack. Like a browser it queues one change event per effective fragment
//! change and delivers them only when asked, one at a time.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::url::{strip_hash_prefix, HashLocation};

/// Source of the current location fragment.
pub trait LocationSource {
    /// Current fragment, decoded into pathname and query.
    fn read(&self) -> HashLocation;

    /// Replace the current history entry with `path`.
    fn replace(&self, path: &str);

    /// Push `path` as a new history entry.
    fn assign(&self, path: &str);

    /// Attach a change listener. Dropping the returned guard detaches it.
    fn subscribe(&self, listener: Box<dyn FnMut()>) -> Subscription;
}

// =============================================================================
// Subscription
// =============================================================================

/// Detaches a listener when dropped.
#[must_use = "dropping a Subscription detaches its listener immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// A subscription with nothing to detach.
    pub fn detached() -> Self {
        Self { unsubscribe: None }
    }

    /// Detach now.
    pub fn unsubscribe(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.unsubscribe.is_some())
            .finish()
    }
}

// =============================================================================
// Memory Location
// =============================================================================

/// A location change request, as recorded by [`MemoryLocation`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(tag = "kind", content = "path", rename_all = "lowercase"))]
pub enum LocationCommand {
    Replace(String),
    Assign(String),
}

type Listener = Rc<RefCell<Box<dyn FnMut()>>>;

struct MemoryHistory {
    entries: Vec<String>,
    cursor: usize,
    listeners: Vec<(u64, Listener)>,
    next_listener_id: u64,
    pending: usize,
    dispatching: bool,
    commands: Vec<LocationCommand>,
}

impl MemoryHistory {
    fn current(&self) -> &str {
        &self.entries[self.cursor]
    }

    fn is_listening(&self, id: u64) -> bool {
        self.listeners.iter().any(|(listener_id, _)| *listener_id == id)
    }
}

/// In-memory history stack implementing [`LocationSource`].
///
/// Clones share the same history.
#[derive(Clone)]
pub struct MemoryLocation {
    inner: Rc<RefCell<MemoryHistory>>,
}

impl MemoryLocation {
    /// Start with a single history entry.
    pub fn new(initial: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MemoryHistory {
                entries: vec![strip_hash_prefix(initial).to_string()],
                cursor: 0,
                listeners: Vec::new(),
                next_listener_id: 0,
                pending: 0,
                dispatching: false,
                commands: Vec::new(),
            })),
        }
    }

    /// Current fragment without the leading `#`.
    pub fn current(&self) -> String {
        self.inner.borrow().current().to_string()
    }

    pub fn history_len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Every replace/assign issued so far, in order.
    pub fn commands(&self) -> Vec<LocationCommand> {
        self.inner.borrow().commands.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Change events waiting for [`dispatch_pending`](Self::dispatch_pending).
    pub fn pending_events(&self) -> usize {
        self.inner.borrow().pending
    }

    /// Step back in history. Returns false at the first entry.
    pub fn back(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.cursor == 0 {
            return false;
        }
        let before = inner.current().to_string();
        inner.cursor -= 1;
        if inner.current() != before {
            inner.pending += 1;
        }
        true
    }

    /// Step forward in history. Returns false at the last entry.
    pub fn forward(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.cursor + 1 >= inner.entries.len() {
            return false;
        }
        let before = inner.current().to_string();
        inner.cursor += 1;
        if inner.current() != before {
            inner.pending += 1;
        }
        true
    }

    /// Deliver queued change events, one at a time, to every listener.
    ///
    /// Events queued by a listener are delivered in the same call. A listener
    /// detached during dispatch is not called again. A nested call from inside
    /// a listener delivers nothing and returns 0; the outer call picks up
    /// whatever was queued. Returns the number of events delivered.
    pub fn dispatch_pending(&self) -> usize {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.dispatching {
                return 0;
            }
            inner.dispatching = true;
        }
        let _guard = DispatchGuard(&self.inner);

        let mut dispatched = 0;
        loop {
            let listeners: Vec<(u64, Listener)> = {
                let mut inner = self.inner.borrow_mut();
                if inner.pending == 0 {
                    break;
                }
                inner.pending -= 1;
                inner
                    .listeners
                    .iter()
                    .map(|(id, listener)| (*id, Rc::clone(listener)))
                    .collect()
            };

            for (id, listener) in listeners {
                if !self.inner.borrow().is_listening(id) {
                    continue;
                }
                match listener.try_borrow_mut() {
                    Ok(mut callback) => (*callback)(),
                    Err(_) => log::warn!("skipping reentrant dispatch to listener {id}"),
                }
            }
            dispatched += 1;
        }
        dispatched
    }
}

/// Clears the dispatching flag, also when a listener panics.
struct DispatchGuard<'a>(&'a RefCell<MemoryHistory>);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.0.try_borrow_mut() {
            inner.dispatching = false;
        }
    }
}

impl LocationSource for MemoryLocation {
    fn read(&self) -> HashLocation {
        HashLocation::parse(self.inner.borrow().current())
    }

    fn replace(&self, path: &str) {
        let path = strip_hash_prefix(path).to_string();
        let mut inner = self.inner.borrow_mut();
        inner.commands.push(LocationCommand::Replace(path.clone()));
        if inner.current() != path {
            let cursor = inner.cursor;
            inner.entries[cursor] = path;
            inner.pending += 1;
        }
    }

    fn assign(&self, path: &str) {
        let path = strip_hash_prefix(path).to_string();
        let mut inner = self.inner.borrow_mut();
        inner.commands.push(LocationCommand::Assign(path.clone()));
        // Assigning the current fragment neither pushes nor fires
        if inner.current() != path {
            let keep = inner.cursor + 1;
            inner.entries.truncate(keep);
            inner.entries.push(path);
            inner.cursor += 1;
            inner.pending += 1;
        }
    }

    fn subscribe(&self, listener: Box<dyn FnMut()>) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_listener_id;
            inner.next_listener_id += 1;
            inner.listeners.push((id, Rc::new(RefCell::new(listener))));
            id
        };

        let history: Weak<RefCell<MemoryHistory>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(history) = history.upgrade() {
                // Take the listener out before dropping it; it may own a
                // clone of this location.
                let removed = {
                    let mut inner = history.borrow_mut();
                    let index = inner.listeners.iter().position(|(listener_id, _)| *listener_id == id);
                    index.map(|i| inner.listeners.remove(i))
                };
                drop(removed);
            }
        })
    }
}

impl fmt::Debug for MemoryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("MemoryLocation")
            .field("entries", &inner.entries)
            .field("cursor", &inner.cursor)
            .field("listeners", &inner.listeners.len())
            .field("pending", &inner.pending)
            .finish()
    }
}
