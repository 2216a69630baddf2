//! Change listeners.
//!
//! A stat keeps its observers in a [`Listeners`] list. Subscribing returns a
//! [`ListenerId`]; the subscriber keeps it and unsubscribes with it, so the
//! stat never has to track observer lifetimes.

use std::fmt;

/// Handle returned when registering a change listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

type Callback<S> = Box<dyn FnMut(&S) + Send>;

/// Ordered list of callbacks invoked with a payload of type `S`.
///
/// Callbacks run in registration order.
pub struct Listeners<S> {
    entries: Vec<(ListenerId, Callback<S>)>,
    next_id: u64,
    // callbacks moved out by `detach`, still counted by `len`
    detached: usize,
}

impl<S> Listeners<S> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            detached: 0,
        }
    }

    /// Add a callback and return the handle that removes it.
    pub fn register<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&S) + Send + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Remove one listener. Returns `false` if the id is unknown.
    pub fn unregister(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Remove every callback.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of registered callbacks, including detached ones.
    pub fn len(&self) -> usize {
        self.entries.len() + self.detached
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move the callbacks out, leaving a placeholder whose [`len`](Self::len)
    /// still counts them. Put the returned list back with plain assignment.
    pub fn detach(&mut self) -> Self {
        let placeholder = Self {
            entries: Vec::new(),
            next_id: self.next_id,
            detached: self.entries.len(),
        };
        std::mem::replace(self, placeholder)
    }

    /// Invoke every callback with `payload`, in registration order.
    pub fn notify(&mut self, payload: &S) {
        for (_, callback) in self.entries.iter_mut() {
            callback(payload);
        }
    }
}

impl<S> Default for Listeners<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for Listeners<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.len())
            .finish()
    }
}
