//! Change notifications for cart consumers.

use crate::cart::LineItem;
use crate::ids::{LineKey, ProductId};

/// How the store obtained its initial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationSource {
    /// Adopted from the persisted slot.
    Persisted,
    /// Slot was absent; started from the seed.
    Seeded,
    /// Slot held a corrupt payload; discarded and started from the seed.
    Recovered,
    /// Slot could not be read; started from the seed without touching it.
    Unavailable,
}

impl HydrationSource {
    /// Short lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Persisted => "persisted",
            Self::Seeded => "seeded",
            Self::Recovered => "recovered",
            Self::Unavailable => "unavailable",
        }
    }

    /// Whether the adopted state is written back to the slot on open.
    ///
    /// An unreadable slot may still hold a good cart, so it is left alone
    /// until the first mutation.
    pub fn writes_back(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

/// A state change published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// Initial state, delivered once to each new subscriber.
    Hydrated(HydrationSource),
    /// An item was appended or merged into an existing entry.
    ItemAdded { key: LineKey, merged: bool },
    /// Entries were removed.
    ItemsRemoved { id: ProductId, removed: usize },
    /// Entry quantities were set.
    QuantityUpdated {
        id: ProductId,
        quantity: u32,
        updated: usize,
    },
    /// The cart was emptied.
    Cleared,
}

/// What a subscriber sees after each change.
#[derive(Debug, Clone, Copy)]
pub struct CartChange<'a> {
    /// The change that just happened.
    pub event: &'a CartEvent,
    /// Entries after the change.
    pub items: &'a [LineItem],
    /// Sum of quantities after the change.
    pub count: u64,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&CartChange<'_>) + Send>;

/// Registry of change listeners.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Subscribers {
    pub(crate) fn add(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let len_before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() < len_before
    }

    /// Deliver to the most recently added listener only.
    pub(crate) fn notify_last(&mut self, change: &CartChange<'_>) {
        if let Some((_, listener)) = self.listeners.last_mut() {
            listener(change);
        }
    }

    pub(crate) fn notify(&mut self, change: &CartChange<'_>) {
        for (_, listener) in &mut self.listeners {
            listener(change);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
