//! Custom callback dispatch engine
//!
//! One [`CustomCallback`] exists per custom event kind. It owns the
//! subscription table for that kind and runs `fire`: subscribers are
//! invoked synchronously, in registration order, when the kind's filter
//! predicate passes.
//!
//! Handlers may re-enter the engine (subscribe, unsubscribe, or fire again)
//! while a `fire` is in progress. Dispatch iterates over a snapshot of the
//! table and re-checks each entry against the live key set before invoking
//! it, so mutation during iteration cannot skip or double-fire a subscriber.

use std::sync::Arc;

use parking_lot::RwLock;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Key identifying one subscription, used for removal
    pub struct SubscriptionKey;
}

/// Handler invoked with the firing payload
pub type Handler<P> = Arc<dyn Fn(&P) + Send + Sync>;

struct Subscription<P, F> {
    key: SubscriptionKey,
    filter: F,
    handler: Handler<P>,
}

impl<P, F: Clone> Clone for Subscription<P, F> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            filter: self.filter.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

struct Table<P, F> {
    /// Mints keys and tracks which subscriptions are live
    keys: SlotMap<SubscriptionKey, ()>,
    /// Insertion-ordered; dispatch order equals registration order
    entries: Vec<Subscription<P, F>>,
}

/// Dispatch engine for one custom event kind.
///
/// Generic over the firing payload `P` and the filter-parameter struct `F`.
/// The filter predicate is injected at construction, so predicates stay
/// plain functions that can be unit tested on their own.
pub struct CustomCallback<P, F> {
    name: &'static str,
    should_fire: fn(&P, &F) -> bool,
    table: RwLock<Table<P, F>>,
}

impl<P, F: Clone> CustomCallback<P, F> {
    /// Create an engine with the given filter predicate.
    pub fn new(name: &'static str, should_fire: fn(&P, &F) -> bool) -> Self {
        Self {
            name,
            should_fire,
            table: RwLock::new(Table {
                keys: SlotMap::with_key(),
                entries: Vec::new(),
            }),
        }
    }

    /// The event kind's name (used in log output)
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Subscribe with the default (all-absent) filter, which matches every
    /// firing.
    ///
    /// # Returns
    /// A key that can be used to unsubscribe.
    pub fn subscribe<H>(&self, handler: H) -> SubscriptionKey
    where
        F: Default,
        H: Fn(&P) + Send + Sync + 'static,
    {
        self.subscribe_filtered(F::default(), handler)
    }

    /// Subscribe with an explicit filter.
    ///
    /// Appends unconditionally; registering the same handler twice yields
    /// two independent subscriptions.
    pub fn subscribe_filtered<H>(&self, filter: F, handler: H) -> SubscriptionKey
    where
        H: Fn(&P) + Send + Sync + 'static,
    {
        let mut table = self.table.write();
        let key = table.keys.insert(());
        table.entries.push(Subscription {
            key,
            filter,
            handler: Arc::new(handler),
        });
        tracing::trace!(
            "Subscribed to {} (total: {})",
            self.name,
            table.entries.len()
        );
        key
    }

    /// Remove a subscription.
    ///
    /// # Returns
    /// `true` if the key was live and the subscription was removed; `false`
    /// for unknown or already-removed keys (a no-op, not an error).
    pub fn unsubscribe(&self, key: SubscriptionKey) -> bool {
        let mut table = self.table.write();
        if table.keys.remove(key).is_none() {
            return false;
        }
        table.entries.retain(|subscription| subscription.key != key);
        tracing::trace!(
            "Unsubscribed from {} (remaining: {})",
            self.name,
            table.entries.len()
        );
        true
    }

    /// Whether any subscription is registered. Adapters use this to skip
    /// per-frame work when nobody is listening.
    pub fn has_subscriptions(&self) -> bool {
        !self.table.read().entries.is_empty()
    }

    /// Number of live subscriptions
    pub fn subscription_count(&self) -> usize {
        self.table.read().entries.len()
    }

    /// Fire the event with the given payload.
    ///
    /// Subscribers registered at the moment `fire` begins are visited in
    /// registration order; each is invoked iff it is still live and its
    /// filter predicate passes. Subscriptions added by a handler during this
    /// `fire` are first eligible on the next `fire`.
    pub fn fire(&self, payload: &P) {
        let snapshot: Vec<Subscription<P, F>> = self.table.read().entries.clone();
        if snapshot.is_empty() {
            return;
        }
        tracing::trace!("Firing {} to {} subscriber(s)", self.name, snapshot.len());

        for subscription in snapshot {
            // A handler earlier in this fire may have removed this entry.
            if !self.table.read().keys.contains_key(subscription.key) {
                continue;
            }
            if (self.should_fire)(payload, &subscription.filter) {
                (subscription.handler)(payload);
            }
        }
    }
}
