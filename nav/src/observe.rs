//! Explicit observer lists. Subscriptions are identified by id and must be
//! dropped with [`Observers::unsubscribe`] on teardown; nothing here relies
//! on garbage collection to release a handler.

pub type Observer<E> = Box<dyn Fn(&E) + Send>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub struct Observers<E> {
    entries: Vec<(SubscriptionId, Observer<E>)>,
    next_id: u64,
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E> Observers<E> {
    pub fn subscribe(&mut self, observer: Observer<E>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    /// Returns false when the id was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != id);
        before != self.entries.len()
    }

    pub fn notify(&self, event: &E) {
        for (_, observer) in &self.entries {
            observer(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> std::fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.entries.len())
            .finish()
    }
}
