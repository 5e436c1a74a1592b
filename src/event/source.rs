use heapless::Vec;

use crate::Error;

/// A typed event with an optional numeric payload.
///
/// The payload usually carries the peripheral instance or channel number that
/// raised the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Event<K> {
    pub kind: K,
    pub payload: Option<u32>,
}

impl<K> Event<K> {
    /// Creates an event without a payload.
    #[inline]
    pub const fn new(kind: K) -> Self {
        Self {
            kind,
            payload: None,
        }
    }

    /// Creates an event carrying `payload`.
    #[inline]
    pub const fn with_payload(kind: K, payload: u32) -> Self {
        Self {
            kind,
            payload: Some(payload),
        }
    }
}

/// Receives events from an [`EventSource`].
///
/// Observers may be invoked from interrupt context, so implementations must
/// not block or allocate. Closures of the form `Fn(Event<K>) + Sync`
/// implement this trait.
pub trait Observer<K>: Sync {
    fn on_event(&self, event: Event<K>);
}

impl<K, F> Observer<K> for F
where
    F: Fn(Event<K>) + Sync,
{
    #[inline]
    fn on_event(&self, event: Event<K>) {
        self(event)
    }
}

/// Ordered multicast of events to a fixed number of subscribers.
///
/// Subscribers are notified in insertion order. The same observer may be
/// inserted more than once and is then notified once per insertion.
/// Observers are compared by address, so zero-sized observers cannot be told
/// apart from each other.
///
/// Inserting and removing need `&mut self` while raising needs only `&self`,
/// so the list can never change underneath an in-progress dispatch. Populate
/// the list before enabling the interrupts that raise on it.
pub struct EventSource<'a, K, const N: usize> {
    subscribers: Vec<&'a dyn Observer<K>, N>,
}

impl<'a, K, const N: usize> EventSource<'a, K, N> {
    pub const fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Appends `observer` to the notification list.
    pub fn insert_subscriber(&mut self, observer: &'a dyn Observer<K>) -> Result<(), Error> {
        self.subscribers
            .push(observer)
            .map_err(|_| Error::SubscribersFull)
    }

    /// Removes the first occurrence of `observer`. Returns false if it was not subscribed.
    pub fn remove_subscriber(&mut self, observer: &dyn Observer<K>) -> bool {
        let target = core::ptr::from_ref(observer);
        match self
            .subscribers
            .iter()
            .position(|s| core::ptr::addr_eq(core::ptr::from_ref(*s), target))
        {
            Some(pos) => {
                self.subscribers.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.subscribers.clear();
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<K: Copy, const N: usize> EventSource<'_, K, N> {
    /// Notifies every subscriber, in order, on the caller's context.
    ///
    /// Safe to call from an interrupt handler: it neither allocates nor locks.
    #[inline]
    pub fn raise_event(&self, kind: K, payload: Option<u32>) {
        let event = Event { kind, payload };
        for subscriber in self.subscribers.iter() {
            subscriber.on_event(event);
        }
    }

    /// Raises `kind` without a payload.
    #[inline]
    pub fn raise(&self, kind: K) {
        self.raise_event(kind, None)
    }
}

impl<K, const N: usize> Default for EventSource<'_, K, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, const N: usize> core::fmt::Debug for EventSource<'_, K, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventSource")
            .field("subscribers", &self.subscribers.len())
            .field("capacity", &N)
            .finish()
    }
}
