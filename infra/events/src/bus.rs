use crate::error::EventBusError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

/// Buffered events per type before slow subscribers start lagging.
const DEFAULT_CAPACITY: usize = 128;

/// Marker trait for types that can be sent across the [`EventBus`].
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

type Channels = FxHashMap<TypeId, Box<dyn Any + Send + Sync>>;

/// Thread-safe, cheaply cloneable event bus.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    channels: Arc<RwLock<Channels>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to events of type `T` with the default buffer.
    ///
    /// # Errors
    /// Returns [`EventBusError::TypeMismatch`] if the registry is corrupted.
    pub fn subscribe<T: Event>(&self) -> Result<Subscription<T>, EventBusError> {
        self.subscribe_with_capacity(DEFAULT_CAPACITY)
    }

    /// Subscribes to events of type `T`. `capacity` only applies when this call
    /// creates the channel.
    ///
    /// # Errors
    /// Returns [`EventBusError::InvalidCapacity`] for a zero capacity.
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<Subscription<T>, EventBusError> {
        if capacity == 0 {
            return Err(EventBusError::InvalidCapacity {
                message: "capacity must be greater than zero".into(),
                context: Some(std::any::type_name::<T>().into()),
            });
        }

        let sender = self.sender_or_create::<T>(capacity)?;
        trace!(event = std::any::type_name::<T>(), "EventBus subscriber attached");
        Ok(Subscription { inner: sender.subscribe() })
    }

    /// Publishes an event, returning how many subscribers will see it.
    ///
    /// # Errors
    /// Returns [`EventBusError::TypeMismatch`] if the registry is corrupted.
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        let Some(sender) = self.sender::<T>()? else {
            trace!(event = std::any::type_name::<T>(), "EventBus publish without subscribers");
            return Ok(0);
        };

        // A send error only means every receiver is gone.
        Ok(sender.send(Arc::new(event)).unwrap_or(0))
    }

    /// Number of live subscribers for `T`.
    #[must_use]
    pub fn subscriber_count<T: Event>(&self) -> usize {
        self.sender::<T>().ok().flatten().map_or(0, |tx| tx.receiver_count())
    }

    fn sender<T: Event>(&self) -> Result<Option<broadcast::Sender<Arc<T>>>, EventBusError> {
        let channels = self.channels.read();
        channels.get(&TypeId::of::<T>()).map(|slot| downcast::<T>(slot.as_ref())).transpose()
    }

    fn sender_or_create<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        if let Some(sender) = self.sender::<T>()? {
            return Ok(sender);
        }

        let mut channels = self.channels.write();
        let slot = channels.entry(TypeId::of::<T>()).or_insert_with(|| {
            debug!(event = std::any::type_name::<T>(), capacity, "EventBus channel created");
            Box::new(broadcast::channel::<Arc<T>>(capacity).0)
        });
        downcast::<T>(slot.as_ref())
    }
}

fn downcast<T: Event>(
    slot: &(dyn Any + Send + Sync),
) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
    slot.downcast_ref::<broadcast::Sender<Arc<T>>>().cloned().ok_or_else(|| {
        EventBusError::TypeMismatch {
            message: std::any::type_name::<T>().into(),
            context: Some("Unexpected sender type".into()),
        }
    })
}

/// Receiving end for one event type.
#[derive(Debug)]
pub struct Subscription<T> {
    inner: broadcast::Receiver<Arc<T>>,
}

impl<T: Event> Subscription<T> {
    /// Waits for the next event. Lagged events are skipped; `None` means the bus is gone.
    pub async fn next(&mut self) -> Option<Arc<T>> {
        loop {
            match self.inner.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(
                        event = std::any::type_name::<T>(),
                        skipped, "EventBus subscriber lagged; continuing from oldest retained"
                    );
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Returns an already buffered event without waiting.
    pub fn try_next(&mut self) -> Option<Arc<T>> {
        loop {
            match self.inner.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => {},
                Err(_) => return None,
            }
        }
    }
}
