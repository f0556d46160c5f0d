use std::{fmt, time::Duration};

use tokio::sync::{Mutex, oneshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendezvousError {
    /// The single value was already received.
    Consumed,
    /// The other side went away without handing anything over.
    Closed,
    /// The sending side reported that it could not produce a value.
    Aborted(String),
    TimedOut(Duration),
    /// A value (or failure) was already handed over.
    AlreadyDelivered,
}

impl fmt::Display for RendezvousError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RendezvousError::Consumed => write!(f, "login result was already consumed"),
            RendezvousError::Closed => write!(f, "login listener stopped before completing"),
            RendezvousError::Aborted(reason) => write!(f, "login failed: {}", reason),
            RendezvousError::TimedOut(after) => {
                write!(f, "login was not completed within {}s", after.as_secs())
            }
            RendezvousError::AlreadyDelivered => write!(f, "login result was already delivered"),
        }
    }
}

impl std::error::Error for RendezvousError {}

type Slot<T> = Result<T, String>;

/// Single-slot, single-use hand-off between two concurrently running tasks.
///
/// Exactly one value (or one failure signal) can be delivered and exactly one
/// receive can observe it. Any further delivery fails with
/// [`RendezvousError::AlreadyDelivered`] and any further receive fails
/// immediately with [`RendezvousError::Consumed`].
///
/// Create it before the producing task starts, so a delivery always finds a
/// receiver.
pub struct Rendezvous<T> {
    sender: Mutex<Option<oneshot::Sender<Slot<T>>>>,
    receiver: Mutex<Option<oneshot::Receiver<Slot<T>>>>,
}

impl<T> Rendezvous<T> {
    pub fn new() -> Self {
        let (tx, rx) = oneshot::channel();
        Self {
            sender: Mutex::new(Some(tx)),
            receiver: Mutex::new(Some(rx)),
        }
    }

    /// Takes the delivering side. Only one claim ever succeeds; later claims,
    /// deliveries and aborts fail with [`RendezvousError::AlreadyDelivered`].
    ///
    /// Dropping the returned [`Delivery`] unused releases the receiver with
    /// [`RendezvousError::Closed`].
    pub async fn claim(&self) -> Result<Delivery<T>, RendezvousError> {
        let sender = self
            .sender
            .lock()
            .await
            .take()
            .ok_or(RendezvousError::AlreadyDelivered)?;

        Ok(Delivery { sender })
    }

    pub async fn deliver(&self, value: T) -> Result<(), RendezvousError> {
        self.claim().await?.deliver(value)
    }

    /// Hands over a failure instead of a value, releasing the waiting side.
    pub async fn abort(&self, reason: impl Into<String>) -> Result<(), RendezvousError> {
        self.claim().await?.abort(reason)
    }

    /// Whether the slot can still accept a delivery.
    pub async fn is_open(&self) -> bool {
        self.sender.lock().await.is_some()
    }

    /// Waits for the delivered value, at most `timeout` if one is given.
    pub async fn receive(&self, timeout: Option<Duration>) -> Result<T, RendezvousError> {
        let receiver = self
            .receiver
            .lock()
            .await
            .take()
            .ok_or(RendezvousError::Consumed)?;

        let slot = match timeout {
            Some(after) => tokio::time::timeout(after, receiver)
                .await
                .map_err(|_| RendezvousError::TimedOut(after))?,
            None => receiver.await,
        };

        match slot {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(reason)) => Err(RendezvousError::Aborted(reason)),
            Err(_) => Err(RendezvousError::Closed),
        }
    }
}

impl<T> Default for Rendezvous<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The claimed delivering side of a [`Rendezvous`].
pub struct Delivery<T> {
    sender: oneshot::Sender<Slot<T>>,
}

impl<T> Delivery<T> {
    pub fn deliver(self, value: T) -> Result<(), RendezvousError> {
        self.send(Ok(value))
    }

    pub fn abort(self, reason: impl Into<String>) -> Result<(), RendezvousError> {
        self.send(Err(reason.into()))
    }

    fn send(self, slot: Slot<T>) -> Result<(), RendezvousError> {
        self.sender.send(slot).map_err(|_| RendezvousError::Closed)
    }
}
