use flume::{Receiver, Sender};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Toast {
    pub message: String,
}

/// Transient user-facing notifications. Whatever shell hosts the store
/// subscribes to the receiver and renders the messages.
#[derive(Clone)]
pub struct Toasts {
    sender: Sender<Toast>,
    receiver: Receiver<Toast>,
}

impl Default for Toasts {
    fn default() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }
}

impl Toasts {
    pub fn raise(&self, message: impl Into<String>) {
        let toast = Toast {
            message: message.into(),
        };
        log::trace!("Toast: {}", toast.message);
        let _ = self.sender.send(toast);
    }

    pub fn subscribe(&self) -> Receiver<Toast> {
        self.receiver.clone()
    }

    /// Everything raised since the last drain.
    pub fn drain(&self) -> Vec<Toast> {
        self.receiver.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raised_toasts_reach_subscribers() {
        let toasts = Toasts::default();
        let receiver = toasts.subscribe();
        toasts.raise("User updated!");
        assert_eq!(receiver.try_recv().unwrap().message, "User updated!");
    }
}
