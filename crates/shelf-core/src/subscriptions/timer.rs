use crate::subscription::{SubscriptionId, SubscriptionSource};
use futures::stream::{BoxStream, StreamExt};
use std::time::{Duration, Instant};

/// Yields one [`Instant`] after `duration`, then ends.
///
/// Identity comes from `key` alone.  Declaring the same key on every update
/// leaves the running timer untouched; declaring a new key aborts the old
/// timer and starts over.  Bumping the key on each keystroke therefore gives
/// a debounce:
///
/// ```rust,ignore
/// subscribe(After::new(Duration::from_millis(250)).keyed(generation))
///     .map(move |_| Msg::SearchSettled(generation))
/// ```
pub struct After {
    /// Delay before the single item is yielded.
    pub duration: Duration,
    /// Identity of this timer; see [`After::keyed`].
    pub key: u64,
}

impl After {
    /// A timer with key `0`.
    pub fn new(duration: Duration) -> Self {
        Self { duration, key: 0 }
    }

    /// Give the timer its own identity.  Timers with different keys are
    /// different subscriptions, whatever their durations.
    pub fn keyed(mut self, key: u64) -> Self {
        self.key = key;
        self
    }
}

impl SubscriptionSource for After {
    type Output = Instant;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::new::<Self>(self.key)
    }

    fn stream(self) -> BoxStream<'static, Instant> {
        // The sleep is created on first poll, inside the runtime.
        let duration = self.duration;
        futures::stream::once(async move {
            tokio::time::sleep(duration).await;
            Instant::now()
        })
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_drives_identity() {
        let a = After::new(Duration::from_millis(250)).keyed(1);
        let b = After::new(Duration::from_millis(250)).keyed(2);
        let c = After::new(Duration::from_millis(500)).keyed(1);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id(), c.id());
    }

    #[test]
    fn declaring_needs_no_runtime() {
        let sub = crate::subscription::subscribe(After::new(Duration::from_millis(250)).keyed(4))
            .map(|_| ());
        assert_eq!(sub.id(), &SubscriptionId::new::<After>(4));
        drop(After::new(Duration::from_millis(250)).stream());
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_delay() {
        let start = tokio::time::Instant::now();
        let mut stream = After::new(Duration::from_millis(250)).stream();

        assert!(stream.next().await.is_some());
        assert!(start.elapsed() >= Duration::from_millis(250));
        assert!(stream.next().await.is_none());
    }
}
