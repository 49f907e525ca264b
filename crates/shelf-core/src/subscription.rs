use futures::stream::BoxStream;
use futures::StreamExt;
use std::any::TypeId;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

type Starter<Msg> = Box<dyn FnOnce(mpsc::UnboundedSender<Msg>) -> AbortHandle + Send>;

/// An event source a model keeps running for as long as it keeps declaring it.
///
/// Nothing runs until the runtime starts it.  After every update the runtime
/// compares the declared ids with the running ones: unknown ids are started,
/// missing ids are aborted, and ids present on both sides are left alone.
pub struct Subscription<Msg: Send + 'static> {
    pub(crate) id: SubscriptionId,
    pub(crate) start: Starter<Msg>,
}

/// What two declarations must share to count as the same subscription: the
/// source type and a caller-chosen key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    type_id: TypeId,
    discriminant: u64,
}

impl SubscriptionId {
    /// Id for source type `T` with key `discriminant`.
    pub fn new<T: 'static>(discriminant: u64) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            discriminant,
        }
    }

    /// Id for a source type that is only ever declared once.
    pub fn of<T: 'static>() -> Self {
        Self::new::<T>(0)
    }

    /// The caller-chosen key.
    pub fn discriminant(&self) -> u64 {
        self.discriminant
    }
}

/// A description of a stream, turned into a [`Subscription`] by [`subscribe`].
pub trait SubscriptionSource: Send + 'static {
    /// Item type of the stream.
    type Output: Send + 'static;

    /// Identity used to decide whether an already-running instance is kept.
    fn id(&self) -> SubscriptionId;

    /// Called once, when the runtime first starts the subscription.
    fn stream(self) -> BoxStream<'static, Self::Output>;
}

/// Wrap `source` as a [`Subscription`].
///
/// The source's stream is only created once the runtime starts the
/// subscription, inside its task.  Declaring an id that is already running
/// costs nothing beyond computing the id.
pub fn subscribe<S>(source: S) -> Subscription<S::Output>
where
    S: SubscriptionSource,
{
    Subscription {
        id: source.id(),
        start: Box::new(move |tx| forward(move || source.stream(), tx)),
    }
}

/// Spawn a task that builds a stream with `make` and pushes its items into
/// `tx` until either side ends.
fn forward<Msg, F>(make: F, tx: mpsc::UnboundedSender<Msg>) -> AbortHandle
where
    Msg: Send + 'static,
    F: FnOnce() -> BoxStream<'static, Msg> + Send + 'static,
{
    tokio::spawn(async move {
        let mut stream = make();
        while let Some(msg) = stream.next().await {
            if tx.send(msg).is_err() {
                return;
            }
        }
    })
    .abort_handle()
}

impl<Msg: Send + 'static> Subscription<Msg> {
    /// Forward every item of `stream` to the runtime until the stream ends or
    /// the subscription is dropped from the model's declarations.
    pub fn from_stream(id: SubscriptionId, stream: BoxStream<'static, Msg>) -> Self {
        Subscription {
            id,
            start: Box::new(move |tx| forward(move || stream, tx)),
        }
    }

    /// The identity the runtime reconciles this subscription by.
    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    /// Convert the output into another message type.  The id is unchanged.
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Subscription<NewMsg> {
        let start = self.start;
        Subscription {
            id: self.id,
            start: Box::new(move |tx: mpsc::UnboundedSender<NewMsg>| {
                let (raw_tx, mut raw_rx) = mpsc::unbounded_channel::<Msg>();
                let source = start(raw_tx);
                // Ends when the source task is aborted and raw_tx is dropped.
                tokio::spawn(async move {
                    while let Some(msg) = raw_rx.recv().await {
                        if tx.send(f(msg)).is_err() {
                            return;
                        }
                    }
                });
                source
            }),
        }
    }
}

/// The set of running subscriptions, keyed by id.
pub(crate) struct SubscriptionManager<Msg: Send + 'static> {
    running: HashMap<SubscriptionId, AbortHandle>,
    msg_tx: mpsc::UnboundedSender<Msg>,
}

impl<Msg: Send + 'static> SubscriptionManager<Msg> {
    /// Started subscriptions send into `msg_tx`.
    pub fn new(msg_tx: mpsc::UnboundedSender<Msg>) -> Self {
        Self {
            running: HashMap::new(),
            msg_tx,
        }
    }

    /// Make the running set match `declared`.
    pub fn reconcile(&mut self, declared: Vec<Subscription<Msg>>) {
        let mut declared: HashMap<SubscriptionId, Subscription<Msg>> =
            declared.into_iter().map(|sub| (sub.id.clone(), sub)).collect();

        self.running.retain(|id, handle| {
            let keep = declared.remove(id).is_some();
            if !keep {
                handle.abort();
            }
            keep
        });

        for (id, sub) in declared {
            let handle = (sub.start)(self.msg_tx.clone());
            self.running.insert(id, handle);
        }
    }

    /// Abort everything that is running.
    pub fn shutdown(&mut self) {
        for (_, handle) in self.running.drain() {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub fn active_count(&self) -> usize {
        self.running.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Timer;

    fn silent(key: u64) -> Subscription<i32> {
        Subscription::from_stream(
            SubscriptionId::new::<Timer>(key),
            Box::pin(futures::stream::pending()),
        )
    }

    #[test]
    fn ids_compare_type_and_key() {
        assert_eq!(SubscriptionId::of::<Timer>(), SubscriptionId::new::<Timer>(0));
        assert_ne!(SubscriptionId::of::<Timer>(), SubscriptionId::of::<String>());
        assert_ne!(SubscriptionId::new::<Timer>(1), SubscriptionId::new::<Timer>(2));
        assert_eq!(SubscriptionId::new::<Timer>(5).discriminant(), 5);
    }

    #[tokio::test]
    async fn reconcile_starts_and_stops() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);

        manager.reconcile(vec![silent(1), silent(2)]);
        assert_eq!(manager.active_count(), 2);

        manager.reconcile(vec![silent(2)]);
        assert_eq!(manager.active_count(), 1);

        manager.reconcile(vec![]);
        assert_eq!(manager.active_count(), 0);
    }

    #[tokio::test]
    async fn new_key_replaces_old_subscription() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);

        manager.reconcile(vec![silent(1)]);
        manager.reconcile(vec![silent(2)]);
        assert_eq!(manager.active_count(), 1);
        assert!(manager.running.contains_key(&SubscriptionId::new::<Timer>(2)));
    }

    #[tokio::test]
    async fn redeclared_subscription_is_not_restarted() {
        let (tx, mut rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);

        let once = |n: i32| {
            Subscription::from_stream(
                SubscriptionId::of::<Timer>(),
                Box::pin(futures::stream::once(async move { n })),
            )
        };
        manager.reconcile(vec![once(1)]);
        manager.reconcile(vec![once(2)]);

        assert_eq!(rx.recv().await, Some(1));
        manager.shutdown();
        assert_eq!(manager.active_count(), 0);
        assert!(rx.try_recv().is_err());
    }

    /// Counts how often its stream is built.
    struct Counted(std::sync::Arc<std::sync::atomic::AtomicUsize>);

    impl SubscriptionSource for Counted {
        type Output = i32;

        fn id(&self) -> SubscriptionId {
            SubscriptionId::of::<Counted>()
        }

        fn stream(self) -> BoxStream<'static, i32> {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Box::pin(futures::stream::pending())
        }
    }

    #[test]
    fn subscribe_builds_nothing_until_started() {
        let built = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let sub = subscribe(Counted(built.clone()));
        assert_eq!(sub.id(), &SubscriptionId::of::<Counted>());
        drop(sub);
        assert_eq!(built.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn redeclaring_a_running_source_builds_one_stream() {
        let built = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);

        for _ in 0..3 {
            manager.reconcile(vec![subscribe(Counted(built.clone()))]);
        }
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert_eq!(manager.active_count(), 1);
        assert_eq!(built.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn map_keeps_id() {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let mut manager = SubscriptionManager::new(tx);

        let sub = Subscription::from_stream(
            SubscriptionId::new::<Timer>(9),
            Box::pin(futures::stream::once(async { 4 })),
        )
        .map(|n: i32| format!("n={n}"));
        assert_eq!(sub.id(), &SubscriptionId::new::<Timer>(9));

        manager.reconcile(vec![sub]);
        assert_eq!(rx.recv().await.as_deref(), Some("n=4"));
    }
}
