use crate::command::Command;
use crate::page::Page;
use crate::subscription::Subscription;

/// A view hosted by the shelf runtime.
///
/// State lives in the model and changes only inside [`update`](Model::update).
/// The runtime calls [`view`](Model::view) after each batch of updates and
/// re-reads [`subscriptions`](Model::subscriptions) after every single update,
/// starting and cancelling event sources as the returned set changes.
///
/// ```rust,ignore
/// impl Model for Clock {
///     type Message = Tick;
///     type Flags = Duration;
///
///     fn init(period: Duration) -> (Self, Command<Tick>) {
///         (Clock { period, ticks: 0 }, Command::none())
///     }
///
///     fn update(&mut self, _: Tick) -> Command<Tick> {
///         self.ticks += 1;
///         Command::none()
///     }
///
///     fn view(&self, page: &mut Page) {
///         page.set_text("ticks", self.ticks.to_string());
///     }
///
///     fn subscriptions(&self) -> Vec<Subscription<Tick>> {
///         vec![subscribe(After::new(self.period).keyed(self.ticks)).map(|_| Tick)]
///     }
/// }
/// ```
pub trait Model: Sized + Send + 'static {
    /// Everything that can change the model: page events, timer firings,
    /// results of async work.
    type Message: Send + 'static;

    /// Start-up input handed to [`init`](Model::init).
    type Flags: Send + 'static;

    /// Build the initial state, plus any work to start right away.
    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Write the current state into `page`.
    ///
    /// The page outlives a single render: regions not written this time keep
    /// whatever they held before.
    fn view(&self, page: &mut Page);

    /// Event sources that should be running for the current state.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        Vec::new()
    }
}
