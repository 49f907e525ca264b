use crate::command::{Command, Effect};
use crate::model::Model;
use crate::page::Page;
use crate::subscription::SubscriptionManager;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch, Notify};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// Installing or polling the Ctrl-C handler failed.
    #[error("signal handler failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Event loop tuning.  Override single fields with struct update syntax:
///
/// ```rust,ignore
/// let options = ProgramOptions {
///     handle_signals: false,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Stop cleanly on Ctrl-C (default: true).
    pub handle_signals: bool,
    /// After a message arrives, keep taking already-queued messages for at
    /// most this long before rendering (default: 100µs).
    pub batch_window: Duration,
    /// Upper bound on extra messages taken per render (default: 100).
    pub batch_limit: u32,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            handle_signals: true,
            batch_window: Duration::from_micros(100),
            batch_limit: 100,
        }
    }
}

/// Injects page events into a [`Program`] and can stop it.  Cheap to clone.
#[derive(Clone)]
pub struct ProgramHandle<Msg: Send + 'static> {
    msg_tx: mpsc::UnboundedSender<Msg>,
    kill: Arc<Notify>,
}

impl<Msg: Send + 'static> ProgramHandle<Msg> {
    /// Queue `msg`.  Dropped silently once the program has exited.
    pub fn send(&self, msg: Msg) {
        let _ = self.msg_tx.send(msg);
    }

    /// Stop the program without handling the messages still queued.
    pub fn kill(&self) {
        self.kill.notify_one();
    }
}

/// Hosts a [`Model`]: runs its commands, keeps its subscriptions in sync,
/// and renders it into a [`Page`].
///
/// Messages are handled strictly one at a time.  After each message the
/// model's subscriptions are reconciled; after each batch of messages the
/// page is re-rendered and published (see [`Program::pages`]).
///
/// ```rust,ignore
/// let program = Program::<CatalogView>::new(flags);
/// let events = program.handle();
/// let pages = program.pages();
/// let view = program.run().await?;
/// ```
pub struct Program<M: Model> {
    model: M,
    page: Page,
    page_tx: watch::Sender<Page>,
    msg_tx: mpsc::UnboundedSender<M::Message>,
    msg_rx: mpsc::UnboundedReceiver<M::Message>,
    subscriptions: SubscriptionManager<M::Message>,
    options: ProgramOptions,
    quitting: bool,
    kill: Arc<Notify>,
}

impl<M: Model> Program<M> {
    /// Build the model and start its init command.  Needs a tokio runtime.
    pub fn new(flags: M::Flags) -> Self {
        Self::with_options(flags, ProgramOptions::default())
    }

    /// Like [`Program::new`] with explicit event loop tuning.
    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (page_tx, _) = watch::channel(Page::new());
        let (model, init) = M::init(flags);

        let mut program = Self {
            model,
            page: Page::new(),
            page_tx,
            subscriptions: SubscriptionManager::new(msg_tx.clone()),
            msg_tx,
            msg_rx,
            options,
            quitting: false,
            kill: Arc::new(Notify::new()),
        };
        program.execute(init);
        program.sync_subscriptions();
        debug!("program initialized");
        program
    }

    /// A handle for feeding page events in from outside the loop.
    pub fn handle(&self) -> ProgramHandle<M::Message> {
        ProgramHandle {
            msg_tx: self.msg_tx.clone(),
            kill: Arc::clone(&self.kill),
        }
    }

    /// Receiver that always holds the most recently rendered page.
    pub fn pages(&self) -> watch::Receiver<Page> {
        self.page_tx.subscribe()
    }

    /// Run until the model quits or the program is stopped, then hand the
    /// model back.
    pub async fn run(mut self) -> Result<M, ProgramError> {
        let outcome = self.event_loop().await;
        self.subscriptions.shutdown();
        debug!("program stopped");
        outcome.map(|()| self.model)
    }

    async fn event_loop(&mut self) -> Result<(), ProgramError> {
        self.render();
        let signals = self.options.handle_signals;

        while !self.quitting {
            tokio::select! {
                biased;

                _ = self.kill.notified() => {
                    debug!("program killed");
                    break;
                }

                res = tokio::signal::ctrl_c(), if signals => {
                    res?;
                    debug!("interrupted");
                    break;
                }

                Some(msg) = self.msg_rx.recv() => {
                    self.handle_message(msg);
                    self.drain_queued();
                    self.render();
                }
            }
        }
        Ok(())
    }

    /// Take messages that are already waiting, within the batch limits.
    fn drain_queued(&mut self) {
        let deadline = Instant::now() + self.options.batch_window;
        let mut taken = 0;
        while !self.quitting && taken < self.options.batch_limit && Instant::now() < deadline {
            let Ok(msg) = self.msg_rx.try_recv() else {
                break;
            };
            self.handle_message(msg);
            taken += 1;
        }
    }

    fn handle_message(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.execute(cmd);
        self.sync_subscriptions();
    }

    fn sync_subscriptions(&mut self) {
        let declared = self.model.subscriptions();
        self.subscriptions.reconcile(declared);
    }

    fn execute(&mut self, cmd: Command<M::Message>) {
        match cmd.effect {
            Effect::Noop => {}
            Effect::Emit(msg) => {
                let _ = self.msg_tx.send(msg);
            }
            Effect::Quit => self.quitting = true,
            Effect::Task(task) => {
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let _ = tx.send(task.await);
                });
            }
            Effect::Many(cmds) => cmds.into_iter().for_each(|cmd| self.execute(cmd)),
        }
    }

    fn render(&mut self) {
        self.model.view(&mut self.page);
        self.page_tx.send_replace(self.page.clone());
    }
}
