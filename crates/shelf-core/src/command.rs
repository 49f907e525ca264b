use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

/// Work a model hands back to the runtime from [`Model::init`](crate::Model::init)
/// or [`Model::update`](crate::Model::update).
///
/// A command is inert until the runtime executes it: async work is spawned and
/// its output delivered back as a message, an emitted message is queued behind
/// the current one, and `quit` stops the event loop after the current batch.
///
/// ```rust,ignore
/// fn init(flags: Flags) -> (Self, Command<Msg>) {
///     (Self::loading(), Command::perform(flags.source.fetch(), Msg::Loaded))
/// }
/// ```
pub struct Command<Msg: Send + 'static> {
    pub(crate) effect: Effect<Msg>,
}

pub(crate) enum Effect<Msg: Send + 'static> {
    Noop,
    Emit(Msg),
    Quit,
    Task(BoxFuture<'static, Msg>),
    Many(Vec<Command<Msg>>),
}

impl<Msg: Send + 'static> Command<Msg> {
    /// A command that does nothing.
    pub fn none() -> Self {
        Command {
            effect: Effect::Noop,
        }
    }

    /// Spawn `future` and turn its output into a message with `map`.
    pub fn perform<F, T>(future: F, map: impl FnOnce(T) -> Msg + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Command {
            effect: Effect::Task(Box::pin(async move { map(future.await) })),
        }
    }

    /// Queue `msg` for the next update without going through a task.
    pub fn message(msg: Msg) -> Self {
        Command {
            effect: Effect::Emit(msg),
        }
    }

    /// Stop the program once the current batch of messages is handled.
    pub fn quit() -> Self {
        Command {
            effect: Effect::Quit,
        }
    }

    /// Combine several commands.  No-ops are dropped; a single survivor is
    /// returned as-is.
    pub fn batch(cmds: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().filter(|cmd| !cmd.is_none()).collect();
        match cmds.len() {
            0 => Command::none(),
            1 => cmds.pop().unwrap_or_else(Command::none),
            _ => Command {
                effect: Effect::Many(cmds),
            },
        }
    }

    /// Convert every message this command produces with `f`.
    ///
    /// Lets a parent model embed a child's commands under its own message
    /// type.  Quit and no-op commands pass through unchanged.
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Command<NewMsg> {
        self.map_shared(Arc::new(f))
    }

    fn map_shared<NewMsg: Send + 'static>(
        self,
        f: Arc<dyn Fn(Msg) -> NewMsg + Send + Sync>,
    ) -> Command<NewMsg> {
        let effect = match self.effect {
            Effect::Noop => Effect::Noop,
            Effect::Quit => Effect::Quit,
            Effect::Emit(msg) => Effect::Emit(f(msg)),
            Effect::Task(task) => Effect::Task(Box::pin(async move { f(task.await) })),
            Effect::Many(cmds) => Effect::Many(
                cmds.into_iter()
                    .map(|cmd| cmd.map_shared(Arc::clone(&f)))
                    .collect(),
            ),
        };
        Command { effect }
    }

    /// Whether this command does nothing.
    pub fn is_none(&self) -> bool {
        matches!(self.effect, Effect::Noop)
    }

    /// Whether executing this command stops the program.
    pub fn is_quit(&self) -> bool {
        match &self.effect {
            Effect::Quit => true,
            Effect::Many(cmds) => cmds.iter().any(Command::is_quit),
            _ => false,
        }
    }

    /// Whether this command spawns async work.
    pub fn is_async(&self) -> bool {
        match &self.effect {
            Effect::Task(_) => true,
            Effect::Many(cmds) => cmds.iter().any(Command::is_async),
            _ => false,
        }
    }
}
