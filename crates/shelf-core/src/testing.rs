//! Driving a [`Model`] from plain `#[test]` functions.

use crate::command::{Command, Effect};
use crate::model::Model;
use crate::page::Page;
use crate::subscription::SubscriptionId;

/// Runs a model's init/update/view cycle synchronously.
///
/// No tokio runtime is involved.  Messages emitted with [`Command::message`]
/// are queued until [`drain_messages`](TestProgram::drain_messages); async
/// tasks are only counted, so a test plays the part of the task by sending
/// its result message itself.  Subscriptions are never started, but their
/// ids can be inspected.
///
/// ```rust,ignore
/// let mut prog = TestProgram::<CatalogView>::new(flags);
/// assert_eq!(prog.async_commands(), 1);
/// prog.send(Msg::Loaded(Ok(catalog)));
/// assert_eq!(prog.render().text("catalogCount"), Some("2 of 2 items"));
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    queued: Vec<M::Message>,
    tasks: usize,
    quit: bool,
    page: Page,
}

impl<M: Model> TestProgram<M> {
    /// Call [`Model::init`] with `flags` and absorb the command it returns.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init) = M::init(flags);
        let mut program = Self {
            model,
            queued: Vec::new(),
            tasks: 0,
            quit: false,
            page: Page::new(),
        };
        program.absorb(init);
        program
    }

    /// Run one update.  Messages it emits stay queued.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.absorb(cmd);
    }

    /// Handle queued messages, and whatever they emit in turn, until the
    /// queue is empty.
    pub fn drain_messages(&mut self) {
        while !self.queued.is_empty() {
            for msg in std::mem::take(&mut self.queued) {
                self.send(msg);
            }
        }
    }

    /// The model, for assertions.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The model, for arranging state a message cannot reach.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Render into the page kept by this harness.  As in [`Program`](crate::Program),
    /// regions the model skips keep their earlier content.
    pub fn render(&mut self) -> &Page {
        self.model.view(&mut self.page);
        &self.page
    }

    /// Render into an empty page.
    pub fn render_fresh(&self) -> Page {
        let mut page = Page::new();
        self.model.view(&mut page);
        page
    }

    /// Ids of the subscriptions the model declares right now.
    pub fn subscription_ids(&self) -> Vec<SubscriptionId> {
        self.model
            .subscriptions()
            .iter()
            .map(|sub| sub.id().clone())
            .collect()
    }

    /// Async tasks requested so far.
    pub fn async_commands(&self) -> usize {
        self.tasks
    }

    /// Whether any command so far asked the program to stop.
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    fn absorb(&mut self, cmd: Command<M::Message>) {
        match cmd.effect {
            Effect::Noop => {}
            Effect::Emit(msg) => self.queued.push(msg),
            Effect::Quit => self.quit = true,
            Effect::Task(_) => self.tasks += 1,
            Effect::Many(cmds) => {
                for cmd in cmds {
                    self.absorb(cmd);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::{subscribe, Subscription};
    use crate::subscriptions::After;
    use std::time::Duration;

    /// A tally that loads its start value from a task and echoes follow-ups.
    struct Tally {
        total: i64,
        log: Vec<&'static str>,
        snooze: Option<u64>,
    }

    #[derive(Debug)]
    enum Op {
        Add(i64),
        Seeded(i64),
        Twice(i64),
        Snooze(u64),
        Finish,
    }

    impl Model for Tally {
        type Message = Op;
        type Flags = i64;

        fn init(seed: i64) -> (Self, Command<Op>) {
            let tally = Tally {
                total: 0,
                log: Vec::new(),
                snooze: None,
            };
            (tally, Command::perform(async move { seed }, Op::Seeded))
        }

        fn update(&mut self, op: Op) -> Command<Op> {
            match op {
                Op::Add(n) => {
                    self.total += n;
                    self.log.push("add");
                }
                Op::Seeded(n) => {
                    self.total = n;
                    self.log.push("seeded");
                }
                Op::Twice(n) => {
                    self.log.push("twice");
                    return Command::batch([Command::message(Op::Add(n)), Command::message(Op::Add(n))]);
                }
                Op::Snooze(key) => self.snooze = Some(key),
                Op::Finish => return Command::quit(),
            }
            Command::none()
        }

        fn view(&self, page: &mut Page) {
            if self.total != 0 {
                page.set_text("total", self.total.to_string());
            }
        }

        fn subscriptions(&self) -> Vec<Subscription<Op>> {
            self.snooze
                .map(|key| subscribe(After::new(Duration::from_secs(1)).keyed(key)).map(|_| Op::Finish))
                .into_iter()
                .collect()
        }
    }

    #[test]
    fn init_task_is_counted_not_run() {
        let prog = TestProgram::<Tally>::new(42);
        assert_eq!(prog.async_commands(), 1);
        assert_eq!(prog.model().total, 0);
    }

    #[test]
    fn task_result_is_delivered_by_hand() {
        let mut prog = TestProgram::<Tally>::new(42);
        prog.send(Op::Seeded(42));
        prog.send(Op::Add(-2));
        assert_eq!(prog.model().total, 40);
        assert_eq!(prog.render().text("total"), Some("40"));
    }

    #[test]
    fn emitted_messages_wait_for_drain() {
        let mut prog = TestProgram::<Tally>::new(0);
        prog.send(Op::Twice(3));
        assert_eq!(prog.model().total, 0);

        prog.drain_messages();
        assert_eq!(prog.model().total, 6);
        assert_eq!(prog.model().log, vec!["twice", "add", "add"]);
    }

    #[test]
    fn persistent_page_keeps_skipped_regions() {
        let mut prog = TestProgram::<Tally>::new(0);
        prog.send(Op::Add(5));
        prog.render();
        prog.send(Op::Add(-5));
        assert_eq!(prog.render().text("total"), Some("5"));
        assert!(prog.render_fresh().is_empty());
    }

    #[test]
    fn quit_is_recorded() {
        let mut prog = TestProgram::<Tally>::new(0);
        assert!(!prog.quit_requested());
        prog.send(Op::Finish);
        assert!(prog.quit_requested());
        assert!(prog.subscription_ids().is_empty());
    }

    #[test]
    fn declared_timers_are_listed_without_a_runtime() {
        let mut prog = TestProgram::<Tally>::new(0);
        assert!(prog.subscription_ids().is_empty());

        prog.send(Op::Snooze(7));
        let ids = prog.subscription_ids();
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].discriminant(), 7);
        assert!(!prog.quit_requested());
    }
}
