//! Runtime for **shelf** page views.
//!
//! A view is a [`Model`]: it owns its state, changes it only in response to
//! messages, and describes its output by writing regions of a [`Page`].
//! Side effects never happen inside the model.  It returns a [`Command`]
//! (spawn a task, emit a message, quit) or declares [`Subscription`]s
//! (such as the keyed [`After`] timer), and the runtime carries them out.
//!
//! [`Program`] hosts a model on tokio and publishes every rendered page.
//! [`testing::TestProgram`] runs the same model synchronously for unit
//! tests.  [`html::escape`] is the one place markup escaping lives.

pub mod command;
pub mod html;
pub mod model;
pub mod page;
pub mod runtime;
pub mod subscription;
pub mod subscriptions;
pub mod testing;

pub use command::Command;
pub use model::Model;
pub use page::{Fragment, Page, Region};
pub use runtime::{Program, ProgramError, ProgramHandle, ProgramOptions};
pub use subscription::{subscribe, Subscription, SubscriptionId, SubscriptionSource};
pub use subscriptions::After;

/// Run a model with default options until it quits.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags).run().await
}

/// Like [`run`], with explicit [`ProgramOptions`].
pub async fn run_with<M: Model>(
    flags: M::Flags,
    options: ProgramOptions,
) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options).run().await
}
