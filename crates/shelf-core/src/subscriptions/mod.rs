//! Built-in subscription sources.
//!
//! - **Timers** ([`After`]) -- keyed one-shot delays, the building block for
//!   debouncing page input.

mod timer;

pub use timer::*;
