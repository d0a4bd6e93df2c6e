//! Session wiring that composes state, update handlers, and remote commands.

pub use self::message::Intent;
pub use self::options::SessionOptions;
pub use self::runtime::{spawn, SessionHandle};
pub use self::state::SessionView;

mod commands;
mod message;
mod options;
mod runtime;
mod state;
mod update;
