//! Session crate owning the optimistic task store and the single-writer runtime that drives it.

mod app;
mod telemetry;

pub use app::{spawn, Intent, SessionHandle, SessionOptions, SessionView};
