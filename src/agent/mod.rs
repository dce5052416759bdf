//! The recursive round controller.
//!
//! One user turn becomes a bounded loop of rounds: send the transcript plus
//! tool descriptors, inspect the reply, execute any requested tools strictly
//! in response order, feed the results back, repeat. [`Agent`] is the sole
//! entry point; [`AgentOptions`] configures it.

mod options;
mod runner;

pub use options::AgentOptions;
pub use runner::{Agent, DEFAULT_MAX_RECURSIONS, MAX_RECURSIONS_MESSAGE};
