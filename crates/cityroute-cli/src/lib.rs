//! cityroute CLI library.
//!
//! Graph file loading, command handlers and output rendering for the
//! `cityroute-cli` binary. Handlers return the rendered text so they can be
//! exercised without spawning the binary.

pub mod commands;
pub mod loader;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
