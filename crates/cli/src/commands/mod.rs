//! One-shot subcommands: `arena duel` and `arena history`.

pub(crate) mod duel;
pub(crate) mod history;
