//! socroute CLI library.
//!
//! Output formatting shared by the `socroute` subcommands.

pub mod output;
