//! `cw-gateway`: the `chatwidget` binary's library half: HTTP API,
//! application state, bootstrap and CLI commands.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod state;
