//! `cw-domain`: types shared by every chatwidget crate.
//!
//! Holds the conversation data model ([`chat`]), the configuration tree
//! ([`config`]), the error type ([`error`]), and the structured trace
//! events ([`trace`]).

pub mod chat;
pub mod config;
pub mod error;
pub mod trace;
