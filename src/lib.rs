//! tern: a terminal client for hosted mailboxes.
//!
//! The embedding binary supplies a [`mail::Mailbox`] (and optionally a
//! [`mail::Forwarder`]), builds [`app::Collaborators`] and calls
//! [`app::App::run`].

pub mod actor;
pub mod ai;
pub mod app;
pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod logging;
pub mod mail;
mod ui;

#[cfg(test)]
mod testing;

pub use app::{App, Collaborators};
pub use config::Config;
pub use error::{MailError, MailResult};
