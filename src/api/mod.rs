//! # API Module
//!
//! This module provides the HTTP routes of the duplicate finder. Each route
//! is an async handler wired into the router in [`crate::server`].
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`home`] - Sends an authenticated browser to the playlist chooser and
//!   everyone else to Spotify's consent page.
//! - [`callback`] - Completes the authorization code flow and stores the
//!   token in the caller's session.
//! - [`logout`] - Destroys the session.
//!
//! ### Playlists
//!
//! - [`choose_playlists`] - Renders the user's playlists as a checkbox form.
//! - [`select_playlists`] - Accepts the form; exactly two selections lead to
//!   the comparison, anything else re-renders the chooser.
//! - [`find_duplicates`] - Renders the songs both playlists share.
//!
//! ### Monitoring
//!
//! - [`health`] - Status and version as JSON.
//!
//! ## Session Requirements
//!
//! Every playlist route requires a valid token in the session. Handlers
//! obtain it through [`crate::management::TokenManager`], and a missing or
//! unusable token surfaces as [`crate::Error::Auth`], which redirects to `/`.

mod callback;
mod health;
mod home;
pub mod pages;
mod playlists;

pub use callback::callback;
pub use health::health;
pub use home::{home, logout};
pub use playlists::{choose_playlists, find_duplicates, select_playlists};
