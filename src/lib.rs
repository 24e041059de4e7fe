//! Client for a student activity monitoring backend.
//!
//! The core is [`controller::ActivityViewController`], which owns the
//! mouse/keyboard tab state, starts and stops monitoring over the backend's
//! REST API, and renders fetched activity into per-tab tables.

pub mod activity;
pub mod api;
pub mod cli;
pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod emotion;
pub mod notify;
pub mod utils;
pub mod view;
