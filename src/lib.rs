//! Inquiry - a multi-step contact form for the terminal
//!
//! The wizard core (`form`, `wizard`) is front-end agnostic: it validates
//! steps, tracks navigation and drives a single submission at a time. The
//! `ui` and `app` modules draw it with ratatui, and `api` posts the collected
//! fields to a Formspree-style endpoint.

pub mod api;
pub mod app;
pub mod config;
pub mod form;
pub mod logging;
pub mod notifications;
pub mod theme;
pub mod ui;
pub mod wizard;
