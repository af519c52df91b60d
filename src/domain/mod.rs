//! Domain layer containing business entities and logic.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click tracking event model
//! - [`click_worker`] - Asynchronous click processing worker
//!
//! # Click Processing Flow
//!
//! 1. HTTP handler resolves an active link and answers with a redirect
//! 2. [`click_event::ClickEvent`] is pushed to a bounded channel without waiting
//! 3. [`click_worker::run_click_worker`] applies the increment with bounded retries
//! 4. The counter is bumped atomically via [`repositories::LinkRepository::increment_clicks`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
