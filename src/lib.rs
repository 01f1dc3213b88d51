//! Trainer Payments - Kaspi Pay checkout for training packages
//!
//! This crate sells training packages through Kaspi QR payments, keeps the
//! payment lifecycle in sync via polling and signed webhooks, and turns
//! completed payments into session subscriptions.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
