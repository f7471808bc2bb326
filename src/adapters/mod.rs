//! Concrete adapter implementations for ports.

pub mod json_store_adapter;
pub mod log_notifier;
pub mod paper_broker;
pub mod telegram;
pub mod web;
