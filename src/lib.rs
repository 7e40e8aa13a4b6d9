//! # Perfume Shop Telegram Bot
//!
//! A Telegram bot that lets customers browse a perfume catalog and lets the
//! shop administrator add new products through a guided conversation.

pub mod activity;
pub mod bot;
pub mod catalog_model;
pub mod config;
pub mod db;
pub mod dialogue;
pub mod errors;
pub mod localization;
