//! Outbound notification sinks.

pub mod telegram;

pub use telegram::{Notifier, TelegramNotifier};
