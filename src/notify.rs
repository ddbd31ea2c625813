//! Run notifications.
//!
//! The engine announces each run's outcome through a [`Notifier`]. The
//! console implementation prints to stdout; tests capture messages in a
//! buffer instead.

use colored::Colorize;

/// Sink for run outcome announcements.
pub trait Notifier {
    /// Deliver a notification message.
    fn notify(&self, message: &str);
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn notify(&self, message: &str) {
        (**self).notify(message);
    }
}

/// Notifier that prints to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        println!("{} {}", "Rollo:".cyan().bold(), message);
    }
}

/// Notifier that discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl NullNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for NullNotifier {
    fn notify(&self, _message: &str) {}
}
