//! Built-in numbering provider implementations.

#[cfg(feature = "twilio")]
pub mod twilio;
