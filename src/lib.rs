//! Rollo - Recurring Tasks for Plain-Text Daily Notes
//!
//! A scheduling and rollover engine for markdown note vaults: recurrence
//! rules declared inline on a source page are evaluated each day, unfinished
//! items are vacuumed out of recent daily records, and everything lands in
//! today's record exactly once.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`rule`] - Recurrence directives and the line parser
//! - [`due`] - Due-day evaluation (strict and completion strategies)
//! - [`completion`] - Completion records and the index built from them
//! - [`vacuum`] - Reclaiming unfinished items from past records
//! - [`merge`] - Duplicate-suppressing insertion into today's record
//! - [`engine`] - Run orchestration
//! - [`store`] - Record storage
//! - [`config`] - Configuration loading and validation
//! - [`error`] - Custom error types and handling
//! - [`testing`] - Testing infrastructure (mocks, fixtures)
//!
//! # Example
//!
//! ```rust,ignore
//! use rollo::{ConsoleNotifier, Engine, EngineConfig, FsCompletionSource, FsRecordStore};
//!
//! // Load the vault configuration
//! let config = EngineConfig::load(std::path::Path::new("."))?;
//!
//! // Wire the engine to the vault
//! let mut engine = Engine::new(
//!     config,
//!     FsRecordStore::new("."),
//!     FsCompletionSource::new(".")?,
//!     ConsoleNotifier::new(),
//! )?;
//!
//! // Evaluate and roll over into today's record
//! let summary = engine.run(chrono::Local::now().date_naive(), false)?;
//! println!("{}", summary);
//! ```

pub mod completion;
pub mod config;
pub mod due;
pub mod engine;
pub mod error;
pub mod merge;
pub mod notify;
pub mod rule;
pub mod store;
pub mod testing;
pub mod vacuum;

// Re-export commonly used types
pub use error::{Result, RolloError};

// Re-export config types
pub use config::EngineConfig;

// Re-export rule types
pub use rule::{
    LineParser, ParseStrategyError, ParseUnitError, RecurrenceRule, Strategy, Unit,
};

// Re-export evaluation types
pub use due::{is_due, is_weekend, RecordProbe};

// Re-export completion types
pub use completion::{CompletionIndex, CompletionRecord, CompletionSource, FsCompletionSource};

// Re-export storage types
pub use store::{record_name, FsRecordStore, RecordStore};

// Re-export engine types
pub use engine::{Engine, ItemOrigin, LineReport, RunSummary, ToAddItem};

// Re-export merge and vacuum types
pub use merge::{merge_into, MergeOutcome};
pub use vacuum::{rewrite_unfinished, SectionRewrite};

// Re-export notification types
pub use notify::{ConsoleNotifier, Notifier, NullNotifier};

// Re-export testing types for convenience
pub use testing::{BufferNotifier, MemoryRecordStore, StaticCompletionSource};

// VaultFixture is only available in test builds
#[cfg(test)]
pub use testing::VaultFixture;
