//! # ParchiPay Core Library
//!
//! Core business logic for ParchiPay, a rotating-savings ("chit fund")
//! committee manager. All operations are available through the standalone
//! CLI binary; any GUI would be a thin layer over this same library.
//!
//! ## Architecture
//!
//! - **Model & Evaluator**: committee/member records plus pure cycle and
//!   draw-eligibility queries
//! - **Draw Engine**: a wall-clock-based reveal state machine around a
//!   single uniform random selection; the caller periodically invokes
//!   `tick()` while a draw is in flight
//! - **Mutation Service**: pure committee transformations (record a draw,
//!   cycle a payment marking, create a committee), published atomically
//!   through the directory
//! - **Reminder Scheduler**: due-date proximity with durable one-shot
//!   markers
//! - **Storage**: SQLite kv flag store and TOML-based configuration
//! - **Collaborators**: rules text generation (Gemini) and WhatsApp
//!   message handoff
//!
//! ## Key Components
//!
//! - [`DrawEngine`]: draw reveal state machine
//! - [`Directory`]: in-memory user/committee registry
//! - [`Database`]: durable flag store
//! - [`ReminderScheduler`](reminder::ReminderScheduler): due-date reminders

pub mod collaborators;
pub mod directory;
pub mod draw;
pub mod error;
pub mod events;
pub mod ledger;
pub mod model;
pub mod reminder;
pub mod service;
pub mod storage;

pub use directory::Directory;
pub use draw::{select_winner, DrawEngine, DrawPacing, DrawState};
pub use error::{ConfigError, CoreError, Refusal, StoreError};
pub use events::Event;
pub use ledger::{Notification, NotificationLedger, ReadSet};
pub use model::{
    Committee, CommitteeStatus, Draw, Member, MemberStatus, PaymentRecord, PaymentStatus, Role,
    User,
};
pub use storage::{Config, Database};
