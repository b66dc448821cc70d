//! # optionhub-core
//!
//! Core types, traits and the attribute hierarchy logic for optionhub.
//!
//! - [`tree`] assembles flat attribute value rows into an [`OptionNode`] forest.
//! - [`catalog`] serves vocabulary point lookups and user submissions.
//! - [`search`] decides between vocabulary preview and substring search.
//! - [`pipeline`] runs the persist-then-publish flow for new attribute values.
//! - [`traits`] names the storage and event collaborators; the Postgres
//!   implementations live in `optionhub-db`.

pub mod catalog;
pub mod context;
pub mod defaults;
pub mod error;
pub mod events;
pub mod logging;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod models;
pub mod moderation;
pub mod pipeline;
pub mod search;
pub mod traits;
pub mod tree;

// Re-export commonly used types at crate root
pub use context::RequestContext;
pub use error::{Error, Result};
pub use events::{DomainEvent, EventActor, EventBus, EventEnvelope, PublishedEvent};
pub use models::*;
pub use pipeline::AttributeMutationPipeline;
pub use search::{Lookup, SearchPolicy};
pub use traits::*;
pub use tree::assemble;
