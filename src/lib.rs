//! # Pasag Family Tree
//!
//! Dataset ingestion and view synchronisation for the Pasag family's
//! single-page genealogy site.
//!
//! ## Features
//!
//! - **Content registry**: the site's authored text, navigation buttons and settings
//! - **Dataset loading**: fetch, parse and derive stats once per page session
//! - **View synchronisation**: idempotent projections onto any [`view::ViewTarget`]
//! - **Tree bootstrap**: start the external tree view once, whichever side is ready first
//!
//! ## Modules
//!
//! - [`content`]: Site text, control buttons, settings and contact templates
//! - [`dataset`]: Dataset sources, parsing and the write-once snapshot
//! - [`view`]: View target trait, in-memory document and synchronizers
//! - [`actions`]: Named actions dispatched by buttons and the bootstrap
//! - [`bootstrap`]: Tree start-up rendezvous
//! - [`session`]: The page pipeline tying it all together
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pasag_tree::dataset::NativeSource;
//! use pasag_tree::session::PageSession;
//! use pasag_tree::view::MemoryDocument;
//!
//! #[tokio::main]
//! async fn main() {
//!     let session = PageSession::default();
//!     let mut page = MemoryDocument::page();
//!
//!     // Text that needs no data first
//!     session.render_static(&mut page);
//!
//!     // Then the dataset, dropdown and tree start
//!     let outcome = session.start(&NativeSource::new("."), &mut page).await;
//!     println!("{:?}: {:?}", outcome, session.stats());
//! }
//! ```

pub mod actions;
pub mod bootstrap;
#[cfg(feature = "native")]
pub mod config;
pub mod content;
pub mod dataset;
pub mod session;
pub mod view;

// Re-export top-level types for convenience
pub use actions::{ActionHandler, ActionRegistry, DispatchError};

pub use bootstrap::{BootstrapState, TreeBootstrap};

pub use content::{
    contact_message, default_controls, ContactAction, ContactMessage, ControlButtonSpec,
    ModalContent, SiteContent, SiteSettings,
};

pub use dataset::{
    normalize_name, DatasetSnapshot, DatasetSource, DerivedStats, FamilyMember, LoadError,
    LoadResult, SnapshotStore,
};

pub use session::{LoadOutcome, PageSession, StaticRender};

pub use view::sync::{OpenError, SkipReason, SyncOutcome};
pub use view::{MemoryDocument, Node, Region, ViewError, ViewResult, ViewTarget};

#[cfg(feature = "native")]
pub use config::{Config, ConfigError, LoggingConfig, SiteConfig};
