//! Collaborator traits for the two external stores.
//!
//! The catalog pipeline only ever talks to Drive and Sheets through these
//! traits. The Google-backed implementations live in
//! [`connector_drive`](crate::connector_drive) and
//! [`connector_sheets`](crate::connector_sheets); tests plug in in-memory
//! stores.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐
//! │  FileStore   │     │ SheetSource  │
//! │ (Drive v3)   │     │ (Sheets v4)  │
//! └──────┬───────┘     └──────┬───────┘
//!        ▼                    ▼
//!    walk_tree()        load_overrides()
//!        └────────┬───────────┘
//!                 ▼
//!          build_catalog()
//! ```
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use anyhow::Result;
//! use nenamaga::models::DriveItem;
//! use nenamaga::traits::FileStore;
//!
//! struct EmptyStore;
//!
//! #[async_trait]
//! impl FileStore for EmptyStore {
//!     fn name(&self) -> &str { "empty" }
//!
//!     async fn list_children(&self, _folder_id: &str) -> Result<Vec<DriveItem>> {
//!         Ok(vec![])
//!     }
//! }
//! ```

use anyhow::Result;
use async_trait::async_trait;

use crate::models::DriveItem;

/// A hierarchical, read-only file store.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Short label used in logs (e.g. `"drive"`).
    fn name(&self) -> &str;

    /// List the immediate children of a folder, in whatever order the store
    /// returns them. One attempt; callers decide what a failure means.
    async fn list_children(&self, folder_id: &str) -> Result<Vec<DriveItem>>;
}

/// A read-only tabular source (a spreadsheet range).
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Read the rows of `range`. Rows may be ragged; trailing empty cells
    /// are usually omitted by the provider.
    async fn read_range(&self, sheet_id: &str, range: &str) -> Result<Vec<Vec<String>>>;
}
