//! # Storage Layer
//!
//! This module defines the page identity store: the sole authority over page
//! identifiers and persisted page bytes. The [`PageStore`] trait lets the rest
//! of the wiki run against different backends.
//!
//! ## Implementations
//!
//! - [`fs::DiskStore`]: production storage
//!   - One JSON record per page: `{storage_dir}/{id}{suffix}`
//!   - Records written with owner-only permissions
//!
//! - [`memory::InMemoryStore`]: in-memory storage for testing
//!   - Same observable semantics, no persistence
//!
//! ## Storage Format
//!
//! ```text
//! data/pages/
//! ├── 0a1b2c3d4e5f.wiki   # {"Id":"0a1b2c3d4e5f","Title":"...","Body":"..."}
//! └── 9f8e7d6c5b4a.wiki
//! ```
//!
//! ## Consistency
//!
//! Every operation touches exactly one record, so there is nothing to
//! reconcile after a failure. There is no cross-operation locking: a `read`
//! racing an `update` or `delete` of the same id may see either state.
//! `create` cannot collide because it only ever writes a file that did not
//! exist before.

use crate::error::Result;
use crate::model::{Page, PageId};
use rand::rngs::OsRng;
use rand::RngCore;
use std::io;

pub mod fs;
pub mod memory;

/// Length of a generated identifier, in random bytes (hex doubles it).
pub const PAGE_ID_LEN: usize = 6;

/// How many fresh identifiers `create` draws before giving up on collisions.
pub const MAX_ID_ATTEMPTS: usize = 8;

/// Abstract interface for page storage.
///
/// Implementations must be safe to call from concurrent request handlers.
pub trait PageStore: Send + Sync {
    /// Assign a fresh id to `page`, persist it and return the id.
    ///
    /// On failure the id written into `page` must not be assumed durable.
    fn create(&self, page: &mut Page) -> Result<PageId>;

    /// Get a page by id.
    ///
    /// Fails with `UnexistentPage` when nothing is stored under `id`, and with
    /// `CorruptedRecord` when the stored record cannot be decoded or names a
    /// different id.
    fn read(&self, id: &PageId) -> Result<Page>;

    /// Overwrite the title and body of an existing page.
    fn update(&self, page: &Page) -> Result<()>;

    /// Remove a page permanently. Unknown ids surface a `NotFound` I/O error.
    fn delete(&self, id: &PageId) -> Result<()>;

    /// Every stored id, in ascending order.
    fn list_all(&self) -> Result<Vec<PageId>>;

    /// Id of the first page (in `list_all` order) whose title equals `title`
    /// exactly, or `None`.
    ///
    /// This is a linear scan reading every record. It is the place to add a
    /// title index if the wiki ever grows large.
    fn find_by_title(&self, title: &str) -> Result<Option<PageId>> {
        for id in self.list_all()? {
            let page = self.read(&id)?;
            if page.title == title {
                return Ok(Some(page.id));
            }
        }
        Ok(None)
    }
}

/// Draw a new identifier from the OS random source.
pub fn new_page_id() -> io::Result<PageId> {
    let mut bytes = [0u8; PAGE_ID_LEN];
    OsRng.try_fill_bytes(&mut bytes).map_err(io::Error::other)?;
    Ok(PageId::new(hex::encode(bytes)))
}
