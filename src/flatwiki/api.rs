//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for wiki
//! operations. The HTTP server only talks to [`WikiApi`]; it never reaches
//! into the store or the link engine directly.
//!
//! The facade:
//! - **Dispatches** to the matching `commands::*::run`
//! - **Owns the wiring** between the store and the link engine
//! - **Returns structured data** (`Result<CmdResult>`), never markup
//!
//! `WikiApi<S: PageStore>` is generic over the storage backend:
//! - Production: `WikiApi<DiskStore>`
//! - Testing: `WikiApi<InMemoryStore>`

use crate::commands::{self, CmdResult};
use crate::error::Result;
use crate::model::PageId;
use crate::store::PageStore;
use crate::syntax::MarkdownSyntax;
use std::sync::Arc;

pub struct WikiApi<S: PageStore> {
    store: Arc<S>,
    syntax: MarkdownSyntax<S>,
}

impl<S: PageStore> WikiApi<S> {
    pub fn new(store: Arc<S>) -> Self {
        let syntax = MarkdownSyntax::new(store.clone());
        Self { store, syntax }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Summaries of every stored page, sorted by title.
    ///
    /// A record that cannot be read (corrupted JSON, id mismatch, I/O error)
    /// is logged and left out of the listing instead of failing the call.
    /// Only a failure to enumerate the store is returned as an error.
    pub fn list_pages(&self) -> Result<CmdResult> {
        commands::list::run(self.store.as_ref())
    }

    pub fn view_page(&self, id: &PageId) -> Result<CmdResult> {
        commands::view::run(self.store.as_ref(), &self.syntax, id)
    }

    pub fn new_page(&self, title: Option<&str>) -> Result<CmdResult> {
        commands::create::run(title)
    }

    pub fn edit_page(&self, id: &PageId) -> Result<CmdResult> {
        commands::edit::run(self.store.as_ref(), &self.syntax, id)
    }

    pub fn save_page(&self, id: &PageId, title: &str, edit: &str) -> Result<CmdResult> {
        commands::save::run(self.store.as_ref(), &self.syntax, id, title, edit)
    }

    pub fn delete_page(&self, id: &PageId) -> Result<CmdResult> {
        commands::delete::run(self.store.as_ref(), id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    fn api() -> WikiApi<InMemoryStore> {
        WikiApi::new(Arc::new(InMemoryStore::new()))
    }

    #[test]
    fn save_then_view_and_edit() {
        let api = api();
        let home = api
            .save_page(&PageId::default(), "Home", "Welcome")
            .unwrap()
            .affected_id
            .unwrap();
        let about = api
            .save_page(&PageId::default(), "About", "Back [Home][]")
            .unwrap()
            .affected_id
            .unwrap();

        let stored = api.store().read(&about).unwrap();
        assert_eq!(stored.body, format!("Back [{}][]", home));

        let edit = api.edit_page(&about).unwrap().page.unwrap();
        assert_eq!(edit.body_to_edit, "Back [Home][]");

        let view = api.view_page(&about).unwrap().page.unwrap();
        assert!(view
            .body_as_html
            .contains(&format!("<a href=\"/view/{}\" title=\"Home\" rel=\"nofollow\">Home</a>", home)));
    }

    #[test]
    fn list_reflects_saves_and_deletes() {
        let api = api();
        let id = api
            .save_page(&PageId::default(), "Only", "")
            .unwrap()
            .affected_id
            .unwrap();
        assert_eq!(api.list_pages().unwrap().listed_pages.len(), 1);

        api.delete_page(&id).unwrap();
        assert!(api.list_pages().unwrap().listed_pages.is_empty());
        assert!(api.view_page(&id).unwrap_err().is_not_found());
    }

    #[test]
    fn new_page_is_not_stored() {
        let api = api();
        let page = api.new_page(Some("Draft")).unwrap().page.unwrap();
        assert_eq!(page.title, "Draft");
        assert!(api.list_pages().unwrap().listed_pages.is_empty());
    }
}
