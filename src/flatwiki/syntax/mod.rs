//! # Link Resolution Engine
//!
//! Page bodies exist in three forms:
//!
//! - **identifier-form**: what the store persists. Links name pages by id:
//!   `[a1b2c3d4e5f6][]` or `[see here][a1b2c3d4e5f6]`.
//! - **edit-form**: what authors type. Links name pages by title:
//!   `[Home Page][]` or `[see here][Home Page]`.
//! - **HTML**: what readers get, with resolvable links pointing at the view
//!   endpoint of the target page.
//!
//! [`SyntaxHandler`] converts between them. Conversions never fail: a link
//! that does not resolve, for any reason, is left exactly as written. This
//! keeps a body whose target was deleted readable and editable, and makes
//! both text conversions idempotent on dangling references.

use crate::model::PageId;
use crate::routes::view_url;
use crate::store::PageStore;
use std::sync::Arc;

pub mod html;
pub mod link;

use html::{render_markdown, ReferenceTarget};
use link::rewrite_links;

/// Converts page bodies between identifier-form, edit-form and HTML.
pub trait SyntaxHandler: Send + Sync {
    /// Identifier-form to edit-form: ids of existing pages become titles.
    fn body_to_edit(&self, body: &str) -> String;

    /// Edit-form to identifier-form: titles of existing pages become ids.
    fn edit_to_body(&self, edit: &str) -> String;

    /// Identifier-form to sanitized HTML.
    fn body_to_html(&self, body: &str) -> String;
}

/// Markdown dialect whose reference links are resolved against a store.
pub struct MarkdownSyntax<S: PageStore> {
    store: Arc<S>,
}

impl<S: PageStore> MarkdownSyntax<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn target_for(&self, reference: &str) -> Option<ReferenceTarget> {
        let page = self.store.read(&PageId::from(reference)).ok()?;
        Some(ReferenceTarget {
            url: view_url(&page.id),
            title: page.title,
        })
    }
}

impl<S: PageStore> SyntaxHandler for MarkdownSyntax<S> {
    fn body_to_edit(&self, body: &str) -> String {
        rewrite_links(body, |mut link| {
            if let Ok(page) = self.store.read(&PageId::from(link.reference.as_str())) {
                link.reference = page.title;
            }
            link
        })
        .into_owned()
    }

    fn edit_to_body(&self, edit: &str) -> String {
        rewrite_links(edit, |mut link| {
            if let Ok(Some(id)) = self.store.find_by_title(link.reference.trim()) {
                if !id.is_empty() {
                    link.reference = id.to_string();
                }
            }
            link
        })
        .into_owned()
    }

    fn body_to_html(&self, body: &str) -> String {
        render_markdown(body, |reference| self.target_for(reference))
    }
}
