use crate::model::{Page, PageId};
use serde::Serialize;

pub mod create;
pub mod delete;
pub mod edit;
pub mod list;
pub mod save;
pub mod view;

/// One row of the page listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub id: PageId,
    pub title: String,
}

impl From<Page> for PageSummary {
    fn from(page: Page) -> Self {
        Self {
            id: page.id,
            title: page.title,
        }
    }
}

/// A page prepared for a template. Only the body form the template needs
/// is filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageModel {
    pub id: PageId,
    pub title: String,
    pub body_to_edit: String,
    pub body_as_html: String,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub listed_pages: Vec<PageSummary>,
    pub page: Option<PageModel>,
    pub affected_id: Option<PageId>,
}

impl CmdResult {
    pub fn with_listed_pages(mut self, pages: Vec<PageSummary>) -> Self {
        self.listed_pages = pages;
        self
    }

    pub fn with_page(mut self, page: PageModel) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_affected_id(mut self, id: PageId) -> Self {
        self.affected_id = Some(id);
        self
    }
}
