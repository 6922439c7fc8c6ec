use super::{new_page_id, PageStore, MAX_ID_ATTEMPTS};
use crate::error::{Result, WikiError};
use crate::model::{Page, PageId};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::io;

/// Store backed by a map; same observable behavior as the disk store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    pages: RwLock<BTreeMap<PageId, Page>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.read().is_empty()
    }
}

impl PageStore for InMemoryStore {
    fn create(&self, page: &mut Page) -> Result<PageId> {
        let mut pages = self.pages.write();
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = new_page_id()?;
            if pages.contains_key(&id) {
                continue;
            }
            page.id = id.clone();
            pages.insert(id.clone(), page.clone());
            return Ok(id);
        }
        Err(WikiError::StorageIo(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "no free page id",
        )))
    }

    fn read(&self, id: &PageId) -> Result<Page> {
        self.pages
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| WikiError::UnexistentPage(id.clone()))
    }

    fn update(&self, page: &Page) -> Result<()> {
        let mut pages = self.pages.write();
        match pages.get_mut(&page.id) {
            Some(stored) => {
                *stored = page.clone();
                Ok(())
            }
            None => Err(WikiError::UnexistentPage(page.id.clone())),
        }
    }

    fn delete(&self, id: &PageId) -> Result<()> {
        match self.pages.write().remove(id) {
            Some(_) => Ok(()),
            None => Err(WikiError::StorageIo(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no page stored under {:?}", id.as_str()),
            ))),
        }
    }

    fn list_all(&self) -> Result<Vec<PageId>> {
        Ok(self.pages.read().keys().cloned().collect())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub struct StoreFixture {
        pub store: InMemoryStore,
        pub ids: Vec<PageId>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                ids: Vec::new(),
            }
        }

        pub fn with_pages(mut self, count: usize) -> Self {
            for i in 0..count {
                let mut page = Page::new(
                    format!("Test Page {}", i + 1),
                    format!("Content for page {}", i + 1),
                );
                self.ids.push(self.store.create(&mut page).unwrap());
            }
            self
        }

        pub fn with_page(mut self, title: &str, body: &str) -> Self {
            let mut page = Page::new(title, body);
            self.ids.push(self.store.create(&mut page).unwrap());
            self
        }

        /// Id of the most recently added page.
        pub fn last_id(&self) -> PageId {
            self.ids.last().cloned().unwrap_or_default()
        }
    }
}
