use crate::commands::{CmdResult, PageSummary};
use crate::error::Result;
use crate::store::PageStore;

/// Every readable page, ordered by title. Records that fail to read are
/// skipped so one bad file does not take the index down.
pub fn run<S: PageStore>(store: &S) -> Result<CmdResult> {
    let mut pages = Vec::new();
    for id in store.list_all()? {
        match store.read(&id) {
            Ok(page) => pages.push(PageSummary::from(page)),
            Err(err) => log::warn!("skipping page {} in listing: {}", id, err),
        }
    }
    pages.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));

    Ok(CmdResult::default().with_listed_pages(pages))
}
