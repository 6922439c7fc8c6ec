use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::{Page, PageId};
use crate::store::PageStore;
use crate::syntax::SyntaxHandler;

/// Persist an edit form. An empty `id` creates a new page; anything else
/// updates the existing one.
pub fn run<S: PageStore, H: SyntaxHandler>(
    store: &S,
    syntax: &H,
    id: &PageId,
    title: &str,
    edit: &str,
) -> Result<CmdResult> {
    let mut page = Page {
        id: id.clone(),
        title: title.to_string(),
        body: syntax.edit_to_body(edit),
    };

    if page.id.is_empty() {
        let id = store.create(&mut page)?;
        log::info!("created page {} ({:?})", id, page.title);
    } else {
        store.update(&page)?;
        log::info!("updated page {}", page.id);
    }

    Ok(CmdResult::default().with_affected_id(page.id))
}
