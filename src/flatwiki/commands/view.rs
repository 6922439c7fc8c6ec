use crate::commands::{CmdResult, PageModel};
use crate::error::Result;
use crate::model::PageId;
use crate::store::PageStore;
use crate::syntax::SyntaxHandler;

pub fn run<S: PageStore, H: SyntaxHandler>(store: &S, syntax: &H, id: &PageId) -> Result<CmdResult> {
    let page = store.read(id)?;
    let body_as_html = syntax.body_to_html(&page.body);

    Ok(CmdResult::default().with_page(PageModel {
        id: page.id,
        title: page.title,
        body_as_html,
        ..PageModel::default()
    }))
}
