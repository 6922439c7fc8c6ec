use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::PageId;
use crate::store::PageStore;

pub fn run<S: PageStore>(store: &S, id: &PageId) -> Result<CmdResult> {
    store.delete(id)?;
    log::info!("deleted page {}", id);
    Ok(CmdResult::default().with_affected_id(id.clone()))
}
