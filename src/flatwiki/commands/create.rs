use crate::commands::{CmdResult, PageModel};
use crate::error::Result;
use crate::routes::DEFAULT_NEW_TITLE;

/// A blank page for the create form. Nothing is stored until it is saved.
pub fn run(title: Option<&str>) -> Result<CmdResult> {
    let title = match title.map(str::trim) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => DEFAULT_NEW_TITLE.to_string(),
    };

    Ok(CmdResult::default().with_page(PageModel {
        title,
        ..PageModel::default()
    }))
}
