//! Endpoint paths and request path dispatch.

use crate::error::{Result, WikiError};
use crate::model::PageId;
use once_cell::sync::Lazy;
use regex::Regex;

pub const LIST_PATH: &str = "/";
pub const VIEW_PATH: &str = "/view/";
pub const CREATE_PATH: &str = "/create/";
pub const EDIT_PATH: &str = "/edit/";
pub const SAVE_PATH: &str = "/save/";
pub const DELETE_PATH: &str = "/delete/";

/// Title given to pages created without one.
pub const DEFAULT_NEW_TITLE: &str = "New Page";

static ID_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/(view|edit|delete)/(.*)$").expect("id path pattern is valid"));

static VALID_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("page id pattern is valid"));

/// A request path, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    View(PageId),
    Create,
    Edit(PageId),
    Save,
    Delete(PageId),
}

impl Route {
    /// Match a path (without query string) to an endpoint.
    ///
    /// Returns `Ok(None)` for paths no endpoint serves, and `InvalidRequest`
    /// when an id-taking endpoint is given a malformed id.
    pub fn resolve(path: &str) -> Result<Option<Route>> {
        match path {
            LIST_PATH => return Ok(Some(Route::List)),
            CREATE_PATH => return Ok(Some(Route::Create)),
            SAVE_PATH => return Ok(Some(Route::Save)),
            _ => {}
        }

        let Some(caps) = ID_PATH.captures(path) else {
            return Ok(None);
        };
        let id = &caps[2];
        if !VALID_ID.is_match(id) {
            return Err(WikiError::InvalidRequest("invalid page id".to_string()));
        }
        let id = PageId::from(id);

        Ok(match &caps[1] {
            "view" => Some(Route::View(id)),
            "edit" => Some(Route::Edit(id)),
            "delete" => Some(Route::Delete(id)),
            _ => None,
        })
    }
}

/// Location of the view page for `id`.
pub fn view_url(id: &PageId) -> String {
    format!("{}{}", VIEW_PATH, id)
}
