//! # HTTP Server
//!
//! Request handling on top of `tiny_http`. Incoming requests are pulled off
//! the listener on one thread and handled on a rayon pool, so a slow page
//! render never holds up the accept loop.
//!
//! [`WikiServer::reply`] is the whole request-to-reply mapping and has no
//! socket in it; the tests drive it directly.

use crate::api::WikiApi;
use crate::commands::{CmdResult, PageModel, PageSummary};
use crate::error::{Result as WikiResult, WikiError};
use crate::model::PageId;
use crate::routes::{view_url, Route, LIST_PATH};
use crate::store::PageStore;
use anyhow::{anyhow, Context, Result};
use pagetmpl::{Renderer, Routes};
use serde::Serialize;
use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;
use tiny_http::{Request, Server};

pub mod form;
pub mod response;

use form::FormData;
use response::Reply;

/// Largest request body accepted by the save endpoint.
pub const MAX_FORM_BYTES: u64 = 1 << 20;

/// Route registry for the page templates' `link` filter.
pub fn template_routes() -> Routes {
    Routes::new()
        .add("view", crate::routes::VIEW_PATH)
        .add("edit", crate::routes::EDIT_PATH)
        .add("delete", crate::routes::DELETE_PATH)
}

#[derive(Serialize)]
struct ListContext<'a> {
    pages: &'a [PageSummary],
}

pub struct WikiServer<S: PageStore> {
    api: WikiApi<S>,
    renderer: Renderer,
}

impl<S: PageStore + 'static> WikiServer<S> {
    pub fn new(api: WikiApi<S>, renderer: Renderer) -> Self {
        Self { api, renderer }
    }

    /// Answer one request. `url` is the request target, query included.
    pub fn reply(&self, url: &str, body: &str) -> Reply {
        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (url, None),
        };

        match self.dispatch(path, query, body) {
            Ok(reply) => reply,
            Err(err) => Reply::from_error(&err),
        }
    }

    fn dispatch(&self, path: &str, query: Option<&str>, body: &str) -> WikiResult<Reply> {
        let Some(route) = Route::resolve(path)? else {
            return Ok(Reply::not_found());
        };
        let form = FormData::parse(query, body);

        match route {
            // Unreadable records are already dropped from the listing.
            Route::List => {
                let result = self.api.list_pages()?;
                self.render("list.html", &ListContext {
                    pages: &result.listed_pages,
                })
            }
            Route::View(id) => self.render_page("view.html", self.api.view_page(&id)?),
            Route::Create => self.render_page("create.html", self.api.new_page(form.get("title"))?),
            Route::Edit(id) => self.render_page("edit.html", self.api.edit_page(&id)?),
            Route::Save => {
                let id = PageId::from(form.value("id"));
                let result = self.api.save_page(&id, form.value("title"), form.value("body"))?;
                let id = result.affected_id.unwrap_or(id);
                Ok(Reply::Redirect(view_url(&id)))
            }
            Route::Delete(id) => {
                self.api.delete_page(&id)?;
                Ok(Reply::Redirect(LIST_PATH.to_string()))
            }
        }
    }

    fn render_page(&self, template: &str, result: CmdResult) -> WikiResult<Reply> {
        let page: PageModel = result.page.unwrap_or_default();
        self.render(template, &page)
    }

    fn render<T: Serialize>(&self, template: &str, data: &T) -> WikiResult<Reply> {
        Ok(Reply::Html(self.renderer.render(template, data)?))
    }

    fn handle_request(&self, mut request: Request) -> Result<()> {
        let url = request.url().to_string();
        let reply = match read_body(&mut request) {
            Ok(body) => self.reply(&url, &body),
            Err(err) => Reply::from_error(&err),
        };
        log::debug!("{} {} -> {}", request.method(), url, reply.status());
        reply.send(request)
    }

    /// Bind the listener without serving yet.
    pub fn bind(self, addr: &str) -> Result<BoundServer<S>> {
        let server = Server::http(addr).map_err(|e| anyhow!("failed to bind {}: {}", addr, e))?;
        Ok(BoundServer {
            server,
            handler: Arc::new(self),
        })
    }
}

fn read_body(request: &mut Request) -> WikiResult<String> {
    let mut body = String::new();
    request
        .as_reader()
        .take(MAX_FORM_BYTES + 1)
        .read_to_string(&mut body)
        .map_err(|e| WikiError::InvalidRequest(format!("unreadable request body: {}", e)))?;
    if body.len() as u64 > MAX_FORM_BYTES {
        return Err(WikiError::InvalidRequest("request body too large".to_string()));
    }
    Ok(body)
}

/// Bound listener ready to accept requests
pub struct BoundServer<S: PageStore> {
    server: Server,
    handler: Arc<WikiServer<S>>,
}

impl<S: PageStore + 'static> BoundServer<S> {
    pub fn addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Serve requests until the listener shuts down (blocking).
    pub fn run(self, workers: usize) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .build()
            .context("failed to create worker pool")?;

        for request in self.server.incoming_requests() {
            let handler = Arc::clone(&self.handler);
            pool.spawn(move || {
                if let Err(e) = handler.handle_request(request) {
                    log::warn!("request error: {e}");
                }
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    fn server() -> (Arc<InMemoryStore>, WikiServer<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let renderer = Renderer::with_defaults(template_routes()).unwrap();
        (store.clone(), WikiServer::new(WikiApi::new(store), renderer))
    }

    fn redirect_target(reply: Reply) -> String {
        match reply {
            Reply::Redirect(location) => location,
            other => panic!("expected redirect, got {:?}", other),
        }
    }

    fn html(reply: Reply) -> String {
        match reply {
            Reply::Html(body) => body,
            other => panic!("expected html, got {:?}", other),
        }
    }

    #[test]
    fn save_creates_and_redirects_to_view() {
        let (store, server) = server();
        let location = redirect_target(server.reply("/save/", "id=&title=Home&body=Hello+*there*"));

        let ids = store.list_all().unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(location, format!("/view/{}", ids[0]));

        let page = html(server.reply(&location, ""));
        assert!(page.contains("<h1>Home</h1>"));
        assert!(page.contains("<p>Hello <em>there</em></p>"));
        assert!(page.contains(&format!("href=\"/edit/{}\"", ids[0])));
    }

    #[test]
    fn list_shows_titles_escaped() {
        let (_store, server) = server();
        server.reply("/save/", "title=Fish+%26+Chips&body=");

        let page = html(server.reply("/", ""));
        assert!(page.contains("Fish &amp; Chips"));
    }

    #[test]
    fn create_form_takes_title_from_query() {
        let (_store, server) = server();
        let page = html(server.reply("/create/?title=Recipes", ""));
        assert!(page.contains("value=\"Recipes\""));

        let page = html(server.reply("/create/", ""));
        assert!(page.contains("value=\"New Page\""));
    }

    #[test]
    fn edit_form_shows_titles_in_links() {
        let (store, server) = server();
        let target = redirect_target(server.reply("/save/", "title=Target&body="));
        let source = redirect_target(server.reply("/save/", "title=Source&body=see+%5BTarget%5D%5B%5D"));
        let source_id = source.trim_start_matches("/view/");
        let target_id = target.trim_start_matches("/view/");

        let stored = store.read(&PageId::from(source_id)).unwrap();
        assert_eq!(stored.body, format!("see [{}][]", target_id));

        let page = html(server.reply(&format!("/edit/{}", source_id), ""));
        assert!(page.contains("see [Target][]"));
    }

    #[test]
    fn delete_redirects_to_list() {
        let (store, server) = server();
        let location = redirect_target(server.reply("/save/", "title=Doomed&body="));
        let id = location.trim_start_matches("/view/");

        let reply = server.reply(&format!("/delete/{}", id), "");
        assert_eq!(reply, Reply::Redirect("/".into()));
        assert!(store.is_empty());
        assert_eq!(server.reply(&location, "").status(), 404);
    }

    #[test]
    fn error_statuses() {
        let (_store, server) = server();
        assert_eq!(
            server.reply("/view/../etc", ""),
            Reply::Error(400, "invalid page id".into())
        );
        assert_eq!(server.reply("/view/abc123", "").status(), 404);
        assert_eq!(server.reply("/delete/abc123", "").status(), 404);
        assert_eq!(server.reply("/nowhere", "").status(), 404);
        assert_eq!(server.reply("/save/", "id=abc123&title=x").status(), 404);
    }
}
