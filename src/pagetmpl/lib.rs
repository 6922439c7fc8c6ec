//! # pagetmpl - Named HTML Page Templates
//!
//! A small layer over [minijinja](https://docs.rs/minijinja) for rendering the
//! HTML pages of a web application from named templates.
//!
//! ## The Problem
//!
//! A server-rendered site needs a handful of pages (a listing, a view, a form)
//! that share link conventions. Hard-coding URL prefixes in every template makes
//! them brittle, and user-supplied values must always be HTML-escaped.
//!
//! ## The Solution
//!
//! - **Templates** are registered by name. Names ending in `.html` are
//!   auto-escaped by minijinja, so `{{ title }}` is always safe.
//! - **Routes** are defined separately as named path prefixes and applied with
//!   the `link` filter: `{{ page.id | link("edit") }}` renders `/edit/<id>`.
//! - **Defaults** ship embedded in the crate and can be overridden from a
//!   directory at startup.
//!
//! ## Quick Example
//!
//! ```rust
//! use pagetmpl::{Renderer, Routes};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Data {
//!     id: String,
//!     title: String,
//! }
//!
//! let routes = Routes::new().add("view", "/view/");
//! let mut renderer = Renderer::new(routes);
//! renderer
//!     .add_template("item.html", r#"<a href="{{ id | link("view") }}">{{ title }}</a>"#)
//!     .unwrap();
//!
//! let data = Data { id: "abc123".into(), title: "Fish & Chips".into() };
//! let output = renderer.render("item.html", &data).unwrap();
//! assert_eq!(output, r#"<a href="/view/abc123">Fish &amp; Chips</a>"#);
//! ```

use minijinja::{Environment, Value};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub use minijinja::Error;

/// Marker rendered when a route name is not registered.
pub const DEFAULT_MISSING_ROUTE_INDICATOR: &str = "#missing-route";

/// Templates compiled into the crate, keyed by name.
pub const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("templates/layout.html")),
    ("list.html", include_str!("templates/list.html")),
    ("view.html", include_str!("templates/view.html")),
    ("create.html", include_str!("templates/create.html")),
    ("edit.html", include_str!("templates/edit.html")),
];

/// Suffix of template files picked up by [`Renderer::load_dir`].
pub const TEMPLATE_SUFFIX: &str = ".html";

/// Errors raised while loading templates from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read template directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid template {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: Error,
    },
}

/// A collection of named path prefixes.
///
/// Routes are registered by name and applied via the `link` filter in templates.
/// When a route name is not found, [`DEFAULT_MISSING_ROUTE_INDICATOR`] is
/// rendered instead so typos show up in the page rather than failing the whole
/// render.
///
/// # Example
///
/// ```rust
/// use pagetmpl::Routes;
///
/// let routes = Routes::new()
///     .add("view", "/view/")
///     .add("edit", "/edit/");
///
/// assert_eq!(routes.apply("edit", "f00d"), "/edit/f00d");
/// assert_eq!(routes.apply("typo", "f00d"), "#missing-route");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Routes {
    prefixes: HashMap<String, String>,
}

impl Routes {
    /// Creates an empty route registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named prefix. Returns self for chaining.
    ///
    /// If a route with the same name exists, it is replaced.
    pub fn add(mut self, name: &str, prefix: &str) -> Self {
        self.prefixes.insert(name.to_string(), prefix.to_string());
        self
    }

    /// Builds the URL for `name` with `segment` appended.
    ///
    /// The segment is percent-encoded, so the result is safe inside an HTML
    /// attribute without further escaping.
    pub fn apply(&self, name: &str, segment: &str) -> String {
        match self.prefixes.get(name) {
            Some(prefix) => format!(
                "{}{}",
                prefix,
                utf8_percent_encode(segment, NON_ALPHANUMERIC)
            ),
            None => DEFAULT_MISSING_ROUTE_INDICATOR.to_string(),
        }
    }
}

/// A renderer with pre-registered page templates.
///
/// Templates are compiled once and reused; the renderer is `Send + Sync`
/// and can be shared between request handlers.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Creates a renderer with no templates registered.
    pub fn new(routes: Routes) -> Self {
        let mut env = Environment::new();
        register_link_filter(&mut env, routes);
        Self { env }
    }

    /// Creates a renderer preloaded with [`DEFAULT_TEMPLATES`].
    pub fn with_defaults(routes: Routes) -> Result<Self, Error> {
        let mut renderer = Self::new(routes);
        for (name, source) in DEFAULT_TEMPLATES {
            renderer.add_template(name, source)?;
        }
        Ok(renderer)
    }

    /// Registers a named template, replacing any template with the same name.
    ///
    /// The template is compiled immediately; errors are returned if syntax is invalid.
    pub fn add_template(&mut self, name: &str, source: &str) -> Result<(), Error> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())
    }

    /// Registers every `*.html` file in `dir`, named by file name.
    ///
    /// Returns the number of templates loaded. Subdirectories are ignored.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, LoadError> {
        let io_error = |source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type().map_err(io_error)?.is_file() && name.ends_with(TEMPLATE_SUFFIX) {
                entries.push((name, entry.path()));
            }
        }
        entries.sort();

        for (name, path) in &entries {
            let source = fs::read_to_string(path).map_err(io_error)?;
            self.add_template(name, &source)
                .map_err(|source| LoadError::Template {
                    name: name.clone(),
                    source,
                })?;
        }
        Ok(entries.len())
    }

    /// Renders a registered template with the given data.
    ///
    /// # Errors
    ///
    /// Returns an error if the template name is not found or rendering fails.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, Error> {
        let tmpl = self.env.get_template(name)?;
        tmpl.render(data)
    }
}

/// Registers the `link` filter on a minijinja environment.
fn register_link_filter(env: &mut Environment<'static>, routes: Routes) {
    env.add_filter("link", move |value: Value, name: String| -> Value {
        let segment = match value.as_str() {
            Some(s) => s.to_string(),
            None => value.to_string(),
        };
        Value::from_safe_string(routes.apply(&name, &segment))
    });
}
