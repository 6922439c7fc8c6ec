//! # Flatwiki Architecture
//!
//! Flatwiki is a small wiki whose pages live as flat files in one directory.
//! Pages link to each other by title while editing, and by a stable
//! identifier once saved, so renaming a page never breaks the links that
//! point at it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  HTTP Layer (server/, wired by main.rs)                     │
//! │  - Maps request paths to API calls, renders templates       │
//! │  - The ONLY place that knows about sockets and status codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Wires the store into the link engine                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One module per endpoint action                           │
//! │  - Operates on Rust types, returns `CmdResult`              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────┐ ┌────────────────────────────┐
//! │  Link Engine (syntax/)       │ │  Storage Layer (store/)    │
//! │  - edit-form <-> id-form     │ │  - PageStore trait         │
//! │  - id-form -> sanitized HTML │ │  - DiskStore, InMemoryStore│
//! └──────────────────────────────┘ └────────────────────────────┘
//! ```
//!
//! The link engine reads the store through the same `PageStore` trait the
//! commands use; both hold the store behind an `Arc`, and nothing is global.
//!
//! ## Testing Strategy
//!
//! 1. **Store and link engine**: unit tests against `InMemoryStore`, plus
//!    integration tests against `DiskStore` in a temp directory.
//! 2. **Commands and API**: unit tests with `StoreFixture`.
//! 3. **HTTP**: `WikiServer::reply` is exercised without a socket; the
//!    binary gets `assert_cmd` smoke tests.
//!
//! ## Module Overview
//!
//! - [`model`]: `Page` and `PageId`
//! - [`store`]: page persistence
//! - [`syntax`]: reference links and markdown rendering
//! - [`commands`]: list, view, create, edit, save, delete
//! - [`api`]: the facade the server calls
//! - [`routes`]: endpoint paths
//! - [`server`]: tiny_http front end
//! - [`config`]: `WikiConfig`
//! - [`error`]: `WikiError`

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod routes;
pub mod server;
pub mod store;
pub mod syntax;
