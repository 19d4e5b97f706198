//! A compressed prefix tree HTTP router built on hyper.
//!
//! ```
//! use sprig::{Method, Router};
//!
//! let mut router = Router::new();
//! router.add_route(Method::Get, "/users/:id", "user").unwrap();
//! router.add_route(Method::Get, "/users/me", "me").unwrap();
//! router.add_route(Method::Get, "/static/*filepath", "assets").unwrap();
//!
//! let found = router.find_route(Method::Get, "/users/123").unwrap();
//! assert_eq!(*found.data, "user");
//! assert_eq!(found.params.unwrap().get("id"), Some("123"));
//!
//! let found = router.find_route(Method::Get, "/users/me").unwrap();
//! assert_eq!(*found.data, "me");
//! assert!(found.params.is_none());
//!
//! let found = router.find_route(Method::Get, "/static/js/app.js").unwrap();
//! assert_eq!(found.params.unwrap().get("filepath"), Some("js/app.js"));
//!
//! assert!(router.find_route(Method::Post, "/users/123").is_none());
//! ```
//!
//! Each HTTP method gets its own tree. Segments written `:name` match one path segment and
//! `*name` matches the rest of the path; it must be the final segment. At every branch a
//! static child is preferred over a dynamic one, and a dynamic one over a catch-all, so the
//! most specific route always wins.
//!
//! With the `http` feature (on by default) the `HttpRouterBuilder` registers hyper handlers and
//! builds an `HttpRouter`, which can be passed to hyper's server as the make-service. It exposes
//! `internal_error_handler` and `not_found_handler` for errors returned from handlers and
//! unmatched requests respectively.

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::*;

mod error;

/// A single vertex of a route tree.
pub mod node;

/// Methods, parameters and lookup results.
pub mod route;

/// Route registration and lookup.
pub mod router;

pub use error::*;
pub use node::{Node, NodeKind};
pub use route::*;
pub use router::Router;
