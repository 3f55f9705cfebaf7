//! # RadixRoute
//!
//! RadixRoute is a lightweight high performance HTTP request router for static paths.
//!
//! Routes are stored in a compressing dynamic trie (radix tree). Each node of the tree holds a fragment of a path, and
//! siblings are kept sorted by the first byte of their fragment, so resolving a request costs one binary search per
//! branching point along its path. It scales well even with very long paths and a large number of routes.
//!
//! ## Features
//!
//! **Only explicit matches:** A request path either matches one registered path byte for byte or nothing at all. There
//! are no wildcard, parameter or pattern priority rules, and `/users` and `/users/` are different routes.
//!
//! **One tree for every method:** The handlers of all methods registered for a path live in the same leaf. This makes
//! answering `405 Method Not Allowed` and automatic `OPTIONS` requests a single lookup.
//!
//! **Composable:** Sub-routers can be built separately and mounted below a prefix with
//! [`Router::mount`](crate::Router::mount) or [`Router::route`](crate::Router::route).
//!
//! **Introspection:** [`Router::routes`](crate::Router::routes) lists every registered path with its methods, for
//! documentation generators and the like.
//!
//! ## Usage
//!
//! Here is a simple example:
//!
//! ```rust,no_run
//! use radixroute::Router;
//! use hyper::{Request, Response, Body, Error};
//!
//! async fn index(_: Request<Body>) -> Result<Response<Body>, Error> {
//!     Ok(Response::new("Hello, World!".into()))
//! }
//!
//! async fn whoami(_: Request<Body>) -> Result<Response<Body>, Error> {
//!     Ok(Response::new("Gordon".into()))
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = Router::default()
//!         .get("/", index)
//!         .get("/users/me", whoami);
//!
//!     hyper::Server::bind(&([127, 0, 0, 1], 3000).into())
//!         .serve(router.into_service())
//!         .await;
//! }
//! ```
//!
//! ### The routing tree
//!
//! The radix tree is usable on its own and is generic over the stored value:
//!
//! ```rust
//! use radixroute::Tree;
//! use hyper::Method;
//!
//! let mut tree = Tree::default();
//! tree.insert(Method::GET, "/apple", "apple").unwrap();
//! tree.insert(Method::GET, "/apricot", "apricot").unwrap();
//!
//! assert_eq!(tree.at(&Method::GET, "/apple"), Some(&"apple"));
//! assert_eq!(tree.at(&Method::GET, "/ap"), None);
//! ```
//!
//! ### Not Found Handler
//!
//! You can use another handler, to handle requests which could not be matched by this router by using the
//! [`Router::not_found`](crate::Router::not_found) handler:
//!
//! ```rust
//! use radixroute::Router;
//! use hyper::{Response, Body};
//!
//! let router = Router::default().not_found(|_| async {
//!     Ok(Response::builder()
//!         .status(404)
//!         .body(Body::from("nothing to see here"))
//!         .unwrap())
//! });
//! ```

#![forbid(unsafe_code)]

pub mod error;

pub mod tree;

#[doc(hidden)]
pub mod router;

#[doc(inline)]
pub use error::TreeError;

#[doc(inline)]
pub use router::{Handler, Router};

#[doc(inline)]
pub use tree::{Endpoints, Tree};
