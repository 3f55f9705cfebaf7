//! [`Router`](crate::Router) dispatches HTTP requests to handlers by method
//! and exact path.
//!
//! Routes are stored in a single compressing radix [`Tree`](crate::tree::Tree)
//! whose leaves hold one handler per method, so matching a request costs time
//! proportional to the length of its path rather than to the number of
//! registered routes.
//!
//! The `Router` can be used directly as a hyper service:
//!
//! ```rust,no_run
//! use radixroute::Router;
//! use hyper::{Request, Response, Body, Error};
//!
//! async fn index(_: Request<Body>) -> Result<Response<Body>, Error> {
//!     Ok(Response::new("Hello, World!".into()))
//! }
//!
//! async fn login(_: Request<Body>) -> Result<Response<Body>, Error> {
//!     Ok(Response::new("Welcome back".into()))
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = Router::default()
//!         .get("/", index)
//!         .route("/api", |api| api.post("/auth", login));
//!
//!     hyper::Server::bind(&([127, 0, 0, 1], 3000).into())
//!         .serve(router.into_service())
//!         .await;
//! }
//!```
//!
//! Paths are matched literally. A route registered for `/blog` does not
//! match `/blog/`, `/BLOG` or `/blog/rust`:
//! ```ignore
//!  Path: /blog
//!
//!  Requests:
//!   /blog           match
//!   /blog/          no match
//!   /blog/rust      no match
//! ```
use crate::tree::Tree;

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::{future, ready};
use hyper::service::Service;
use hyper::{header, Body, Method, Request, Response, StatusCode};

/// Router dispatches requests to different handlers via configurable routes.
pub struct Router {
    tree: Tree<Box<dyn Handler>>,
    handle_method_not_allowed: bool,
    handle_options: bool,
    global_options: Option<Box<dyn Handler>>,
    not_found: Option<Box<dyn Handler>>,
    method_not_allowed: Option<Box<dyn Handler>>,
}

impl Router {
    /// Insert a value into the router for a specific path at the specified method.
    /// Registering the same path and method again replaces the earlier handler.
    /// ```rust
    /// use radixroute::Router;
    /// use hyper::{Response, Body, Method};
    ///
    /// let router = Router::default()
    ///     .handle("/teapot", Method::GET, |_| async {
    ///         Ok(Response::new(Body::from("I am a teapot!")))
    ///     });
    /// ```
    pub fn handle(mut self, path: &str, method: Method, handler: impl Handler + 'static) -> Self {
        self.register(path, method, Box::new(handler));
        self
    }

    fn register(&mut self, path: &str, method: Method, handler: Box<dyn Handler>) {
        if !path.starts_with('/') {
            panic!("expect path beginning with '/', found: '{}'", path);
        }

        tracing::debug!(method = %method, path, "registering route");

        if let Err(err) = self.tree.insert(method, path, handler) {
            panic!("routing tree corrupted while inserting '{}': {}", path, err);
        }
    }

    /// Lookup allows the manual lookup of the handler for a specific method and path.
    /// ```rust
    /// use radixroute::Router;
    /// use hyper::{Response, Body, Method};
    ///
    /// let router = Router::default()
    ///     .get("/home", |_| async {
    ///         Ok(Response::new(Body::from("Welcome!")))
    ///     });
    ///
    /// assert!(router.lookup(&Method::GET, "/home").is_some());
    /// assert!(router.lookup(&Method::POST, "/home").is_none());
    /// assert!(router.lookup(&Method::GET, "/home/").is_none());
    /// ```
    pub fn lookup(&self, method: &Method, path: &str) -> Option<&dyn Handler> {
        self.tree.at(method, path).map(|handler| &**handler)
    }

    /// Register a handler for `GET` requests
    pub fn get(self, path: &str, handler: impl Handler + 'static) -> Self {
        self.handle(path, Method::GET, handler)
    }

    /// Register a handler for `HEAD` requests
    pub fn head(self, path: &str, handler: impl Handler + 'static) -> Self {
        self.handle(path, Method::HEAD, handler)
    }

    /// Register a handler for `OPTIONS` requests
    pub fn options(self, path: &str, handler: impl Handler + 'static) -> Self {
        self.handle(path, Method::OPTIONS, handler)
    }

    /// Register a handler for `POST` requests
    pub fn post(self, path: &str, handler: impl Handler + 'static) -> Self {
        self.handle(path, Method::POST, handler)
    }

    /// Register a handler for `PUT` requests
    pub fn put(self, path: &str, handler: impl Handler + 'static) -> Self {
        self.handle(path, Method::PUT, handler)
    }

    /// Register a handler for `PATCH` requests
    pub fn patch(self, path: &str, handler: impl Handler + 'static) -> Self {
        self.handle(path, Method::PATCH, handler)
    }

    /// Register a handler for `DELETE` requests
    pub fn delete(self, path: &str, handler: impl Handler + 'static) -> Self {
        self.handle(path, Method::DELETE, handler)
    }

    /// Moves every route of `router` into this router, below `prefix`.
    ///
    /// A trailing `/` on the prefix is ignored, so mounting `/auth` at both
    /// `/api` and `/api/` registers `/api/auth`. Only routes are carried over;
    /// the sub-router's fallback handlers and settings are dropped.
    /// ```rust
    /// use radixroute::Router;
    /// use hyper::{Response, Body, Method};
    ///
    /// let users = Router::default()
    ///     .get("/", |_| async { Ok(Response::new(Body::from("all users"))) })
    ///     .get("/me", |_| async { Ok(Response::new(Body::from("me"))) });
    ///
    /// let router = Router::default().mount("/users", users);
    ///
    /// assert!(router.lookup(&Method::GET, "/users/").is_some());
    /// assert!(router.lookup(&Method::GET, "/users/me").is_some());
    /// assert!(router.lookup(&Method::GET, "/me").is_none());
    /// ```
    pub fn mount(mut self, prefix: &str, router: Router) -> Self {
        let prefix = prefix.trim_end_matches('/');
        tracing::debug!(prefix, routes = router.tree.len(), "mounting router");

        for (path, endpoints) in router.tree.into_routes() {
            let path = [prefix, path.as_str()].concat();
            for (method, handler) in endpoints {
                self.register(&path, method, handler);
            }
        }

        self
    }

    /// Builds a sub-router with `build` and mounts it below `prefix`.
    /// ```rust
    /// use radixroute::Router;
    /// use hyper::{Response, Body, Method};
    ///
    /// let router = Router::default().route("/api", |api| {
    ///     api.post("/auth", |_| async { Ok(Response::new(Body::empty())) })
    /// });
    ///
    /// assert!(router.lookup(&Method::POST, "/api/auth").is_some());
    /// ```
    pub fn route(self, prefix: &str, build: impl FnOnce(Router) -> Router) -> Self {
        self.mount(prefix, build(Router::default()))
    }

    /// If enabled, the router checks if another method is allowed for the
    /// current route, if the current request can not be routed.
    /// If this is the case, the request is answered with `MethodNotAllowed`
    /// and HTTP status code 405.
    /// If no other Method is allowed, the request is delegated to the `NotFound`
    /// handler. Enabled by default.
    pub fn handle_method_not_allowed(mut self, enabled: bool) -> Self {
        self.handle_method_not_allowed = enabled;
        self
    }

    /// If enabled, the router automatically replies to `OPTIONS` requests.
    /// Custom `OPTIONS` handlers take priority over automatic replies.
    /// Enabled by default.
    pub fn handle_options(mut self, enabled: bool) -> Self {
        self.handle_options = enabled;
        self
    }

    /// An optional handler that is called on automatic `OPTIONS` requests.
    /// The handler is only called if `handle_options` is true and no `OPTIONS`
    /// handler for the specific path was set.
    pub fn global_options(mut self, handler: impl Handler + 'static) -> Self {
        self.global_options = Some(Box::new(handler));
        self
    }

    /// Configurable handler which is called when no matching route is
    /// found.
    pub fn not_found(mut self, handler: impl Handler + 'static) -> Self {
        self.not_found = Some(Box::new(handler));
        self
    }

    /// A configurable handler which is called when a request
    /// cannot be routed and `handle_method_not_allowed` is true.
    pub fn method_not_allowed(mut self, handler: impl Handler + 'static) -> Self {
        self.method_not_allowed = Some(Box::new(handler));
        self
    }

    /// Returns a sorted list of the allowed methods for a specific path,
    /// followed by `OPTIONS` if any method is allowed. The path `*` asks for
    /// every method registered anywhere.
    /// ```rust
    /// use radixroute::Router;
    /// use hyper::{Response, Body, Method};
    ///
    /// let router = Router::default()
    ///     .get("/home", |_| async {
    ///         Ok(Response::new(Body::from("Welcome!")))
    ///     })
    ///     .post("/home", |_| async {
    ///         Ok(Response::new(Body::from("Welcome!")))
    ///     });
    ///
    /// assert_eq!(router.allowed("/home"), ["GET", "POST", "OPTIONS"]);
    /// assert!(router.allowed("/away").is_empty());
    /// ```
    pub fn allowed(&self, path: &str) -> Vec<&str> {
        let mut allowed: Vec<&str> = match path {
            "*" => self
                .tree
                .enumerate()
                .into_iter()
                .flat_map(|(_, endpoints)| endpoints.keys())
                .filter(|&method| method != Method::OPTIONS)
                .map(Method::as_str)
                .collect(),
            _ => self
                .tree
                .endpoints(path)
                .map(|endpoints| {
                    endpoints
                        .keys()
                        .filter(|&method| method != Method::OPTIONS)
                        .map(Method::as_str)
                        .collect()
                })
                .unwrap_or_default(),
        };

        allowed.sort_unstable();
        allowed.dedup();

        if !allowed.is_empty() {
            allowed.push(Method::OPTIONS.as_str())
        }

        allowed
    }

    /// Lists every registered path with its methods, for documentation and
    /// reporting tools.
    /// ```rust
    /// use radixroute::Router;
    /// use hyper::{Response, Body, Method};
    ///
    /// let router = Router::default()
    ///     .get("/api", |_| async { Ok(Response::new(Body::empty())) })
    ///     .put("/api/auth", |_| async { Ok(Response::new(Body::empty())) })
    ///     .post("/api/auth", |_| async { Ok(Response::new(Body::empty())) });
    ///
    /// let routes = router.routes();
    /// assert_eq!(routes.len(), 2);
    /// assert_eq!(routes["/api"], [&Method::GET]);
    /// assert_eq!(routes["/api/auth"], [&Method::POST, &Method::PUT]);
    /// ```
    pub fn routes(&self) -> BTreeMap<&str, Vec<&Method>> {
        self.tree
            .enumerate()
            .into_iter()
            .map(|(path, endpoints)| {
                let mut methods: Vec<&Method> = endpoints.keys().collect();
                methods.sort_unstable_by(|a, b| a.as_str().cmp(b.as_str()));
                (path, methods)
            })
            .collect()
    }
}

/// The default router configuration
impl Default for Router {
    fn default() -> Self {
        Self {
            tree: Tree::default(),
            handle_method_not_allowed: true,
            handle_options: true,
            global_options: None,
            method_not_allowed: None,
            not_found: None,
        }
    }
}

/// Represents a HTTP handler function.
/// This trait is implemented for asynchronous functions that take a `Request` and return a
/// `Result<Response<Body>, hyper::Error>`
/// ```rust
/// # use radixroute::Handler;
/// # use hyper::{Request, Response, Body};
/// async fn hello(_: Request<Body>) -> Result<Response<Body>, hyper::Error> {
///     Ok(Response::new(Body::empty()))
/// }
///
/// let handler: Box<dyn Handler> = Box::new(hello);
/// ```
pub trait Handler: Send + Sync {
    fn handle(
        &self,
        req: Request<Body>,
    ) -> Pin<Box<dyn Future<Output = hyper::Result<Response<Body>>> + Send + Sync>>;
}

impl<F, R> Handler for F
where
    F: Fn(Request<Body>) -> R + Send + Sync,
    R: Future<Output = Result<Response<Body>, hyper::Error>> + Send + Sync + 'static,
{
    fn handle(
        &self,
        req: Request<Body>,
    ) -> Pin<Box<dyn Future<Output = hyper::Result<Response<Body>>> + Send + Sync>> {
        Box::pin(self(req))
    }
}

#[doc(hidden)]
pub struct MakeRouterService(RouterService);

impl<T> Service<T> for MakeRouterService {
    type Response = RouterService;
    type Error = hyper::Error;
    type Future = future::Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _: T) -> Self::Future {
        let service = self.0.clone();
        future::ok(service)
    }
}

#[doc(hidden)]
#[derive(Clone)]
pub struct RouterService(Arc<Router>);

impl RouterService {
    fn new(router: Router) -> Self {
        RouterService(Arc::new(router))
    }
}

impl Service<Request<Body>> for RouterService {
    type Response = Response<Body>;
    type Error = hyper::Error;
    type Future = ResponseFut;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        self.0.serve(req)
    }
}

impl Router {
    /// Converts the `Router` into a `Service` which you can serve directly with `Hyper`.
    /// No routes can be added afterwards; the router is shared read-only
    /// between connections.
    /// ```rust,no_run
    /// # use radixroute::Router;
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// // Our router...
    /// let router = Router::default();
    ///
    /// // Convert it into a service...
    /// let service = router.into_service();
    ///
    /// // Serve with hyper
    /// hyper::Server::bind(&([127, 0, 0, 1], 3030).into())
    ///     .serve(service)
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn into_service(self) -> MakeRouterService {
        MakeRouterService(RouterService::new(self))
    }

    /// An asynchronous function from a `Request` to a `Response`. You will generally not need to use
    /// this function directly, and instead use
    /// [`Router::into_service`](crate::Router::into_service). However, it may be useful when
    /// incorporating the router into a larger service.
    /// ```rust,no_run
    /// # use radixroute::Router;
    /// # use hyper::service::{make_service_fn, service_fn};
    /// # use hyper::{Request, Body, Server};
    /// # use std::convert::Infallible;
    /// # use std::sync::Arc;
    ///
    /// # async fn run() {
    /// let router = Arc::new(Router::default());
    ///
    /// let make_svc = make_service_fn(move |_| {
    ///     let router = router.clone();
    ///     async move {
    ///         Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
    ///             let router = router.clone();
    ///             async move { router.serve(req).await }
    ///         }))
    ///     }
    /// });
    ///
    /// let server = Server::bind(&([127, 0, 0, 1], 3000).into())
    ///     .serve(make_svc)
    ///     .await;
    /// # }
    /// ```
    pub fn serve(&self, req: Request<Body>) -> ResponseFut {
        let path = req.uri().path();
        if let Some(handler) = self.tree.at(req.method(), path) {
            return ResponseFutKind::Boxed(handler.handle(req)).into();
        }

        tracing::trace!(method = %req.method(), path, "no route matched");

        if req.method() == Method::OPTIONS && self.handle_options {
            let allow = self.allowed(path);

            if !allow.is_empty() {
                return match self.global_options {
                    Some(ref handler) => ResponseFutKind::Boxed(handler.handle(req)).into(),
                    None => ResponseFutKind::Options(allow.join(", ")).into(),
                };
            }
        } else if self.handle_method_not_allowed {
            let allow = self.allowed(path);

            if !allow.is_empty() {
                return match self.method_not_allowed {
                    Some(ref handler) => ResponseFutKind::Boxed(handler.handle(req)).into(),
                    None => ResponseFutKind::MethodNotAllowed(allow.join(", ")).into(),
                };
            }
        }

        match self.not_found {
            Some(ref handler) => ResponseFutKind::Boxed(handler.handle(req)).into(),
            None => ResponseFutKind::NotFound.into(),
        }
    }
}

pub struct ResponseFut {
    kind: ResponseFutKind,
}

impl From<ResponseFutKind> for ResponseFut {
    fn from(kind: ResponseFutKind) -> Self {
        Self { kind }
    }
}

enum ResponseFutKind {
    Boxed(Pin<Box<dyn Future<Output = hyper::Result<Response<Body>>> + Send + Sync>>),
    MethodNotAllowed(String),
    Options(String),
    NotFound,
}

impl Future for ResponseFut {
    type Output = hyper::Result<Response<Body>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let ready = match self.kind {
            ResponseFutKind::Boxed(ref mut fut) => ready!(fut.as_mut().poll(cx)),
            ResponseFutKind::NotFound => Ok(Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Body::empty())
                .unwrap()),
            ResponseFutKind::Options(ref allowed) => Ok(Response::builder()
                .header(header::ALLOW, allowed)
                .body(Body::empty())
                .unwrap()),
            ResponseFutKind::MethodNotAllowed(ref allowed) => Ok(Response::builder()
                .header(header::ALLOW, allowed)
                .status(StatusCode::METHOD_NOT_ALLOWED)
                .body(Body::empty())
                .unwrap()),
        };

        Poll::Ready(ready)
    }
}
