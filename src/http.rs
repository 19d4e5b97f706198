use crate::{Method, Params, PatternError, Router};
use anyhow::{Error, Result};
use hyper::{
	body::Body,
	header::{HeaderValue, CONNECTION},
	service::Service,
	StatusCode,
};
use std::{
	convert::Infallible,
	future::{ready, Future, Ready},
	pin::Pin,
	sync::Arc,
	task::{Context, Poll},
};
use tracing::{debug, error};

pub use hyper;

pub use hyper::http::response::Builder as ResponseBuilder;
pub type Request = hyper::Request<Body>;
pub type Response = Pin<Box<dyn Future<Output = Result<hyper::Response<Body>>> + Send>>;

/// A route handler: receives the parameters bound by the route, if any.
pub type Handler = fn(Option<Params>, Request) -> Response;

/// A function that can convert an error into a response.
pub type ErrorHandler = fn(e: Error) -> hyper::Response<Body>;

/// A function that handles unroutable requests and creates a response.
pub type NotFoundHandler = fn(req: Request) -> hyper::Response<Body>;

fn text(status: StatusCode, body: &'static str) -> hyper::Response<Body> {
	let mut res = hyper::Response::new(Body::from(body));
	*res.status_mut() = status;
	res
}

fn default_error_handler(_e: Error) -> hyper::Response<Body> {
	let mut res = text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
	res.headers_mut().insert(CONNECTION, HeaderValue::from_static("close"));
	res
}

fn default_not_found_handler(_req: Request) -> hyper::Response<Body> {
	text(StatusCode::NOT_FOUND, "Not Found")
}

impl TryFrom<&hyper::Method> for Method {
	type Error = crate::UnsupportedMethod;

	fn try_from(method: &hyper::Method) -> Result<Self, Self::Error> {
		method.as_str().parse()
	}
}

/// Collects handlers and builds an [`HttpRouter`].
///
/// Registration fails fast: an invalid pattern is returned as an error
/// instead of being skipped.
#[derive(Debug)]
pub struct HttpRouterBuilder {
	router: Router<Handler>,
	internal_error: ErrorHandler,
	not_found: NotFoundHandler,
}

impl Default for HttpRouterBuilder {
	fn default() -> Self {
		Self::from(Router::default())
	}
}

impl From<Router<Handler>> for HttpRouterBuilder {
	fn from(router: Router<Handler>) -> Self {
		Self {
			router,
			internal_error: default_error_handler,
			not_found: default_not_found_handler,
		}
	}
}

impl HttpRouterBuilder {
	pub fn route(&mut self, method: Method, pattern: &str, handler: Handler) -> Result<&mut Self, PatternError> {
		self.router.add_route(method, pattern, handler)?;
		Ok(self)
	}

	pub fn get(&mut self, pattern: &str, handler: Handler) -> Result<&mut Self, PatternError> {
		self.route(Method::Get, pattern, handler)
	}

	pub fn head(&mut self, pattern: &str, handler: Handler) -> Result<&mut Self, PatternError> {
		self.route(Method::Head, pattern, handler)
	}

	pub fn patch(&mut self, pattern: &str, handler: Handler) -> Result<&mut Self, PatternError> {
		self.route(Method::Patch, pattern, handler)
	}

	pub fn post(&mut self, pattern: &str, handler: Handler) -> Result<&mut Self, PatternError> {
		self.route(Method::Post, pattern, handler)
	}

	pub fn put(&mut self, pattern: &str, handler: Handler) -> Result<&mut Self, PatternError> {
		self.route(Method::Put, pattern, handler)
	}

	pub fn delete(&mut self, pattern: &str, handler: Handler) -> Result<&mut Self, PatternError> {
		self.route(Method::Delete, pattern, handler)
	}

	pub fn options(&mut self, pattern: &str, handler: Handler) -> Result<&mut Self, PatternError> {
		self.route(Method::Options, pattern, handler)
	}

	/// Replaces the default `404 Not Found` response.
	pub fn not_found_handler(&mut self, handler: NotFoundHandler) -> &mut Self {
		self.not_found = handler;
		self
	}

	/// Replaces the default `500 Internal Server Error` response.
	pub fn internal_error_handler(&mut self, handler: ErrorHandler) -> &mut Self {
		self.internal_error = handler;
		self
	}

	pub fn build(self) -> HttpRouter {
		HttpRouter {
			router: Arc::new(self.router),
			internal_error: self.internal_error,
			not_found: self.not_found,
		}
	}
}

/// A frozen router; pass it to hyper as the make-service.
#[derive(Debug, Clone)]
pub struct HttpRouter {
	router: Arc<Router<Handler>>,
	internal_error: ErrorHandler,
	not_found: NotFoundHandler,
}

impl HttpRouter {
	pub fn router(&self) -> &Router<Handler> {
		&self.router
	}
}

impl<T> Service<T> for HttpRouter {
	type Response = RouteHandler;
	type Error = Infallible;
	type Future = Ready<Result<Self::Response, Self::Error>>;

	fn poll_ready(&mut self, _: &mut Context) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, _: T) -> Self::Future {
		ready(Ok(RouteHandler {
			router: Arc::clone(&self.router),
			internal_error: self.internal_error,
			not_found: self.not_found,
		}))
	}
}

/// Responsible for handling the actual HTTP requests from hyper.
#[derive(Debug, Clone)]
pub struct RouteHandler {
	router: Arc<Router<Handler>>,
	internal_error: ErrorHandler,
	not_found: NotFoundHandler,
}

impl Service<Request> for RouteHandler {
	type Response = hyper::Response<Body>;
	type Error = Infallible;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

	fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, req: Request) -> Self::Future {
		// Unsupported verbs are treated like any other miss.
		let matched = Method::try_from(req.method()).ok().and_then(|method| {
			self.router
				.find_route(method, req.uri().path())
				.map(|found| (*found.data, found.params))
		});

		match matched {
			Some((handler, params)) => {
				let method = req.method().clone();
				let path = req.uri().path().to_owned();
				let fut = handler(params, req);
				let internal_error = self.internal_error;

				Box::pin(async move {
					Ok(fut.await.unwrap_or_else(|e| {
						error!(%method, path = %path, error = %e, "route handler failed");
						internal_error(e)
					}))
				})
			}
			None => {
				debug!(method = %req.method(), path = req.uri().path(), "no route matched");
				let response = (self.not_found)(req);
				Box::pin(async { Ok(response) })
			}
		}
	}
}

#[cfg(test)]
mod test {
	use super::{HttpRouter, HttpRouterBuilder, Request, Response};
	use crate::{Method, Params, PatternError};
	use anyhow::{anyhow, Result};
	use hyper::{body, header::CONNECTION, service::Service, Body, StatusCode};

	async fn echo(params: Option<Params>) -> Result<hyper::Response<Body>> {
		let mut pairs: Vec<String> = params
			.iter()
			.flat_map(Params::iter)
			.map(|(k, v)| format!("{}={}", k, v))
			.collect();
		pairs.sort();
		Ok(hyper::Response::new(Body::from(pairs.join("&"))))
	}

	fn echo_params(params: Option<Params>, _req: Request) -> Response {
		Box::pin(echo(params))
	}

	async fn me() -> Result<hyper::Response<Body>> {
		Ok(hyper::Response::new(Body::from("user")))
	}

	fn user(_params: Option<Params>, _req: Request) -> Response {
		Box::pin(me())
	}

	async fn boom() -> Result<hyper::Response<Body>> {
		Err(anyhow!("boom"))
	}

	fn failing(_params: Option<Params>, _req: Request) -> Response {
		Box::pin(boom())
	}

	fn teapot(_req: Request) -> hyper::Response<Body> {
		let mut res = hyper::Response::new(Body::empty());
		*res.status_mut() = StatusCode::IM_A_TEAPOT;
		res
	}

	async fn send(router: &mut HttpRouter, method: &str, uri: &str) -> hyper::Response<Body> {
		let mut handler = router.call(()).await.unwrap();
		let req = hyper::Request::builder()
			.method(method)
			.uri(uri)
			.body(Body::empty())
			.unwrap();
		handler.call(req).await.unwrap()
	}

	async fn text(res: hyper::Response<Body>) -> String {
		let bytes = body::to_bytes(res.into_body()).await.unwrap();
		String::from_utf8(bytes.to_vec()).unwrap()
	}

	fn app() -> HttpRouter {
		let mut builder = HttpRouterBuilder::default();
		builder
			.get("/users/me", user)
			.unwrap()
			.get("/users/:id", echo_params)
			.unwrap()
			.post("/files/*path", echo_params)
			.unwrap()
			.get("/fail", failing)
			.unwrap();
		builder.build()
	}

	#[tokio::test]
	async fn dispatches_with_params() {
		let mut router = app();

		let res = send(&mut router, "GET", "/users/42?verbose=1").await;
		assert_eq!(res.status(), StatusCode::OK);
		assert_eq!(text(res).await, "id=42");

		let res = send(&mut router, "POST", "/files/a/b.txt").await;
		assert_eq!(text(res).await, "path=a/b.txt");
	}

	#[tokio::test]
	async fn prefers_static_routes() {
		let mut router = app();

		let res = send(&mut router, "GET", "/users/me").await;
		assert_eq!(text(res).await, "user");
	}

	#[tokio::test]
	async fn misses_are_not_found() {
		let mut router = app();

		let res = send(&mut router, "GET", "/nowhere").await;
		assert_eq!(res.status(), StatusCode::NOT_FOUND);
		assert_eq!(text(res).await, "Not Found");

		// No fallback across methods.
		let res = send(&mut router, "POST", "/users/42").await;
		assert_eq!(res.status(), StatusCode::NOT_FOUND);

		let res = send(&mut router, "TRACE", "/users/42").await;
		assert_eq!(res.status(), StatusCode::NOT_FOUND);
	}

	#[tokio::test]
	async fn handler_errors_become_500() {
		let mut router = app();

		let res = send(&mut router, "GET", "/fail").await;
		assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(res.headers().get(CONNECTION).unwrap(), "close");
		assert_eq!(text(res).await, "Internal Server Error");
	}

	#[tokio::test]
	async fn custom_handlers() {
		let mut builder = HttpRouterBuilder::default();
		builder
			.not_found_handler(teapot)
			.internal_error_handler(|e| hyper::Response::new(Body::from(e.to_string())));
		builder.get("/fail", failing).unwrap();
		let mut router = builder.build();

		let res = send(&mut router, "GET", "/missing").await;
		assert_eq!(res.status(), StatusCode::IM_A_TEAPOT);

		let res = send(&mut router, "GET", "/fail").await;
		assert_eq!(text(res).await, "boom");
	}

	#[test]
	fn registration_fails_fast() {
		let mut builder = HttpRouterBuilder::default();

		assert_eq!(builder.get("/foo/:", user).err(), Some(PatternError::UnnamedDynamic));
		assert!(builder.build().router().root(Method::Get).is_none());
	}

	#[test]
	fn converts_hyper_methods() {
		assert_eq!(Method::try_from(&hyper::Method::DELETE), Ok(Method::Delete));
		assert!(Method::try_from(&hyper::Method::CONNECT).is_err());
	}
}
