use anyhow::Result;
use sprig::{
	hyper::{Body, Server},
	HttpRouterBuilder, Params, Request, Response, ResponseBuilder,
};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn show_params(params: Option<Params>) -> Result<sprig::hyper::Response<Body>> {
	dbg!(params);
	Ok(ResponseBuilder::default().body(Body::empty())?)
}

async fn hello() -> Result<sprig::hyper::Response<Body>> {
	Ok(ResponseBuilder::default().body(Body::from("hello"))?)
}

fn handler(params: Option<Params>, _req: Request) -> Response {
	Box::pin(show_params(params))
}

fn other_handler(_params: Option<Params>, _req: Request) -> Response {
	Box::pin(hello())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	tracing_subscriber::registry()
		.with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "sprig=debug".into()))
		.with(tracing_subscriber::fmt::layer())
		.init();

	let addr: SocketAddr = ([127, 0, 0, 1], 3000).into();

	let mut builder = HttpRouterBuilder::default();
	builder
		.get("/", other_handler)?
		.post("/foo/:first/bar/:second/baz", handler)?
		.get("/static/*filepath", handler)?
		.get("/:name", handler)?;

	let server = Server::bind(&addr).serve(builder.build());
	tracing::info!(%addr, "listening");

	server.await?;
	Ok(())
}
