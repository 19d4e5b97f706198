use thiserror::Error;

/// Why a pattern was rejected by [`Router::add_route`](crate::Router::add_route).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
	/// A `:` with no name after it.
	#[error("dynamic parameter must have a name")]
	UnnamedDynamic,

	/// A `*` with no name after it.
	#[error("catch-all parameter must have a name")]
	UnnamedCatchAll,

	/// A `*name` segment followed by more path.
	#[error("catch-all parameter must be the last path segment")]
	CatchAllNotLast,

	/// A segment holding more than one `:` or `*` marker.
	#[error("only one dynamic or catch-all parameter is allowed per path segment")]
	MultipleParameters,

	/// The pattern exceeds the router's configured segment cap.
	#[error("pattern has {found} path segments, the limit is {limit}")]
	TooManySegments { limit: usize, found: usize },
}

/// A method name outside the set of verbs routes can be registered under.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported HTTP method: {0}")]
pub struct UnsupportedMethod(pub String);
