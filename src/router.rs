use crate::{
	error::PatternError,
	node::{Node, NodeKind},
	route::{Method, RouteResult},
};
use std::{
	borrow::Cow,
	collections::HashMap,
	fmt::{self, Display, Formatter},
	mem,
};
use tracing::{debug, trace, warn};

/// Maps `(method, path)` pairs to route data through one prefix tree per method.
///
/// Routes are added with [`add_route`](Router::add_route) while the router is
/// still exclusively owned; once it is shared (typically behind an `Arc`) only
/// [`find_route`](Router::find_route) is reachable, so lookups never need a lock.
#[derive(Debug, Clone)]
pub struct Router<T> {
	roots: HashMap<Method, Node<T>>,
	max_segments: Option<usize>,
}

impl<T> Default for Router<T> {
	fn default() -> Self {
		Self {
			roots: HashMap::new(),
			max_segments: None,
		}
	}
}

impl<T> Router<T> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Rejects patterns with more than `limit` path segments. This bounds the
	/// recursion depth of a lookup.
	pub fn with_max_segments(limit: usize) -> Self {
		Self {
			roots: HashMap::new(),
			max_segments: Some(limit),
		}
	}

	pub fn max_segments(&self) -> Option<usize> {
		self.max_segments
	}

	/// The root of `method`'s tree, if any route was registered under it.
	pub fn root(&self, method: Method) -> Option<&Node<T>> {
		self.roots.get(&method)
	}

	/// Registers `data` under `pattern` for `method`.
	///
	/// A missing leading `/` is added. Segments starting with `:name` match a
	/// single path segment, a final `*name` segment matches the rest of the
	/// path. Registering the same pattern twice replaces the earlier data.
	///
	/// The pattern is validated in full before the tree is touched, so a
	/// rejected pattern leaves the router unchanged.
	pub fn add_route(&mut self, method: Method, pattern: &str, data: T) -> Result<(), PatternError> {
		let pattern = normalize(pattern);

		if let Err(err) = validate(&pattern, self.max_segments) {
			warn!(%method, pattern = %pattern, error = %err, "rejected route pattern");
			return Err(err);
		}

		insert(self.roots.entry(method).or_default(), &pattern, data);
		debug!(%method, pattern = %pattern, "registered route");
		Ok(())
	}

	/// Finds the most specific route for `path` under `method`.
	///
	/// At every node a static child is tried before a dynamic one, and a
	/// dynamic one before a catch-all. `path` must already have its query
	/// string removed.
	pub fn find_route(&self, method: Method, path: &str) -> Option<RouteResult<'_, T>> {
		let root = self.roots.get(&method)?;

		let mut bindings = Vec::new();
		let data = lookup(root, path, &mut bindings);
		trace!(%method, path, matched = data.is_some(), "route lookup");

		let params = if bindings.is_empty() {
			None
		} else {
			Some(bindings.into_iter().collect())
		};

		data.map(|data| RouteResult { data, params })
	}

	/// Renders every method's tree, in a fixed method order.
	pub fn describe(&self) -> String {
		let mut out = String::from("\n");
		for method in Method::ALL.iter() {
			if let Some(root) = self.roots.get(method) {
				out.push_str(method.as_str());
				out.push_str(&root.describe());
			}
		}
		out
	}
}

impl<T> Display for Router<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.describe())
	}
}

fn normalize(pattern: &str) -> Cow<'_, str> {
	if pattern.starts_with('/') {
		Cow::Borrowed(pattern)
	} else {
		Cow::Owned(format!("/{}", pattern))
	}
}

fn validate(pattern: &str, max_segments: Option<usize>) -> Result<(), PatternError> {
	if let Some(limit) = max_segments {
		let found = pattern.matches('/').count();
		if found > limit {
			return Err(PatternError::TooManySegments { limit, found });
		}
	}

	let mut rest = pattern;
	loop {
		let start = index_any(rest, &[':', '*']);
		if start == rest.len() {
			return Ok(());
		}

		rest = &rest[start..];
		let end = index_any(rest, &['/']);
		let name = &rest[1..end];

		if rest.starts_with(':') {
			if name.is_empty() {
				return Err(PatternError::UnnamedDynamic);
			}
		} else {
			if name.is_empty() {
				return Err(PatternError::UnnamedCatchAll);
			}
			if end != rest.len() {
				return Err(PatternError::CatchAllNotLast);
			}
		}

		if index_any(name, &[':', '*']) != name.len() {
			return Err(PatternError::MultipleParameters);
		}

		rest = &rest[end..];
	}
}

// `pattern` has already passed `validate`.
fn insert<T>(root: &mut Node<T>, pattern: &str, data: T) {
	let mut node = root;
	let mut pattern = pattern;

	while !pattern.is_empty() {
		if !node.fragment.is_empty() {
			let i = index_common_prefix(&node.fragment, pattern);
			if i < node.fragment.len() {
				split(node, i);
			}
			pattern = &pattern[i..];

			// The sentinel stands for the whole parameter segment.
			if node.kind != NodeKind::Static {
				let end = index_any(pattern, &['/']);
				let name = &pattern[..end];
				if node.name.as_deref() != Some(name) {
					warn!(
						existing = node.name.as_deref().unwrap_or_default(),
						ignored = name,
						"parameter already registered under another name at this position"
					);
				}
				pattern = &pattern[end..];
			}

			if let Some(next) = pattern.chars().next() {
				node = match node.child_position(next) {
					Some(i) => &mut node.children[i],
					None => node.create_child(next),
				};
			}
			continue;
		}

		match node.kind {
			NodeKind::Static => {
				let end = index_any(pattern, &[':', '*']);
				node.fragment.push_str(&pattern[..end]);
				pattern = &pattern[end..];
			}
			NodeKind::Dynamic => {
				let end = index_any(pattern, &['/']);
				node.fragment.push(':');
				node.name = Some(pattern[1..end].to_owned());
				pattern = &pattern[end..];
			}
			NodeKind::CatchAll => {
				node.fragment.push('*');
				node.name = Some(pattern[1..].to_owned());
				pattern = "";
			}
		}

		if let Some(next) = pattern.chars().next() {
			node = node.create_child(next);
		}
	}

	node.data = Some(data);
}

// Moves everything past `at` into a new only child.
fn split<T>(node: &mut Node<T>, at: usize) {
	let child = Node {
		kind: node.kind,
		fragment: node.fragment.split_off(at),
		indices: mem::take(&mut node.indices),
		children: mem::take(&mut node.children),
		name: node.name.take(),
		data: node.data.take(),
	};

	node.kind = NodeKind::Static;
	node.indices = child.fragment.chars().take(1).collect();
	node.children = vec![child];
}

// Leaves `bindings` as it found them whenever it returns `None`.
fn lookup<'n, 'p, T>(
	node: &'n Node<T>,
	path: &'p str,
	bindings: &mut Vec<(&'n str, &'p str)>,
) -> Option<&'n T> {
	let i = index_common_prefix(&node.fragment, path);
	if i < node.fragment.len() {
		return None;
	}
	if i == path.len() {
		return node.data.as_ref();
	}

	let path = &path[i..];

	if let Some(child) = path.chars().next().and_then(|c| node.find_child(c)) {
		if child.kind == NodeKind::Static {
			if let Some(data) = lookup(child, path, bindings) {
				return Some(data);
			}
		}
	}

	if let Some((child, name)) = node.param_child(':') {
		let end = index_any(path, &['/']);
		if end > 0 {
			let mark = bindings.len();
			bindings.push((name, &path[..end]));

			let found = if end == path.len() {
				child.data.as_ref()
			} else if let [next] = child.children.as_slice() {
				lookup(next, &path[end..], bindings)
			} else {
				None
			};

			if found.is_some() {
				return found;
			}
			bindings.truncate(mark);
		}
	}

	if let Some((child, name)) = node.param_child('*') {
		if let Some(data) = child.data.as_ref() {
			bindings.push((name, path));
			return Some(data);
		}
	}

	None
}

/// Returns the byte index of the first character at which `a` and `b`
/// differ, or the length of the shorter one when one is a prefix of the other.
///
/// The result is always a char boundary of both strings.
pub fn index_common_prefix(a: &str, b: &str) -> usize {
	a.char_indices()
		.zip(b.chars())
		.find(|((_, x), y)| x != y)
		.map_or_else(|| a.len().min(b.len()), |((i, _), _)| i)
}

/// Returns the byte index of the first character of `s` found in `chars`, or
/// `s.len()` when there is none.
pub fn index_any(s: &str, chars: &[char]) -> usize {
	s.find(chars).unwrap_or_else(|| s.len())
}
