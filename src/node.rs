use std::fmt::{self, Display, Formatter};

/// The role a node plays when matching a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
	/// Literal path text.
	Static,
	/// A single named segment (`:name`).
	Dynamic,
	/// Everything remaining, slashes included (`*name`).
	CatchAll,
}

impl NodeKind {
	/// The kind of child a selector character introduces.
	pub fn from_selector(selector: char) -> Self {
		match selector {
			':' => NodeKind::Dynamic,
			'*' => NodeKind::CatchAll,
			_ => NodeKind::Static,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			NodeKind::Static => "static",
			NodeKind::Dynamic => "dynamic",
			NodeKind::CatchAll => "catch-all",
		}
	}
}

impl Display for NodeKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A single vertex of a method's prefix tree.
///
/// `indices[i]` is the first character of `children[i]`'s fragment (or the `:`/`*`
/// sentinel), so a child can be selected without looking inside it. Dynamic
/// nodes always carry the fragment `:` and catch-all nodes `*`; the parameter
/// name lives in `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<T> {
	pub(crate) kind: NodeKind,
	pub(crate) fragment: String,
	pub(crate) indices: Vec<char>,
	pub(crate) children: Vec<Node<T>>,
	pub(crate) name: Option<String>,
	pub(crate) data: Option<T>,
}

impl<T> Default for Node<T> {
	fn default() -> Self {
		Self::new(NodeKind::Static)
	}
}

impl<T> Node<T> {
	pub fn new(kind: NodeKind) -> Self {
		Self {
			kind,
			fragment: String::new(),
			indices: Vec::new(),
			children: Vec::new(),
			name: None,
			data: None,
		}
	}

	pub fn kind(&self) -> NodeKind {
		self.kind
	}

	pub fn fragment(&self) -> &str {
		&self.fragment
	}

	pub fn indices(&self) -> &[char] {
		&self.indices
	}

	pub fn children(&self) -> &[Node<T>] {
		&self.children
	}

	/// Parameter name bound by a dynamic or catch-all node.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Route data, present only where a registered pattern ends.
	pub fn data(&self) -> Option<&T> {
		self.data.as_ref()
	}

	/// Appends a fresh child selected by `selector` and returns it.
	///
	/// The child's kind follows the selector: `:` makes a dynamic node, `*` a
	/// catch-all node, anything else a static node. Callers must have checked
	/// that no child already uses `selector`.
	pub fn create_child(&mut self, selector: char) -> &mut Node<T> {
		debug_assert!(self.child_position(selector).is_none());

		self.indices.push(selector);
		self.children.push(Node::new(NodeKind::from_selector(selector)));

		let last = self.children.len() - 1;
		&mut self.children[last]
	}

	/// Returns the child selected by `selector`, if any.
	pub fn find_child(&self, selector: char) -> Option<&Node<T>> {
		self.child_position(selector).map(|i| &self.children[i])
	}

	pub(crate) fn child_position(&self, selector: char) -> Option<usize> {
		self.indices.iter().position(|&c| c == selector)
	}

	/// The dynamic (`:`) or catch-all (`*`) child together with its name.
	pub(crate) fn param_child(&self, selector: char) -> Option<(&Node<T>, &str)> {
		let child = self.find_child(selector)?;
		child.name().map(|name| (child, name))
	}

	/// Renders the node and everything below it as a box-drawing tree.
	pub fn describe(&self) -> String {
		let mut out = String::from("\n");
		let mut stack = vec![(self, String::new(), true)];

		while let Some((node, prefix, is_last)) = stack.pop() {
			out.push_str(&prefix);
			out.push_str(if is_last { "└── " } else { "├── " });
			out.push_str(&node.fragment);
			out.push_str(", type=");
			out.push_str(node.kind.as_str());
			out.push_str(", ");

			if !node.indices.is_empty() {
				let indices: Vec<String> = node.indices.iter().map(char::to_string).collect();
				out.push_str("indices=[");
				out.push_str(&indices.join(", "));
				out.push_str("], ");
			}
			if let Some(name) = &node.name {
				out.push_str("name=");
				out.push_str(name);
				out.push_str(", ");
			}

			out.push_str(if node.data.is_some() { "data=Y" } else { "data=N" });
			out.push('\n');

			let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
			let count = node.children.len();
			for (i, child) in node.children.iter().enumerate().rev() {
				stack.push((child, child_prefix.clone(), i == count - 1));
			}
		}

		out
	}
}

impl<T> Display for Node<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.describe())
	}
}
