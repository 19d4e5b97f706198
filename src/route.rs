use crate::error::UnsupportedMethod;
use std::{
	collections::HashMap,
	fmt::{self, Display, Formatter},
	str::FromStr,
};

/// The HTTP verbs a route can be registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
	Get,
	Head,
	Patch,
	Post,
	Put,
	Delete,
	Options,
}

impl Method {
	pub const ALL: [Method; 7] = [
		Method::Get,
		Method::Head,
		Method::Patch,
		Method::Post,
		Method::Put,
		Method::Delete,
		Method::Options,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Head => "HEAD",
			Method::Patch => "PATCH",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Delete => "DELETE",
			Method::Options => "OPTIONS",
		}
	}
}

impl Display for Method {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Method {
	type Err = UnsupportedMethod;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Method::ALL
			.iter()
			.copied()
			.find(|method| method.as_str() == s)
			.ok_or_else(|| UnsupportedMethod(s.to_owned()))
	}
}

/// Parameter values captured while matching a path, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(HashMap<String, String>);

impl Params {
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}
}

impl<K, V> FromIterator<(K, V)> for Params
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}

impl From<Params> for HashMap<String, String> {
	fn from(params: Params) -> Self {
		params.0
	}
}

/// A successful lookup: the route's data and the parameters bound on the way.
///
/// `params` is `None` when the matched route has no parameters.
#[derive(Debug, PartialEq, Eq)]
pub struct RouteResult<'a, T> {
	pub data: &'a T,
	pub params: Option<Params>,
}
