//! Request parameter multimap and its normalized (sorted, encoded) form.

// std
use std::{cmp::Ordering, slice};
// self
use crate::{_prelude::*, encoding};

/// Value stored under a parameter name: a single value or a repeated key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
	/// Key supplied once.
	Single(String),
	/// Key supplied several times (array-valued).
	Multi(Vec<String>),
}
impl ParamValue {
	/// Every value carried under the key, in insertion order.
	pub fn values(&self) -> &[String] {
		match self {
			Self::Single(value) => slice::from_ref(value),
			Self::Multi(values) => values,
		}
	}

	fn push(&mut self, value: String) {
		match self {
			Self::Single(existing) => *self = Self::Multi(vec![std::mem::take(existing), value]),
			Self::Multi(values) => values.push(value),
		}
	}
}
impl From<String> for ParamValue {
	fn from(value: String) -> Self {
		Self::Single(value)
	}
}
impl From<&str> for ParamValue {
	fn from(value: &str) -> Self {
		Self::Single(value.to_owned())
	}
}
impl From<Vec<String>> for ParamValue {
	fn from(values: Vec<String>) -> Self {
		Self::Multi(values)
	}
}
impl<const N: usize> From<[&str; N]> for ParamValue {
	fn from(values: [&str; N]) -> Self {
		Self::Multi(values.iter().map(|value| (*value).to_owned()).collect())
	}
}

/// Decoded request parameters gathered from the query string, form body, and
/// `Authorization` header.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters(BTreeMap<String, ParamValue>);
impl Parameters {
	/// Creates an empty parameter set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets `key` to `value`, replacing whatever was stored before.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
		self.0.insert(key.into(), value.into())
	}

	/// Adds one more value under `key`; a repeated key becomes [`ParamValue::Multi`].
	pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
		let key = key.into();
		let value = value.into();

		match self.0.get_mut(&key) {
			Some(existing) => existing.push(value),
			None => {
				self.0.insert(key, ParamValue::Single(value));
			},
		}
	}

	/// Raw lookup.
	pub fn get(&self, key: &str) -> Option<&ParamValue> {
		self.0.get(key)
	}

	/// Returns the value only when `key` was supplied exactly once.
	pub fn single(&self, key: &str) -> Option<&str> {
		match self.0.get(key) {
			Some(ParamValue::Single(value)) => Some(value),
			_ => None,
		}
	}

	/// Removes `key` and returns its value.
	pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
		self.0.remove(key)
	}

	/// Returns true if `key` is present.
	pub fn contains_key(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	/// Number of distinct keys.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no parameters are present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterator over keys and their values.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value))
	}

	/// Iterator over every `(key, value)` pair with repeated keys expanded.
	pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().flat_map(|(key, value)| {
			value.values().iter().map(move |value| (key.as_str(), value.as_str()))
		})
	}
}
impl<K, V> FromIterator<(K, V)> for Parameters
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		let mut params = Self::new();

		for (key, value) in iter {
			params.append(key, value);
		}

		params
	}
}
impl<K, V> Extend<(K, V)> for Parameters
where
	K: Into<String>,
	V: Into<String>,
{
	fn extend<I>(&mut self, iter: I)
	where
		I: IntoIterator<Item = (K, V)>,
	{
		for (key, value) in iter {
			self.append(key, value);
		}
	}
}

/// Comparison used to order encoded parameter pairs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamOrdering {
	/// Natural order: runs of ASCII digits compare by numeric value, so `p2` sorts before
	/// `p10`. Matches the ordering existing API clients were issued against.
	#[default]
	Natural,
	/// Strict byte-value order from RFC 5849 section 3.4.1.3.2.
	Byte,
}
impl ParamOrdering {
	/// Compares two encoded strings under this ordering.
	pub fn compare(self, a: &str, b: &str) -> Ordering {
		match self {
			Self::Natural => natural_cmp(a, b),
			Self::Byte => a.as_bytes().cmp(b.as_bytes()),
		}
	}
}

/// Encodes, expands, sorts (key first, then value), and `&`-joins the parameters.
///
/// `oauth_signature` is not filtered here; [`build_base_string`](super::build_base_string)
/// drops it before delegating.
pub fn normalize_params(params: &Parameters, ordering: ParamOrdering) -> String {
	normalize_pairs(params.pairs(), ordering)
}

pub(crate) fn normalize_pairs<'a, I>(pairs: I, ordering: ParamOrdering) -> String
where
	I: IntoIterator<Item = (&'a str, &'a str)>,
{
	let mut encoded = pairs
		.into_iter()
		.map(|(key, value)| (encoding::encode(key), encoding::encode(value)))
		.collect::<Vec<_>>();

	encoded.sort_by(|(key_a, value_a), (key_b, value_b)| {
		ordering.compare(key_a, key_b).then_with(|| ordering.compare(value_a, value_b))
	});

	let mut buf = String::new();

	for (idx, (key, value)) in encoded.iter().enumerate() {
		if idx > 0 {
			buf.push('&');
		}

		buf.push_str(key);
		buf.push('=');
		buf.push_str(value);
	}

	buf
}

/// Natural-order comparison.
///
/// Maximal runs of ASCII digits are compared by numeric value; when two runs are numerically
/// equal the one with fewer leading zeros sorts first. Every other byte compares by value.
/// Only identical strings compare equal.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
	let (a, b) = (a.as_bytes(), b.as_bytes());
	let (mut i, mut j) = (0, 0);

	while i < a.len() && j < b.len() {
		let ordering = if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
			let end_a = digit_run_end(a, i);
			let end_b = digit_run_end(b, j);
			let ordering = compare_digit_runs(&a[i..end_a], &b[j..end_b]);

			i = end_a;
			j = end_b;

			ordering
		} else {
			let ordering = a[i].cmp(&b[j]);

			i += 1;
			j += 1;

			ordering
		};

		if ordering != Ordering::Equal {
			return ordering;
		}
	}

	(a.len() - i).cmp(&(b.len() - j))
}

fn digit_run_end(bytes: &[u8], start: usize) -> usize {
	bytes[start..].iter().position(|b| !b.is_ascii_digit()).map_or(bytes.len(), |len| start + len)
}

fn compare_digit_runs(a: &[u8], b: &[u8]) -> Ordering {
	let trimmed_a = trim_leading_zeros(a);
	let trimmed_b = trim_leading_zeros(b);

	trimmed_a
		.len()
		.cmp(&trimmed_b.len())
		.then_with(|| trimmed_a.cmp(trimmed_b))
		.then_with(|| a.len().cmp(&b.len()))
}

fn trim_leading_zeros(run: &[u8]) -> &[u8] {
	let zeros = run.iter().take_while(|b| **b == b'0').count();

	&run[zeros..]
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn repeated_keys_promote_to_multi() {
		let mut params = Parameters::new();

		params.append("color", "blue");

		assert_eq!(params.single("color"), Some("blue"));

		params.append("color", "red");

		assert_eq!(params.get("color"), Some(&ParamValue::from(["blue", "red"])));
		assert_eq!(params.single("color"), None);
		assert_eq!(params.pairs().count(), 2);
	}

	#[test]
	fn array_values_expand_and_sort_within_key() {
		let mut params = Parameters::new();

		params.insert("color", ["blue", "red", "green"]);

		assert_eq!(
			normalize_params(&params, ParamOrdering::Natural),
			"color=blue&color=green&color=red"
		);
		assert_eq!(normalize_params(&params, ParamOrdering::Byte), "color=blue&color=green&color=red");
	}

	#[test]
	fn keys_and_values_are_encoded_before_sorting() {
		let params: Parameters =
			[("b", "x y"), ("a", "1+1"), ("c", "~ok"), ("a b", "z")].into_iter().collect();

		assert_eq!(
			normalize_params(&params, ParamOrdering::Byte),
			"a=1%2B1&a%20b=z&b=x%20y&c=~ok"
		);
	}

	#[test]
	fn normalization_ignores_insertion_order() {
		let pairs = [("oauth_nonce", "n"), ("a", "3"), ("a", "1"), ("z", ""), ("a", "2"), ("m", "x")];
		let expected = normalize_params(&pairs.iter().copied().collect(), ParamOrdering::Natural);

		for rotation in 0..pairs.len() {
			let mut shuffled = pairs.to_vec();

			shuffled.rotate_left(rotation);
			shuffled.reverse();

			let params: Parameters = shuffled.into_iter().collect();

			assert_eq!(normalize_params(&params, ParamOrdering::Natural), expected);
		}

		assert_eq!(expected, "a=1&a=2&a=3&m=x&oauth_nonce=n&z=");
	}

	#[test]
	fn natural_and_byte_orderings_diverge_on_numbers() {
		let params: Parameters = [("page", "10"), ("page", "9"), ("page", "100")].into_iter().collect();

		assert_eq!(
			normalize_params(&params, ParamOrdering::Natural),
			"page=9&page=10&page=100"
		);
		assert_eq!(normalize_params(&params, ParamOrdering::Byte), "page=10&page=100&page=9");
	}

	#[test]
	fn natural_cmp_is_a_total_order() {
		assert_eq!(natural_cmp("p2", "p10"), Ordering::Less);
		assert_eq!(natural_cmp("p10", "p2"), Ordering::Greater);
		assert_eq!(natural_cmp("a01", "a1"), Ordering::Greater);
		assert_eq!(natural_cmp("a1", "a1"), Ordering::Equal);
		assert_eq!(natural_cmp("a", "a1"), Ordering::Less);
		assert_eq!(natural_cmp("a/", "a1"), Ordering::Less);
		assert_eq!(natural_cmp("a:", "a99"), Ordering::Greater);
		assert_eq!(natural_cmp("", ""), Ordering::Equal);
	}
}
