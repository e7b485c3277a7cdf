use crate::Gr8Error;
use crate::Gr8Result;

/// Values that make a property truthy, compared case-insensitively.
const TRUTHY_VALUES: [&str; 3] = ["yes", "y", "true"];

/// A single named property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
	pub key: String,
	pub value: String,
}

impl Pair {
	pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			value: value.into(),
		}
	}

	/// True when the value reads as an affirmative: `yes`, `y`, or `true`.
	pub fn truthy(&self) -> bool {
		TRUTHY_VALUES
			.iter()
			.any(|v| self.value.eq_ignore_ascii_case(v))
	}

	/// True when the value is non-empty after trimming outer whitespace.
	pub fn present(&self) -> bool {
		!self.value.trim().is_empty()
	}
}

/// An ordered collection of properties. Insertion order is preserved and
/// lookup is linear by key — property sets are small (one manifest plus
/// overrides) and order matters for prompting and pre-rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pairs {
	pairs: Vec<Pair>,
}

impl Pairs {
	pub fn new() -> Self {
		Self::default()
	}

	/// Find the pair with the given key, if any.
	pub fn find(&self, key: &str) -> Option<&Pair> {
		self.pairs.iter().find(|pair| pair.key == key)
	}

	/// Fetch the value for the given key, if any.
	pub fn fetch(&self, key: &str) -> Option<&str> {
		self.find(key).map(|pair| pair.value.as_str())
	}

	pub fn push(&mut self, pair: Pair) {
		self.pairs.push(pair);
	}

	/// Insert or replace a single property, keeping the position of an
	/// existing key.
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
		let pair = Pair::new(key, value);
		match self.pairs.iter_mut().find(|p| p.key == pair.key) {
			Some(existing) => *existing = pair,
			None => self.pairs.push(pair),
		}
	}

	/// Merge another set into this one. Existing keys are overwritten in
	/// place (first occurrence keeps its position), new keys are appended.
	pub fn merge(&mut self, incoming: Pairs) {
		for pair in incoming.pairs {
			self.set(pair.key, pair.value);
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = &Pair> {
		self.pairs.iter()
	}

	pub fn len(&self) -> usize {
		self.pairs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.pairs.is_empty()
	}
}

impl<K, V> FromIterator<(K, V)> for Pairs
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			pairs: iter
				.into_iter()
				.map(|(key, value)| Pair::new(key, value))
				.collect(),
		}
	}
}

impl IntoIterator for Pairs {
	type IntoIter = std::vec::IntoIter<Pair>;
	type Item = Pair;

	fn into_iter(self) -> Self::IntoIter {
		self.pairs.into_iter()
	}
}

enum ManifestState {
	Key,
	Value,
	Comment,
}

/// Parse the line-oriented `default.properties` format into an ordered
/// property set.
///
/// Keys start with a letter, `#` opens a line comment, and `=` separates
/// key from value. Values run to the end of the line and are free-form —
/// quotes, `=`, and template syntax all pass through untouched. Keys and
/// values are trimmed of outer whitespace when committed.
pub fn parse_properties(text: &str) -> Gr8Result<Pairs> {
	let mut pairs = Pairs::new();
	let mut state = ManifestState::Key;
	let mut key = String::new();
	let mut value = String::new();
	let mut index = 0;

	for chr in text.chars() {
		match state {
			ManifestState::Key => {
				if (key.is_empty() && (chr == ' ' || chr == '\t')) || chr == '\r' || chr == '\n' {
					// Leading whitespace before a key is insignificant.
				} else if key.is_empty() && chr == '#' {
					state = ManifestState::Comment;
				} else if key.is_empty() && !chr.is_ascii_alphabetic() {
					return Err(Gr8Error::ManifestParse {
						index,
						cause: format!("unexpected char `{chr}`"),
					});
				} else if chr == '=' {
					state = ManifestState::Value;
				} else {
					key.push(chr);
				}
			}
			ManifestState::Comment => {
				if chr == '\n' {
					state = ManifestState::Key;
				}
			}
			ManifestState::Value => {
				if chr == '\n' {
					pairs.push(Pair::new(key.trim(), value.trim()));
					key.clear();
					value.clear();
					state = ManifestState::Key;
				} else {
					value.push(chr);
				}
			}
		}
		index += 1;
	}

	match state {
		ManifestState::Key if !key.is_empty() => Err(Gr8Error::ManifestParse {
			index,
			cause: "unexpected end of input".to_string(),
		}),
		ManifestState::Value => {
			pairs.push(Pair::new(key.trim(), value.trim()));
			Ok(pairs)
		}
		_ => Ok(pairs),
	}
}
