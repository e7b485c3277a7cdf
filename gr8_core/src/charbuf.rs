/// A grow-only code-point accumulator used by the tokenizer to build up
/// lexemes one character at a time. Backs every partial name, option, and
/// literal while the state machine advances, so `delete_last` must be O(1)
/// to support escape handling (`\$` and `\"` pop the consumed backslash).
#[derive(Debug, Default)]
pub struct CharBuffer {
	inner: Vec<char>,
}

impl CharBuffer {
	pub fn new() -> Self {
		Self {
			inner: Vec::with_capacity(64),
		}
	}

	pub fn push(&mut self, chr: char) {
		self.inner.push(chr);
	}

	/// Remove the most recently pushed code point, if any.
	pub fn delete_last(&mut self) {
		let _ = self.inner.pop();
	}

	pub fn len(&self) -> usize {
		self.inner.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	pub fn reset(&mut self) {
		self.inner.clear();
	}

	/// Materialize the accumulated code points as an owned string.
	pub fn as_string(&self) -> String {
		self.inner.iter().collect()
	}
}
