use std::collections::BTreeMap;
use std::fmt::Display;

use crate::Gr8Error;
use crate::Gr8Result;
use crate::ast::Ast;
use crate::ast::Conditional;
use crate::ast::ConditionalHelper;
use crate::ast::Node;
use crate::ast::clean_ast;
use crate::charbuf::CharBuffer;
use crate::engine::FORMAT_OPTION;

const DELIM: char = '$';
const ESCAPE: char = '\\';

/// Tokenizer parse states. Conditional branch tracking lives on a
/// separate stack (see [`OpenConditional`]) rather than in this enum, so
/// the machine itself stays a flat set of reading positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
	/// Accumulating raw text outside any `$...$` construct.
	Literal,
	/// Between an opening `$` and whatever ends the name.
	TemplateName,
	/// After `__` inside a name: accumulating a single formatter alias.
	CombinedFormatter,
	/// Inside the parentheses of `$if(...)$` / `$elseif(...)$`.
	ConditionalExpression,
	/// Seen the closing `)`, expecting the closing `$`.
	ConditionalExpressionEnd,
	/// After `;`, accumulating an option key.
	OptionName,
	/// After `=`, skipping whitespace up to the opening quote.
	OptionValueBegin,
	/// Inside a quoted option value.
	OptionValue,
	/// After a closed option value: `,` continues, `$` commits.
	OptionOrEnd,
}

impl Display for State {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Self::Literal => "a literal",
			Self::TemplateName => "a template name",
			Self::CombinedFormatter => "a combined formatter",
			Self::ConditionalExpression => "a conditional expression",
			Self::ConditionalExpressionEnd => "the end of a conditional expression",
			Self::OptionName => "an option name",
			Self::OptionValueBegin => "the start of an option value",
			Self::OptionValue => "an option value",
			Self::OptionOrEnd => "an option separator",
		};
		write!(f, "{name}")
	}
}

/// Which body of an open conditional receives newly committed nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
	Then,
	ElseIf,
	Else,
}

/// An `$if(...)$` block under construction. One stack entry per open
/// conditional; `branch` routes committed nodes into `then`, the latest
/// `else_if` entry, or `otherwise`.
#[derive(Debug)]
struct OpenConditional {
	node: Conditional,
	branch: Branch,
}

/// Which keyword introduced the conditional expression currently being
/// accumulated, decided at the `(` and consumed when the expression ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingConditional {
	If,
	ElseIf,
}

/// A pushdown tokenizer fed one code point at a time via [`feed`], closed
/// with [`finish`]. Most callers go through [`tokenize`].
///
/// [`feed`]: Tokenizer::feed
/// [`finish`]: Tokenizer::finish
pub struct Tokenizer {
	ast: Ast,
	tmp: CharBuffer,
	template_name: CharBuffer,
	option_name: CharBuffer,
	option_value: CharBuffer,
	options: BTreeMap<String, String>,
	state: State,
	stack: Vec<OpenConditional>,
	pending: Option<PendingConditional>,
	last_fed: Option<char>,
	index: usize,
	line: usize,
}

impl Default for Tokenizer {
	fn default() -> Self {
		Self::new()
	}
}

impl Tokenizer {
	pub fn new() -> Self {
		Self {
			ast: Ast::new(),
			tmp: CharBuffer::new(),
			template_name: CharBuffer::new(),
			option_name: CharBuffer::new(),
			option_value: CharBuffer::new(),
			options: BTreeMap::new(),
			state: State::Literal,
			stack: Vec::new(),
			pending: None,
			last_fed: None,
			index: 0,
			line: 1,
		}
	}

	/// Route a finished node into the innermost open conditional's active
	/// branch, or into the top-level tree when no conditional is open.
	fn push_node(&mut self, node: Node) {
		match self.stack.last_mut() {
			Some(open) => {
				match open.branch {
					Branch::Then => open.node.then.push(node),
					Branch::ElseIf => {
						open.node
							.else_if
							.last_mut()
							.expect("an elseif branch exists while ElseIf is active")
							.then
							.push(node);
					}
					Branch::Else => open.node.otherwise.push(node),
				}
			}
			None => self.ast.push(node),
		}
	}

	fn commit_literal(&mut self) {
		if self.tmp.is_empty() {
			return;
		}
		let node = Node::Literal(self.tmp.as_string());
		self.tmp.reset();
		self.push_node(node);
	}

	fn commit_template(&mut self) {
		if self.template_name.is_empty() {
			return;
		}
		let node = Node::Template {
			name: self.template_name.as_string().trim().to_string(),
			options: std::mem::take(&mut self.options),
		};
		self.template_name.reset();
		self.push_node(node);
	}

	fn commit_option(&mut self) {
		if self.option_name.is_empty() {
			return;
		}
		self.options.insert(
			self.option_name.as_string().trim().to_string(),
			self.option_value.as_string(),
		);
		self.option_name.reset();
		self.option_value.reset();
	}

	/// Validate the accumulated `property.helper` expression and open the
	/// conditional it describes: a fresh stack entry for `$if$`, a new
	/// branch on the enclosing conditional for `$elseif$`.
	fn begin_conditional(&mut self) -> Gr8Result<()> {
		let expression = self.template_name.as_string();
		let Some(dot) = expression.find('.') else {
			return Err(Gr8Error::InvalidConditionalExpression {
				index: self.index,
				line: self.line,
				expression,
			});
		};
		let property = &expression[..dot];
		let helper_name = &expression[dot + 1..];
		let Some(helper) = ConditionalHelper::from_name(helper_name) else {
			return Err(Gr8Error::UnsupportedConditionalHelper {
				index: self.index,
				line: self.line,
				helper: helper_name.to_string(),
			});
		};

		let cond = Conditional::new(property, helper);
		match self.pending.take() {
			Some(PendingConditional::ElseIf) => {
				if let Some(open) = self.stack.last_mut() {
					open.node.else_if.push(cond);
					open.branch = Branch::ElseIf;
				}
			}
			_ => {
				self.stack.push(OpenConditional {
					node: cond,
					branch: Branch::Then,
				});
			}
		}
		self.template_name.reset();
		Ok(())
	}

	fn unexpected_token(&self, token: char) -> Gr8Error {
		Gr8Error::UnexpectedToken {
			index: self.index,
			line: self.line,
			token: token.to_string(),
		}
	}

	fn unexpected_keyword(&self, keyword: &str) -> Gr8Error {
		Gr8Error::UnexpectedKeyword {
			index: self.index,
			line: self.line,
			keyword: keyword.to_string(),
		}
	}

	fn unexpected_linebreak(&self) -> Gr8Error {
		Gr8Error::UnexpectedLinebreak {
			index: self.index,
			line: self.line,
		}
	}

	/// Feed a single code point to the machine.
	pub fn feed(&mut self, chr: char) -> Gr8Result<()> {
		let result = self.step(chr);
		self.index += 1;
		if chr == '\n' {
			self.line += 1;
		}
		self.last_fed = Some(chr);
		result
	}

	fn step(&mut self, chr: char) -> Gr8Result<()> {
		match self.state {
			State::Literal => {
				if chr == DELIM && self.last_fed != Some(ESCAPE) {
					self.commit_literal();
					self.state = State::TemplateName;
					return Ok(());
				}
				if chr == DELIM && self.last_fed == Some(ESCAPE) {
					// `\$` collapses to a literal dollar sign.
					self.tmp.delete_last();
				}
				self.tmp.push(chr);
				Ok(())
			}
			State::TemplateName => self.step_template_name(chr),
			State::CombinedFormatter => {
				if chr == DELIM {
					if self.tmp.is_empty() {
						return Err(self.unexpected_token(chr));
					}
					self.options
						.insert(FORMAT_OPTION.to_string(), self.tmp.as_string());
					self.tmp.reset();
					self.commit_template();
					self.state = State::Literal;
					return Ok(());
				}
				self.tmp.push(chr);
				Ok(())
			}
			State::ConditionalExpression => {
				if chr == ')' {
					if self.template_name.is_empty() {
						return Err(self.unexpected_token(chr));
					}
					self.state = State::ConditionalExpressionEnd;
					return Ok(());
				}
				if !chr.is_ascii_alphanumeric() && chr != '.' {
					return Err(self.unexpected_token(chr));
				}
				self.template_name.push(chr);
				Ok(())
			}
			State::ConditionalExpressionEnd => {
				if chr != DELIM {
					return Err(self.unexpected_token(chr));
				}
				self.begin_conditional()?;
				self.state = State::Literal;
				Ok(())
			}
			State::OptionName => {
				if chr == DELIM {
					if self.template_name.is_empty() {
						return Err(self.unexpected_token(chr));
					}
					self.commit_template();
					self.state = State::Literal;
					return Ok(());
				}
				if chr == '=' {
					self.state = State::OptionValueBegin;
					return Ok(());
				}
				self.option_name.push(chr);
				Ok(())
			}
			State::OptionValueBegin => {
				if chr == ' ' || chr == '\t' {
					return Ok(());
				}
				if chr == '"' {
					self.state = State::OptionValue;
					return Ok(());
				}
				Err(self.unexpected_token(chr))
			}
			State::OptionValue => {
				if chr == '\n' {
					return Err(self.unexpected_linebreak());
				}
				if chr == '"' && self.last_fed != Some(ESCAPE) {
					self.commit_option();
					self.state = State::OptionOrEnd;
					return Ok(());
				}
				if chr == '"' && self.last_fed == Some(ESCAPE) {
					// `\"` collapses to a literal quote inside the value.
					self.option_value.delete_last();
				}
				self.option_value.push(chr);
				Ok(())
			}
			State::OptionOrEnd => {
				if chr == ' ' || chr == '\t' {
					return Ok(());
				}
				if chr == ',' {
					self.state = State::OptionName;
					return Ok(());
				}
				if chr == DELIM {
					self.commit_template();
					self.state = State::Literal;
					return Ok(());
				}
				Err(self.unexpected_token(chr))
			}
		}
	}

	fn step_template_name(&mut self, chr: char) -> Gr8Result<()> {
		if chr == DELIM {
			if self.template_name.is_empty() {
				return Err(self.unexpected_token(chr));
			}
			let name = self.template_name.as_string();
			match name.as_str() {
				// `$if$` without an expression is never valid.
				"if" => Err(self.unexpected_keyword(&name)),
				"else" => {
					let Some(open) = self.stack.last_mut() else {
						return Err(self.unexpected_keyword(&name));
					};
					open.branch = Branch::Else;
					self.template_name.reset();
					self.state = State::Literal;
					Ok(())
				}
				"endif" => {
					let Some(open) = self.stack.pop() else {
						return Err(self.unexpected_keyword(&name));
					};
					self.push_node(Node::Conditional(open.node));
					self.template_name.reset();
					self.state = State::Literal;
					Ok(())
				}
				_ => {
					self.commit_template();
					self.state = State::Literal;
					Ok(())
				}
			}
		} else if chr == ' ' {
			Err(self.unexpected_token(chr))
		} else if chr == ';' {
			self.state = State::OptionName;
			Ok(())
		} else if chr == '\n' {
			Err(self.unexpected_linebreak())
		} else if chr == '(' {
			let name = self.template_name.as_string();
			match name.as_str() {
				"if" => {
					self.pending = Some(PendingConditional::If);
				}
				"elseif" => {
					// `elseif` outside a conditional, or after `$else$`,
					// is out of order.
					let in_order = self
						.stack
						.last()
						.is_some_and(|open| open.branch != Branch::Else);
					if !in_order {
						return Err(self.unexpected_keyword("elseif"));
					}
					self.pending = Some(PendingConditional::ElseIf);
				}
				_ => return Err(self.unexpected_token(chr)),
			}
			self.template_name.reset();
			self.state = State::ConditionalExpression;
			Ok(())
		} else if self.template_name.is_empty() && !chr.is_ascii_alphabetic() {
			// Names must start with a letter.
			Err(self.unexpected_token(chr))
		} else if chr == '_' && self.last_fed == Some('_') {
			// `__` switches to the combined-formatter shorthand; the first
			// underscore does not belong to the name.
			self.template_name.delete_last();
			self.tmp.reset();
			self.state = State::CombinedFormatter;
			Ok(())
		} else if !chr.is_ascii_alphanumeric() && chr != '_' && chr != '-' {
			Err(self.unexpected_token(chr))
		} else {
			self.template_name.push(chr);
			Ok(())
		}
	}

	/// Close the parse. End of input is only legal while reading a
	/// literal; conditionals still open at that point are committed
	/// outward in nesting order.
	pub fn finish(mut self) -> Gr8Result<Ast> {
		if self.state != State::Literal {
			return Err(Gr8Error::UnexpectedEndOfInput {
				index: self.index,
				line: self.line,
				state: self.state.to_string(),
			});
		}
		self.commit_literal();
		while let Some(open) = self.stack.pop() {
			self.push_node(Node::Conditional(open.node));
		}
		Ok(clean_ast(self.ast))
	}
}

/// Tokenize a complete input string into an [`Ast`].
pub fn tokenize(input: &str) -> Gr8Result<Ast> {
	let mut tokenizer = Tokenizer::new();
	for chr in input.chars() {
		tokenizer.feed(chr)?;
	}
	tokenizer.finish()
}
