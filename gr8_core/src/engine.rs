use std::collections::BTreeMap;

use rand::RngCore;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::Gr8Error;
use crate::Gr8Result;
use crate::ast::Ast;
use crate::ast::Conditional;
use crate::ast::ConditionalHelper;
use crate::ast::Node;
use crate::format::Formatter;
use crate::props::Pairs;

/// The one template option the executor acts on.
pub const FORMAT_OPTION: &str = "format";

/// Walks an [`Ast`] against a property set, resolving substitutions,
/// applying formatter chains, and evaluating conditionals into a string.
///
/// The RNG feeding the `random` formatter is owned by the executor so
/// embedders and tests can inject a seeded one via [`with_rng`].
///
/// [`with_rng`]: Executor::with_rng
pub struct Executor<'p> {
	props: &'p Pairs,
	rng: Box<dyn RngCore>,
}

impl<'p> Executor<'p> {
	pub fn new(props: &'p Pairs) -> Self {
		Self {
			props,
			rng: Box::new(StdRng::from_entropy()),
		}
	}

	/// An executor with a caller-supplied RNG, for deterministic output.
	pub fn with_rng(props: &'p Pairs, rng: impl RngCore + 'static) -> Self {
		Self {
			props,
			rng: Box::new(rng),
		}
	}

	/// Render the tree into a string, or fail on the first undefined
	/// property or unknown formatter.
	pub fn exec(&mut self, ast: &Ast) -> Gr8Result<String> {
		let mut out = String::new();
		self.exec_into(ast, &mut out)?;
		Ok(out)
	}

	fn exec_into(&mut self, ast: &Ast, out: &mut String) -> Gr8Result<()> {
		for node in ast {
			match node {
				Node::Literal(text) => out.push_str(text),
				Node::Template { name, options } => {
					let value = self.resolve(name, options)?;
					out.push_str(&value);
				}
				Node::Conditional(cond) => self.exec_conditional(cond, out)?,
			}
		}
		Ok(())
	}

	fn resolve(&mut self, name: &str, options: &BTreeMap<String, String>) -> Gr8Result<String> {
		let props = self.props;
		let Some(value) = props.fetch(name) else {
			return Err(Gr8Error::UndefinedProperty(name.to_string()));
		};
		let mut value = value.to_string();

		if let Some(chain) = options.get(FORMAT_OPTION) {
			for alias in chain.split(',') {
				let alias = alias.trim();
				if alias.is_empty() {
					continue;
				}
				let Some(formatter) = Formatter::from_alias(alias) else {
					return Err(Gr8Error::UnknownFormatter(alias.to_string()));
				};
				value = formatter.apply(&value, self.rng.as_mut());
			}
		}

		Ok(value)
	}

	/// A conditional predicate over the property set. Missing properties
	/// are simply false.
	fn predicate(&self, property: &str, helper: ConditionalHelper) -> bool {
		match self.props.find(property) {
			Some(pair) => {
				match helper {
					ConditionalHelper::Truthy => pair.truthy(),
					ConditionalHelper::Present => pair.present(),
				}
			}
			None => false,
		}
	}

	fn exec_conditional(&mut self, cond: &Conditional, out: &mut String) -> Gr8Result<()> {
		if self.predicate(&cond.property, cond.helper) {
			return self.exec_into(&cond.then, out);
		}
		for branch in &cond.else_if {
			if self.predicate(&branch.property, branch.helper) {
				return self.exec_into(&branch.then, out);
			}
		}
		self.exec_into(&cond.otherwise, out)
	}
}
