use std::collections::BTreeMap;
use std::fmt::Display;

/// An ordered sequence of parsed template nodes.
pub type Ast = Vec<Node>;

/// A parsed template node. The whole language reduces to these three
/// shapes: raw text, a `$name$` substitution with optional `;key="value"`
/// options, and an `$if(property.helper)$ ... $endif$` conditional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
	/// Raw characters emitted verbatim.
	Literal(String),
	/// A `$name$` substitution. The only option the executor recognizes is
	/// `format`, a comma-separated formatter chain; other keys parse but
	/// are ignored.
	Template {
		name: String,
		options: BTreeMap<String, String>,
	},
	/// An `$if(...)$` block with its branches.
	Conditional(Conditional),
}

/// A conditional block. Branch bodies are plain [`Ast`]s, so conditionals
/// nest by containment; nodes carry no parent links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditional {
	pub property: String,
	pub helper: ConditionalHelper,
	pub then: Ast,
	/// `$elseif(...)$` branches in source order. Each carries only a
	/// `then` body of its own.
	pub else_if: Vec<Conditional>,
	/// The `$else$` body, empty when the block has none.
	pub otherwise: Ast,
}

impl Conditional {
	pub fn new(property: impl Into<String>, helper: ConditionalHelper) -> Self {
		Self {
			property: property.into(),
			helper,
			then: Ast::new(),
			else_if: Vec::new(),
			otherwise: Ast::new(),
		}
	}
}

/// The two predicates a conditional expression may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalHelper {
	/// Value case-folds to `yes`, `y`, or `true`.
	Truthy,
	/// Value is non-empty after trimming outer whitespace.
	Present,
}

impl ConditionalHelper {
	/// Helper names match case-insensitively, as the property values do.
	pub fn from_name(name: &str) -> Option<Self> {
		if name.eq_ignore_ascii_case("truthy") {
			Some(Self::Truthy)
		} else if name.eq_ignore_ascii_case("present") {
			Some(Self::Present)
		} else {
			None
		}
	}
}

impl Display for ConditionalHelper {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Truthy => write!(f, "truthy"),
			Self::Present => write!(f, "present"),
		}
	}
}

/// True when the tree contains only literal nodes, which makes execution
/// independent of any property set.
pub fn is_pure_literal(ast: &Ast) -> bool {
	ast.iter().all(|node| matches!(node, Node::Literal(_)))
}

/// Post-parse normalization: drop any `Literal("\n")` sitting between two
/// conditional nodes at the same level, recursively through every branch
/// body. The grammar forces a newline between adjacent conditional blocks;
/// without this pass a false branch followed by another conditional would
/// leak a blank line into the output.
pub fn clean_ast(ast: Ast) -> Ast {
	let dropped: Vec<bool> = (0..ast.len())
		.map(|i| {
			i > 0
				&& i + 1 < ast.len()
				&& matches!(&ast[i], Node::Literal(text) if text == "\n")
				&& matches!(ast[i - 1], Node::Conditional(_))
				&& matches!(ast[i + 1], Node::Conditional(_))
		})
		.collect();

	ast.into_iter()
		.zip(dropped)
		.filter(|(_, drop)| !drop)
		.map(|(node, _)| {
			match node {
				Node::Conditional(cond) => Node::Conditional(clean_conditional(cond)),
				other => other,
			}
		})
		.collect()
}

fn clean_conditional(cond: Conditional) -> Conditional {
	Conditional {
		property: cond.property,
		helper: cond.helper,
		then: clean_ast(cond.then),
		else_if: cond.else_if.into_iter().map(clean_conditional).collect(),
		otherwise: clean_ast(cond.otherwise),
	}
}
