use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum Gr8Error {
	#[error(transparent)]
	#[diagnostic(code(gr8::io_error))]
	Io(#[from] std::io::Error),

	#[error("unexpected token `{token}` at line {line} (index {index})")]
	#[diagnostic(code(gr8::unexpected_token))]
	UnexpectedToken {
		index: usize,
		line: usize,
		token: String,
	},

	#[error("unexpected linebreak at line {line} (index {index})")]
	#[diagnostic(
		code(gr8::unexpected_linebreak),
		help("template names and option values must stay on a single line")
	)]
	UnexpectedLinebreak { index: usize, line: usize },

	#[error("unexpected end of input at line {line} (index {index}), tokenizer was reading {state}")]
	#[diagnostic(
		code(gr8::unexpected_end_of_input),
		help("a `$...$` template or option value was left unterminated")
	)]
	UnexpectedEndOfInput {
		index: usize,
		line: usize,
		state: String,
	},

	#[error("unexpected keyword `{keyword}` at line {line} (index {index})")]
	#[diagnostic(
		code(gr8::unexpected_keyword),
		help(
			"`$else$` and `$endif$` are only valid inside an open `$if(...)$` block, and \
			 `$elseif(...)$` cannot follow `$else$`"
		)
	)]
	UnexpectedKeyword {
		index: usize,
		line: usize,
		keyword: String,
	},

	#[error("unsupported conditional helper `{helper}` at line {line} (index {index})")]
	#[diagnostic(
		code(gr8::unsupported_conditional_helper),
		help("supported helpers are `truthy` and `present`")
	)]
	UnsupportedConditionalHelper {
		index: usize,
		line: usize,
		helper: String,
	},

	#[error("invalid conditional expression `{expression}` at line {line} (index {index})")]
	#[diagnostic(
		code(gr8::invalid_conditional_expression),
		help("conditional expressions take the form `property.helper`, e.g. `$if(docker.truthy)$`")
	)]
	InvalidConditionalExpression {
		index: usize,
		line: usize,
		expression: String,
	},

	#[error("property `{0}` is not defined")]
	#[diagnostic(
		code(gr8::undefined_property),
		help("declare the property in default.properties or pass it as a `key=value` override")
	)]
	UndefinedProperty(String),

	#[error("formatter `{0}` does not exist")]
	#[diagnostic(code(gr8::unknown_formatter))]
	UnknownFormatter(String),

	#[error("failed to parse property manifest at index {index}: {cause}")]
	#[diagnostic(
		code(gr8::manifest_parse),
		help("default.properties is line oriented: `key=value` pairs and `#` comments")
	)]
	ManifestParse { index: usize, cause: String },

	#[error("destination `{0}` already exists")]
	#[diagnostic(
		code(gr8::destination_exists),
		help("gr8 never overwrites an existing tree; pick a fresh target path")
	)]
	DestinationExists(String),
}

pub type Gr8Result<T> = Result<T, Gr8Error>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
