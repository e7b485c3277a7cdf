use rand::Rng;
use rand::RngCore;

/// Number of random letters the `random` formatter appends.
const RANDOM_SUFFIX_LEN: usize = 40;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// One entry of the fixed formatter registry. Every formatter is a pure
/// `string -> string` function except [`GenerateRandom`], which draws from
/// the RNG the executor injects.
///
/// [`GenerateRandom`]: Formatter::GenerateRandom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formatter {
	/// `upper` / `uppercase`
	Uppercase,
	/// `lower` / `lowercase`
	Lowercase,
	/// `cap` / `capitalize` — upper-case the first code point, keep the
	/// rest.
	Capitalize,
	/// `decap` / `decapitalize` — lower-case the first code point, keep
	/// the rest.
	Decapitalize,
	/// `start` / `start-case` — capitalize each single-space-separated
	/// word.
	StartCase,
	/// `word` / `word-only` — strip everything outside `[A-Za-z0-9_]`.
	WordOnly,
	/// `space` / `word-space` — replace everything outside `[A-Za-z0-9]`
	/// with a space.
	WordSpace,
	/// `Camel` / `upper-camel`
	UpperCamel,
	/// `camel` / `lower-camel`
	LowerCamel,
	/// `hyphen` / `hyphenate` — spaces become `-`.
	Hyphenate,
	/// `norm` / `normalize` — hyphenate, then lower-case.
	Normalize,
	/// `snake` / `snake-case` — whitespace and `.` become `_`.
	SnakeCase,
	/// `package` / `package-naming` — spaces become `.`.
	PackageNaming,
	/// `packaged` / `package-dir` — `.` becomes `/`.
	PackageDir,
	/// `random` / `generate-random` — append 40 random letters.
	GenerateRandom,
}

impl Formatter {
	/// Look up a formatter by alias. Aliases are case-sensitive: `Camel`
	/// and `camel` are different formatters.
	pub fn from_alias(alias: &str) -> Option<Self> {
		let formatter = match alias {
			"upper" | "uppercase" => Self::Uppercase,
			"lower" | "lowercase" => Self::Lowercase,
			"cap" | "capitalize" => Self::Capitalize,
			"decap" | "decapitalize" => Self::Decapitalize,
			"start" | "start-case" => Self::StartCase,
			"word" | "word-only" => Self::WordOnly,
			"space" | "word-space" => Self::WordSpace,
			"Camel" | "upper-camel" => Self::UpperCamel,
			"camel" | "lower-camel" => Self::LowerCamel,
			"hyphen" | "hyphenate" => Self::Hyphenate,
			"norm" | "normalize" => Self::Normalize,
			"snake" | "snake-case" => Self::SnakeCase,
			"package" | "package-naming" => Self::PackageNaming,
			"packaged" | "package-dir" => Self::PackageDir,
			"random" | "generate-random" => Self::GenerateRandom,
			_ => return None,
		};
		Some(formatter)
	}

	pub fn apply(&self, val: &str, rng: &mut dyn RngCore) -> String {
		match self {
			Self::Uppercase => val.to_uppercase(),
			Self::Lowercase => val.to_lowercase(),
			Self::Capitalize => capitalize(val),
			Self::Decapitalize => decapitalize(val),
			Self::StartCase => start_case(val),
			Self::WordOnly => word_only(val),
			Self::WordSpace => word_space(val),
			Self::UpperCamel => word_only(&start_case(val)),
			Self::LowerCamel => decapitalize(&word_only(&start_case(val))),
			Self::Hyphenate => hyphenate(val),
			Self::Normalize => hyphenate(val).to_lowercase(),
			Self::SnakeCase => snake_case(val),
			Self::PackageNaming => val.replace(' ', "."),
			Self::PackageDir => val.replace('.', "/"),
			Self::GenerateRandom => generate_random(val, rng),
		}
	}
}

fn capitalize(val: &str) -> String {
	let mut chars = val.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

fn decapitalize(val: &str) -> String {
	let mut chars = val.chars();
	match chars.next() {
		Some(first) => first.to_lowercase().chain(chars).collect(),
		None => String::new(),
	}
}

fn start_case(val: &str) -> String {
	val.split(' ')
		.map(capitalize)
		.collect::<Vec<_>>()
		.join(" ")
}

fn word_only(val: &str) -> String {
	val.chars()
		.filter(|chr| chr.is_ascii_alphanumeric() || *chr == '_')
		.collect()
}

fn word_space(val: &str) -> String {
	val.chars()
		.map(|chr| if chr.is_ascii_alphanumeric() { chr } else { ' ' })
		.collect()
}

fn hyphenate(val: &str) -> String {
	val.replace(' ', "-")
}

fn snake_case(val: &str) -> String {
	val.chars()
		.map(|chr| if chr.is_whitespace() || chr == '.' { '_' } else { chr })
		.collect()
}

fn generate_random(val: &str, rng: &mut dyn RngCore) -> String {
	let mut out = String::with_capacity(val.len() + RANDOM_SUFFIX_LEN);
	out.push_str(val);
	for _ in 0..RANDOM_SUFFIX_LEN {
		out.push(LETTERS[rng.gen_range(0..LETTERS.len())] as char);
	}
	out
}
