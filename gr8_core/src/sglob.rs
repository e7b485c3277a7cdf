//! A small gitignore-flavored glob compiler.
//!
//! Patterns from the `verbatim` property are rewritten into anchored
//! regular expressions. Unlike gitignore proper, a slash-bearing pattern
//! like `test/foo/bar.c` still floats to any position in the path, and a
//! match extends over everything beneath a matched directory.

use std::sync::LazyLock;

use regex::Regex;

/// Stand-in for a literal `*` while the wildcard rewrites run.
const MAGIC_STAR: &str = "#$~";

/// A pattern shaped like `dir/…*.ext` without a leading slash gets one
/// prepended so the extension wildcard stays anchored to that directory.
static BEGIN_PATTERN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[^/+]/.*\*\.").expect("static pattern compiles"));

/// Compile one glob line into a matcher. Empty lines yield `None`, as do
/// the rare rewrites that produce an uncompilable expression — those are
/// discarded rather than failing the render.
pub fn compile(line: &str) -> Option<Regex> {
	let trimmed = line.trim_end_matches('\r').trim();
	if trimmed.is_empty() {
		return None;
	}

	let mut pattern = trimmed.to_string();
	if BEGIN_PATTERN.is_match(&pattern) && !pattern.starts_with('/') {
		pattern.insert(0, '/');
	}
	pattern = pattern.replace('.', r"\.");
	if pattern.starts_with("/**/") {
		pattern.remove(0);
	}

	// Wildcard rewrites, in this order. The placeholder keeps literal
	// stars produced by earlier rules out of the bare-star rule.
	pattern = pattern.replace("/**/", "(/|/.+/)");
	pattern = pattern.replace("**/", &format!("(|.{MAGIC_STAR}/)"));
	pattern = pattern.replace("/**", &format!("(|/.{MAGIC_STAR})"));
	pattern = pattern.replace(r"\*", &format!(r"\{MAGIC_STAR}"));
	pattern = pattern.replace('*', "([^/]*)");
	pattern = pattern.replace('?', r"\?");
	pattern = pattern.replace(MAGIC_STAR, "*");

	// Directory patterns swallow any suffix; file patterns also match as
	// a directory prefix.
	let expr = if pattern.ends_with('/') {
		format!("{pattern}(|.*)$")
	} else {
		format!("{pattern}(|/.*)$")
	};
	// Rooted patterns anchor to the start (with or without the leading
	// slash); others may sit below any directory.
	let expr = match expr.strip_prefix('/') {
		Some(rest) => format!("^(|/){rest}"),
		None => format!("^(|.*/){expr}"),
	};

	Regex::new(&expr).ok()
}

/// True when the source path matches any of the compiled patterns.
pub fn is_verbatim(source: &str, patterns: &[Regex]) -> bool {
	patterns.iter().any(|pattern| pattern.is_match(source))
}
