use std::path::PathBuf;
use std::sync::LazyLock;

use clap::Parser;
use regex::Regex;

/// Shape of a GitHub `owner/repo` shorthand.
static GITHUB_REPOSITORY: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?i)^[a-z\d](?:[a-z\d]|-[a-z\d]){0,38}/[a-z0-9\-._]+$")
		.expect("static pattern compiles")
});

#[derive(Parser)]
#[command(
	name = "gr8",
	version,
	about = "Render giter8-style project templates.",
	long_about = "gr8 renders giter8-style project templates: it clones a template repository, \
	              reads its default.properties manifest, collects property values, and expands \
	              `$property$` placeholders and `$if(...)$` conditionals in file names and file \
	              contents into a fresh directory.\n\nQuick start:\n  gr8 owner/repo my-project\n  \
	              gr8 owner/repo my-project -- name=widget docker=yes\n\nWhen `key=value` \
	              overrides are given after `--`, gr8 does not prompt; the overrides are merged \
	              over the template's defaults, overwriting existing values."
)]
pub struct Gr8Cli {
	/// Template repository: `owner/repo` for GitHub, a full clone URL, or
	/// a local directory.
	pub repository: Option<String>,

	/// Directory to render the template into. Must not exist yet.
	pub target: Option<PathBuf>,

	/// `key=value` property overrides, given after `--`. Any override
	/// disables interactive prompting.
	#[arg(last = true, value_name = "KEY=VALUE")]
	pub overrides: Vec<String>,
}

/// Recognize the loose help spellings (`help`, `usage`, `-help`, `/help`,
/// ...) accepted in place of a repository argument.
pub fn is_help_request(arg: &str) -> bool {
	let word = arg.trim_start_matches(['-', '/']);
	word.eq_ignore_ascii_case("help") || word.eq_ignore_ascii_case("usage")
}

/// Expand a GitHub `owner/repo` shorthand to a full clone URL; anything
/// else passes through to the VCS client untouched.
pub fn expand_repository(repository: &str) -> String {
	if GITHUB_REPOSITORY.is_match(repository) {
		let suffix = if repository.ends_with(".git") { "" } else { ".git" };
		format!("https://github.com/{repository}{suffix}")
	} else {
		repository.to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn expands_github_shorthand() {
		assert_eq!(
			expand_repository("foo/bar"),
			"https://github.com/foo/bar.git"
		);
		assert_eq!(
			expand_repository("foo/bar.g8"),
			"https://github.com/foo/bar.g8.git"
		);
		assert_eq!(
			expand_repository("foo/bar.git"),
			"https://github.com/foo/bar.git"
		);
	}

	#[test]
	fn passes_urls_through() {
		assert_eq!(
			expand_repository("https://example.com/foo.git"),
			"https://example.com/foo.git"
		);
		assert_eq!(
			expand_repository("git@github.com:foo/bar.git"),
			"git@github.com:foo/bar.git"
		);
		assert_eq!(expand_repository("./local/dir"), "./local/dir");
	}

	#[test]
	fn recognizes_help_spellings() {
		for arg in ["help", "usage", "-help", "--help", "/help", "HELP", "--usage"] {
			assert!(is_help_request(arg), "{arg} should read as help");
		}
		assert!(!is_help_request("foo/help-repo"));
	}
}
