use std::path::Path;
use std::path::PathBuf;

use crate::Gr8Result;
use crate::props::Pairs;
use crate::props::parse_properties;

/// File name of the property manifest at the template root.
pub const MANIFEST_FILE: &str = "default.properties";

/// Companion file carrying human-readable property descriptions. Never
/// rendered into the output tree.
pub const DESCRIPTIONS_FILE: &str = "default.descriptions";

/// Where the template lives inside a checked-out repository, and whether
/// it carries a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLayout {
	pub root: PathBuf,
	pub has_manifest: bool,
}

impl TemplateLayout {
	/// Detect the template root. A repository with `default.properties` at
	/// the top is its own template; otherwise the conventional
	/// `src/main/g8/` directory is used when it exists (with or without a
	/// manifest). Failing both, the repository root is rendered as-is.
	pub fn detect(checkout: &Path) -> Self {
		if checkout.join(MANIFEST_FILE).is_file() {
			return Self {
				root: checkout.to_path_buf(),
				has_manifest: true,
			};
		}

		let g8 = checkout.join("src").join("main").join("g8");
		if g8.is_dir() {
			let has_manifest = g8.join(MANIFEST_FILE).is_file();
			return Self {
				root: g8,
				has_manifest,
			};
		}

		Self {
			root: checkout.to_path_buf(),
			has_manifest: false,
		}
	}

	/// Read and parse the manifest at this layout's root.
	pub fn load_manifest(&self) -> Gr8Result<Pairs> {
		let text = std::fs::read_to_string(self.root.join(MANIFEST_FILE))?;
		parse_properties(&text)
	}
}
