use std::fs;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use regex::Regex;

use crate::Gr8Error;
use crate::Gr8Result;
use crate::ast::Ast;
use crate::engine::Executor;
use crate::lexer::tokenize;
use crate::manifest::DESCRIPTIONS_FILE;
use crate::manifest::MANIFEST_FILE;
use crate::props::Pairs;
use crate::sglob;

/// The property whose space-separated globs mark files to copy verbatim.
pub const VERBATIM_PROPERTY: &str = "verbatim";

/// Bytes sniffed from the head of a file to classify it as text.
const SNIFF_LEN: usize = 1024;

/// One entry of the source walk: its path, kind, and the parsed AST of
/// each path segment below the template root.
#[derive(Debug)]
pub struct TreeItem {
	pub source: PathBuf,
	pub is_dir: bool,
	pub segments: Vec<Ast>,
}

/// Walk a template root depth-first in lexical order (directories before
/// their contents) and parse every path segment. The root itself and the
/// root-level manifest files are not part of the result.
pub fn scan_tree(source: &Path) -> Gr8Result<Vec<TreeItem>> {
	let mut items = Vec::new();
	walk(source, source, &mut items)?;
	Ok(items)
}

fn walk(root: &Path, dir: &Path, items: &mut Vec<TreeItem>) -> Gr8Result<()> {
	let mut entries = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
	entries.sort_by_key(|entry| entry.file_name());

	for entry in entries {
		let path = entry.path();
		if dir == root {
			let name = entry.file_name();
			if name == MANIFEST_FILE || name == DESCRIPTIONS_FILE {
				continue;
			}
		}

		let is_dir = entry.file_type()?.is_dir();
		items.push(TreeItem {
			segments: parse_segments(root, &path)?,
			source: path.clone(),
			is_dir,
		});

		if is_dir {
			walk(root, &path, items)?;
		}
	}

	Ok(())
}

fn parse_segments(root: &Path, path: &Path) -> Gr8Result<Vec<Ast>> {
	let relative = path.strip_prefix(root).unwrap_or(path);
	relative
		.iter()
		.map(|segment| tokenize(&segment.to_string_lossy()))
		.collect()
}

/// Render a template tree into `destination` using `props` as variables.
/// The destination must not exist. Rendering aborts on the first failure,
/// leaving any partial output in place.
pub fn render_directory(props: &Pairs, source: &Path, destination: &Path) -> Gr8Result<()> {
	let items = scan_tree(source)?;

	if destination.symlink_metadata().is_ok() {
		return Err(Gr8Error::DestinationExists(
			destination.display().to_string(),
		));
	}
	fs::create_dir_all(destination)?;

	let mut exec = Executor::new(props);
	let patterns = verbatim_patterns(props);

	for item in &items {
		let Some(rendered_path) = render_target_path(&mut exec, item)? else {
			continue;
		};
		let target = destination.join(rendered_path);

		if item.is_dir {
			fs::create_dir_all(&target)?;
			continue;
		}

		let source_path = item.source.to_string_lossy();
		if sglob::is_verbatim(&source_path, &patterns) || !is_text_file(&item.source) {
			copy_file(&item.source, &target)?;
			continue;
		}

		let metadata = fs::metadata(&item.source)?;
		let contents = fs::read_to_string(&item.source)?;
		let ast = tokenize(&contents)?;
		let rendered = exec.exec(&ast)?;
		fs::write(&target, rendered)?;
		fs::set_permissions(&target, metadata.permissions())?;
	}

	Ok(())
}

/// Compile the `verbatim` property into matchers. Patterns that fail to
/// compile are discarded.
fn verbatim_patterns(props: &Pairs) -> Vec<Regex> {
	let Some(value) = props.fetch(VERBATIM_PROPERTY) else {
		return Vec::new();
	};
	value.split(' ').filter_map(sglob::compile).collect()
}

/// Execute every segment of the item's path. An empty rendering for any
/// single segment invalidates the whole entry, so nothing is emitted for
/// it (or, transitively, for anything beneath it).
fn render_target_path(exec: &mut Executor<'_>, item: &TreeItem) -> Gr8Result<Option<PathBuf>> {
	let mut path = PathBuf::new();
	for ast in &item.segments {
		let segment = exec.exec(ast)?;
		if segment.is_empty() {
			return Ok(None);
		}
		path.push(segment);
	}
	Ok(Some(path))
}

fn copy_file(src: &Path, dst: &Path) -> Gr8Result<()> {
	let metadata = fs::metadata(src)?;
	if !metadata.is_file() {
		return Err(Gr8Error::Io(std::io::Error::new(
			std::io::ErrorKind::InvalidInput,
			format!("{} is not a regular file", src.display()),
		)));
	}
	fs::copy(src, dst)?;
	fs::set_permissions(dst, metadata.permissions())?;
	Ok(())
}

/// Sniff the head of a file. Anything that fails to open or read is
/// treated as non-text and copied instead of expanded.
fn is_text_file(path: &Path) -> bool {
	let Ok(mut file) = fs::File::open(path) else {
		return false;
	};
	let mut buf = [0u8; SNIFF_LEN];
	let Ok(n) = file.read(&mut buf) else {
		return false;
	};
	is_text(&buf[..n])
}

/// A buffer is text when its UTF-8 decode produces no replacement
/// characters and no control bytes other than `\n`, `\t`, and form feed.
/// The last code point may be cut off mid-sequence and is ignored.
pub(crate) fn is_text(buf: &[u8]) -> bool {
	let sample = &buf[..buf.len().min(SNIFF_LEN)];
	let decoded = String::from_utf8_lossy(sample);
	let mut offset = 0;

	for chr in decoded.chars() {
		if offset + 4 > sample.len() {
			break;
		}
		if chr == '\u{FFFD}' || (chr < ' ' && chr != '\n' && chr != '\t' && chr != '\u{0c}') {
			return false;
		}
		offset += chr.len_utf8();
	}

	true
}
