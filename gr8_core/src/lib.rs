//! `gr8_core` is the template pipeline behind the `gr8` project
//! scaffolder, a giter8-style template expander. Template trees
//! carry `$property$` substitutions and `$if(property.helper)$`
//! conditionals in both file names and file contents; this crate turns
//! them into rendered output.
//!
//! ## Processing pipeline
//!
//! ```text
//! Raw text
//!   → Tokenizer (pushdown machine fed one code point at a time)
//!   → Ast (literal / template / conditional nodes)
//!   → Executor (property lookups, formatter chains, conditionals)
//!   → String
//! ```
//!
//! For a whole directory tree, [`render_directory`] walks the source,
//! runs each path segment through the same pipeline, and decides per file
//! whether to expand it, copy it verbatim (the `verbatim` property's
//! globs), or copy it because it is not text.
//!
//! ## Key types
//!
//! - [`Node`] / [`Ast`] — the parsed template tree.
//! - [`Tokenizer`] / [`tokenize`] — the state machine producing it.
//! - [`Executor`] — renders an [`Ast`] against a [`Pairs`] property set.
//! - [`Formatter`] — the fixed registry behind `format="..."` chains.
//! - [`TemplateLayout`] — locates the template root and its manifest.
//!
//! ## Quick start
//!
//! ```rust
//! use gr8_core::Executor;
//! use gr8_core::Pairs;
//! use gr8_core::tokenize;
//!
//! let props: Pairs = [("name", "My Project")].into_iter().collect();
//! let ast = tokenize("Welcome to $name;format=\"normalize\"$!").unwrap();
//! let out = Executor::new(&props).exec(&ast).unwrap();
//! assert_eq!(out, "Welcome to my-project!");
//! ```

pub use ast::*;
pub use charbuf::*;
pub use engine::*;
pub use error::*;
pub use format::*;
pub use lexer::*;
pub use manifest::*;
pub use props::*;
pub use render::*;

mod ast;
mod charbuf;
mod engine;
mod error;
mod format;
mod lexer;
pub mod manifest;
mod props;
mod render;
pub mod sglob;
