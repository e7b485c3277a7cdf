use std::io;
use std::io::BufRead;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::process::Command;

use clap::CommandFactory;
use clap::Parser;
use clap::error::ErrorKind;
use gr8_cli::Gr8Cli;
use gr8_cli::expand_repository;
use gr8_cli::is_help_request;
use gr8_core::AnyEmptyResult;
use gr8_core::AnyError;
use gr8_core::AnyResult;
use gr8_core::Executor;
use gr8_core::Gr8Error;
use gr8_core::Pair;
use gr8_core::Pairs;
use gr8_core::manifest::TemplateLayout;
use gr8_core::render_directory;
use gr8_core::tokenize;
use owo_colors::OwoColorize;

fn main() {
	// The loose help spellings (`help`, `usage`, `-help`, `/help`, ...)
	// win over normal argument parsing.
	if let Some(first) = std::env::args().nth(1) {
		if is_help_request(&first) {
			let _ = Gr8Cli::command().print_long_help();
			return;
		}
	}

	let args = match Gr8Cli::try_parse() {
		Ok(args) => args,
		Err(err)
			if matches!(
				err.kind(),
				ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
			) =>
		{
			let _ = err.print();
			return;
		}
		Err(err) => {
			let _ = err.print();
			process::exit(1);
		}
	};

	let use_color = std::env::var_os("NO_COLOR").is_none();

	// Install miette's handler so core errors render with their codes and
	// help text.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let Some(repository) = args.repository else {
		let _ = Gr8Cli::command().print_help();
		process::exit(1);
	};

	let Some(target) = args.target else {
		eprintln!("Missing TARGET directory. Run `gr8 --help` for usage.");
		process::exit(1);
	};

	if let Err(err) = run(&repository, &target, &args.overrides) {
		match err.downcast::<Gr8Error>() {
			Ok(core_err) => {
				let report: miette::Report = (*core_err).into();
				eprintln!("{report:?}");
			}
			Err(err) if use_color => eprintln!("{} {err}", "error:".red()),
			Err(err) => eprintln!("error: {err}"),
		}
		process::exit(1);
	}
}

fn run(repository: &str, target: &Path, overrides: &[String]) -> AnyEmptyResult {
	let target = std::path::absolute(target)?;
	let overrides = parse_overrides(overrides)?;

	// A repository naming a local directory is used in place; anything
	// else goes through the external git client.
	let checkout: PathBuf;
	let _workdir;
	if Path::new(repository).is_dir() {
		checkout = PathBuf::from(repository);
		_workdir = None;
	} else {
		let url = expand_repository(repository);
		let dir = tempfile::tempdir()?;
		println!("Cloning {url}...");
		clone(&url, dir.path())?;
		// The template's own history has no business in the output.
		let _ = std::fs::remove_dir_all(dir.path().join(".git"));
		checkout = dir.path().to_path_buf();
		_workdir = Some(dir);
	}

	let layout = TemplateLayout::detect(&checkout);

	let mut props = Pairs::new();
	let default_name = target
		.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_default();
	props.push(Pair::new("name", default_name));

	if layout.has_manifest {
		let defaults = layout.load_manifest()?;
		if overrides.is_empty() {
			collect_interactive(&defaults, &mut props)?;
		} else {
			resolve_defaults(&defaults, &mut props)?;
			props.merge(overrides);
		}
	} else {
		props.merge(overrides);
	}

	println!("Rendering template to {}", target.display());
	render_directory(&props, &layout.root, &target)?;
	Ok(())
}

fn parse_overrides(overrides: &[String]) -> AnyResult<Pairs> {
	let mut pairs = Pairs::new();
	for arg in overrides {
		let Some((key, value)) = arg.split_once('=') else {
			return Err(format!("invalid override `{arg}`: expected key=value").into());
		};
		pairs.set(key, value);
	}
	Ok(pairs)
}

/// Render each manifest default against the properties collected so far
/// and append it, keeping manifest order. Keys that already have a value
/// (the implicit `name`) are left alone.
fn resolve_defaults(defaults: &Pairs, props: &mut Pairs) -> AnyEmptyResult {
	for pair in defaults.iter() {
		if props.find(&pair.key).is_some() {
			continue;
		}
		let rendered = render_value(&pair.value, props)?;
		props.push(Pair::new(pair.key.clone(), rendered));
	}
	Ok(())
}

/// Prompt for every manifest property in order, offering the pre-rendered
/// default. Earlier answers feed into later defaults.
fn collect_interactive(defaults: &Pairs, props: &mut Pairs) -> AnyEmptyResult {
	println!("Preparing template:");
	for pair in defaults.iter() {
		let default = match props.fetch(&pair.key) {
			Some(existing) => existing.to_string(),
			None => render_value(&pair.value, props)?,
		};
		let answer = prompt(&pair.key, &default)?;
		props.set(pair.key.clone(), answer);
	}
	Ok(())
}

fn render_value(value: &str, props: &Pairs) -> AnyResult<String> {
	let ast = tokenize(value)?;
	let rendered = Executor::new(props).exec(&ast)?;
	Ok(rendered)
}

fn prompt(key: &str, default: &str) -> io::Result<String> {
	print!("{key} [{default}]: ");
	io::stdout().flush()?;
	let mut line = String::new();
	io::stdin().lock().read_line(&mut line)?;
	let answer = line.trim();
	if answer.is_empty() {
		Ok(default.to_string())
	} else {
		Ok(answer.to_string())
	}
}

fn clone(url: &str, target: &Path) -> AnyEmptyResult {
	let status = Command::new("git")
		.arg("clone")
		.arg(url)
		.arg(target)
		.status()
		.map_err(|err| -> AnyError {
			if err.kind() == io::ErrorKind::NotFound {
				"could not find `git` on PATH; install it or point gr8 at a local directory"
					.to_string()
					.into()
			} else {
				err.into()
			}
		})?;

	if !status.success() {
		return Err(format!("git clone of `{url}` failed with {status}").into());
	}
	Ok(())
}
