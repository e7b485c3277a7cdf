mod common;

use std::fs;
use std::path::Path;

use gr8_core::AnyEmptyResult;

fn write_file(path: &Path, contents: &str) -> AnyEmptyResult {
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent)?;
	}
	fs::write(path, contents)?;
	Ok(())
}

#[test]
fn renders_local_template_with_overrides() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("template");
	let dest = tmp.path().join("out");

	write_file(
		&source.join("default.properties"),
		"name=placeholder\ngreeting=Hello\n",
	)?;
	write_file(&source.join("main.txt"), "$greeting$, $name$!\n")?;
	write_file(&source.join("$name$.md"), "# $name$\n")?;

	common::gr8_cmd()
		.arg(&source)
		.arg(&dest)
		.arg("--")
		.arg("name=widget")
		.arg("greeting=Hi")
		.assert()
		.success()
		.stdout(predicates::str::contains("Rendering template"));

	assert_eq!(fs::read_to_string(dest.join("main.txt"))?, "Hi, widget!\n");
	assert_eq!(fs::read_to_string(dest.join("widget.md"))?, "# widget\n");
	assert!(!dest.join("default.properties").exists());

	Ok(())
}

#[test]
fn target_basename_becomes_default_name() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("template");
	let dest = tmp.path().join("shiny-app");

	write_file(&source.join("default.properties"), "flavor=vanilla\n")?;
	write_file(&source.join("about.txt"), "$name$ ($flavor$)\n")?;

	common::gr8_cmd()
		.arg(&source)
		.arg(&dest)
		.arg("--")
		.arg("flavor=mint")
		.assert()
		.success();

	assert_eq!(
		fs::read_to_string(dest.join("about.txt"))?,
		"shiny-app (mint)\n"
	);

	Ok(())
}

#[test]
fn prompts_fall_back_to_defaults_on_empty_input() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("template");
	let dest = tmp.path().join("out");

	write_file(
		&source.join("default.properties"),
		"greeting=Hello\nshout=$greeting;format=\"upper\"$\n",
	)?;
	write_file(&source.join("main.txt"), "$greeting$ / $shout$\n")?;

	// Two empty answers accept both rendered defaults; the second default
	// is computed from the first answer.
	common::gr8_cmd()
		.arg(&source)
		.arg(&dest)
		.write_stdin("\n\n")
		.assert()
		.success()
		.stdout(predicates::str::contains("Preparing template:"));

	assert_eq!(
		fs::read_to_string(dest.join("main.txt"))?,
		"Hello / HELLO\n"
	);

	Ok(())
}

#[test]
fn conditional_blocks_follow_overrides() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("template");

	write_file(&source.join("default.properties"), "docker=no\n")?;
	write_file(
		&source.join("Dockerfile"),
		"$if(docker.truthy)$FROM scratch\n$endif$",
	)?;

	let with_docker = tmp.path().join("with-docker");
	common::gr8_cmd()
		.arg(&source)
		.arg(&with_docker)
		.arg("--")
		.arg("docker=yes")
		.assert()
		.success();
	assert_eq!(
		fs::read_to_string(with_docker.join("Dockerfile"))?,
		"FROM scratch\n"
	);

	let without_docker = tmp.path().join("without-docker");
	common::gr8_cmd()
		.arg(&source)
		.arg(&without_docker)
		.arg("--")
		.arg("docker=no")
		.assert()
		.success();
	assert_eq!(fs::read_to_string(without_docker.join("Dockerfile"))?, "");

	Ok(())
}

#[test]
fn fails_when_destination_exists() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("template");
	let dest = tmp.path().join("out");

	write_file(&source.join("a.txt"), "a")?;
	fs::create_dir_all(&dest)?;

	common::gr8_cmd()
		.arg(&source)
		.arg(&dest)
		.arg("--")
		.arg("name=x")
		.assert()
		.failure()
		.code(1)
		.stderr(predicates::str::contains("already exists"));

	Ok(())
}

#[test]
fn fails_on_undefined_property_in_template() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("template");
	let dest = tmp.path().join("out");

	write_file(&source.join("default.properties"), "known=x\n")?;
	write_file(&source.join("broken.txt"), "$unknownProperty$")?;

	common::gr8_cmd()
		.arg(&source)
		.arg(&dest)
		.arg("--")
		.arg("known=y")
		.assert()
		.failure()
		.code(1)
		.stderr(predicates::str::contains("unknownProperty"));

	Ok(())
}

#[test]
fn fails_on_malformed_override() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("template");
	write_file(&source.join("a.txt"), "a")?;

	common::gr8_cmd()
		.arg(&source)
		.arg(tmp.path().join("out"))
		.arg("--")
		.arg("not-a-pair")
		.assert()
		.failure()
		.code(1)
		.stderr(predicates::str::contains("key=value"));

	Ok(())
}

#[test]
fn help_spellings_print_usage() {
	for spelling in ["help", "usage", "-help", "/help"] {
		common::gr8_cmd()
			.arg(spelling)
			.assert()
			.success()
			.stdout(predicates::str::contains("gr8"));
	}
}

#[test]
fn missing_arguments_exit_with_failure() {
	common::gr8_cmd().assert().failure().code(1);

	common::gr8_cmd()
		.arg("only-repository")
		.assert()
		.failure()
		.code(1)
		.stderr(predicates::str::contains("TARGET"));
}
