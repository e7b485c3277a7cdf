use assert_cmd::Command;

pub fn gr8_cmd() -> Command {
	Command::cargo_bin("gr8").expect("gr8 binary should build")
}
