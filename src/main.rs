use std::process::ExitCode;

fn main() -> ExitCode {
  seedcheck::run()
}
