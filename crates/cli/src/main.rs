use std::process::ExitCode;

fn main() -> ExitCode {
    sayara_cli::run()
}
