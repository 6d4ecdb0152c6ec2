use std::process::ExitCode;

fn main() -> ExitCode {
    leetdraw_cli::run()
}
