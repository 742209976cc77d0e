use std::process::ExitCode;

fn main() -> ExitCode {
    htkit_cli::help_entry()
}
