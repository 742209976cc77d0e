use std::process::ExitCode;

fn main() -> ExitCode {
    htkit_cli::search_entry()
}
