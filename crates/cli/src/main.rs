use std::process::ExitCode;

fn main() -> ExitCode {
    barberbook_cli::run()
}
