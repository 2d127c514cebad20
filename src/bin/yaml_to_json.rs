//! yaml-to-json - Convert a YAML data file into a JSON artifact

use std::process::ExitCode;

use build_aux::cli::Output;

fn main() -> ExitCode {
    if let Err(e) = build_aux::cli::convert::run() {
        Output::default().error(&format!("{:#}", e));
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
