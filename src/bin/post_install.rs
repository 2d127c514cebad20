//! post-install - Refresh desktop caches after installation

use std::process::ExitCode;

use build_aux::cli::Output;

fn main() -> ExitCode {
    if let Err(e) = build_aux::cli::install::run() {
        Output::default().error(&format!("{:#}", e));
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
