//! Goca CLI application entry point.
//!
//! All dispatch lives in the library; this binary maps errors to the
//! documented exit codes (1 configuration, 2 arguments, 3 file I/O).

use std::process::ExitCode;

fn main() -> ExitCode {
    match goca::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", goca::core::tui::error_line(&err.to_string()));
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
