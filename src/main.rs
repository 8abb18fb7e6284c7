use std::process::ExitCode;

fn main() -> ExitCode {
    match script_utils::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
