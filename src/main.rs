use std::process::ExitCode;

fn main() -> ExitCode {
    match aovkit::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            aovkit::ui::output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
