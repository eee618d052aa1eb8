use robofinder::commands::{command_argument_builder, normalize_args};
use robofinder::handlers::handle_scan;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let matches = command_argument_builder().get_matches_from(normalize_args(std::env::args_os()));
    ExitCode::from(handle_scan(&matches).await)
}
