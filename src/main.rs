use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let guard = coaching_backend::init_logging();

    match coaching_backend::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Fatal startup error");
            // Flush the file appender before exiting.
            drop(guard);
            ExitCode::FAILURE
        }
    }
}
