use tracing::error;
use wazzup_podio_cli::{run_cli, CliError};

#[tokio::main]
async fn main() {
    if let Err(e) = run_cli().await {
        error!("CLI error: {}", e);

        let exit_code = match e {
            CliError::InvalidArgument { .. } => 2,
            CliError::Api(_) => 3,
            CliError::CheckFailed { .. } => 4,
            CliError::Output(_) => 5,
        };

        std::process::exit(exit_code);
    }
}
