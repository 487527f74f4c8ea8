use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    permia_cli::run().await
}
