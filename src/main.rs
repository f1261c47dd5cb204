use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    portfolio_return::cli::run(std::env::args().collect()).await
}
