use clap::Parser;
use filesift::cli::{Cli, run};
use filesift::output::OutputFormatter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        OutputFormatter::error(&e);
        std::process::exit(1);
    }
}
