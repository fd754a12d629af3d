use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = corsair::cli::Cli::parse();
    if let Err(e) = corsair::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
