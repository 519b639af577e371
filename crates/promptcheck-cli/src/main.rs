use clap::Parser;

mod cli;
pub mod exit_codes;

use cli::args::Cli;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    // Optional .env; must load before parsing so env-backed flag defaults apply.
    dotenvy::dotenv().ok();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();
    let cli = Cli::parse();
    let code = match cli::commands::run::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("fatal: {e:#}");
            exit_codes::for_error(&e)
        }
    };
    std::process::exit(code);
}
