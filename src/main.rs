use clap::Parser;
use storefront::cli::{Args, build_session, init_logging, open_database, run, validate_api_url};
use tracing::error;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(&args.log_format);

    let Some(api_url) = validate_api_url(&args.api_url) else {
        std::process::exit(1);
    };

    let Some(db) = open_database(&args.database).await else {
        std::process::exit(1);
    };

    let session = build_session(&db, api_url);

    if let Err(e) = run(&session, args.command).await {
        error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}
