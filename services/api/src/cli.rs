use crate::server;
use clap::{Args, Parser, Subcommand};
use fulfillment_guard::error::AppError;
use fulfillment_guard::orders::{translate_failure, BackendFailure};

#[derive(Parser, Debug)]
#[command(
    name = "Fulfillment Guard",
    about = "Run the order fulfillment guard and trust-tier service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Translate a raw order-store failure into the notice shown to staff
    Translate(TranslateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct TranslateArgs {
    /// Failure message as returned by the order store
    #[arg(long)]
    pub(crate) message: Option<String>,
    /// Secondary detail text, consulted when the message is blank
    #[arg(long)]
    pub(crate) details: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Translate(args) => run_translate(args),
    }
}

fn run_translate(args: TranslateArgs) -> Result<(), AppError> {
    let failure = (args.message.is_some() || args.details.is_some()).then(|| BackendFailure {
        message: args.message,
        details: args.details,
    });
    let notice = translate_failure(failure.as_ref());
    println!("{}", serde_json::to_string_pretty(&notice)?);
    Ok(())
}
