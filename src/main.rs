use anyhow::Result;
use clap::Parser;
use invoice_desk::{
    commands::{self, config::Config},
    error::CallError,
    http::{BASE_DELAY_MS, HttpClient, MAX_ATTEMPTS, RetryPolicy, TokioSleeper},
    invoice::Invoice,
    remote::{APPS_SCRIPT_PREFIX, ConsoleSink, EndpointConfig, PLACEHOLDER_ENDPOINT, RemoteCall},
};
use log::debug;
use std::path::PathBuf;
use std::time::Duration;

/// invoice-desk - Invoice entry backed by a Google Sheet
///
/// Submits invoices to, and looks them up from, a Google Apps Script web app
/// that stores one row per invoice. Failed requests are retried with
/// exponential backoff.
///
/// Examples:
///   invoice-desk new-id
///   invoice-desk submit --customer-name "Ada" --total 12.50 --items "2x widget"
///   invoice-desk search INV-1718000000000
#[derive(Parser, Debug)]
#[command(author, version = env!("INVOICE_DESK_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(clap::Args, Debug)]
struct GlobalArgs {
    /// Apps Script web app URL (also via INVOICE_DESK_ENDPOINT)
    #[arg(
        long,
        env = "INVOICE_DESK_ENDPOINT",
        value_name = "URL",
        default_value = PLACEHOLDER_ENDPOINT,
        global = true
    )]
    endpoint: String,

    /// Required prefix of the endpoint URL
    #[arg(
        long = "allowed-prefix",
        env = "INVOICE_DESK_ALLOWED_PREFIX",
        value_name = "URL",
        default_value = APPS_SCRIPT_PREFIX,
        global = true
    )]
    allowed_prefix: String,

    /// Attempts per request before giving up
    #[arg(
        long = "max-attempts",
        value_name = "N",
        default_value_t = MAX_ATTEMPTS as u64,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    max_attempts: u64,

    /// Backoff unit; the wait after attempt n is 2^n times this
    #[arg(
        long = "base-delay-ms",
        value_name = "MS",
        default_value_t = BASE_DELAY_MS,
        global = true
    )]
    base_delay_ms: u64,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    timeout: Option<u64>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print a fresh invoice ID
    NewId,

    /// Save an invoice to the sheet
    Submit(SubmitArgs),

    /// Look up an invoice by ID
    Search(SearchArgs),

    /// Render the print view of an invoice
    Print(PrintArgs),
}

#[derive(clap::Args, Debug)]
struct InvoiceArgs {
    /// Invoice ID (generated from the current time when omitted)
    #[arg(long = "invoice-id", value_name = "ID")]
    invoice_id: Option<String>,

    #[arg(long = "customer-name", value_name = "NAME", default_value = "")]
    customer_name: String,

    #[arg(long = "customer-address", value_name = "ADDRESS", default_value = "")]
    customer_address: String,

    /// Customer phone number
    #[arg(long = "customer-number", value_name = "PHONE", default_value = "")]
    customer_number: String,

    /// Total amount, e.g. 12.50
    #[arg(long = "total", value_name = "AMOUNT", default_value = "")]
    total_amount: String,

    /// Order items as free text
    #[arg(long = "items", value_name = "TEXT", default_value = "")]
    order_items: String,
}

impl InvoiceArgs {
    fn into_invoice(self) -> Invoice {
        let base = match self.invoice_id {
            Some(id) => Invoice {
                invoice_id: id,
                ..Default::default()
            },
            None => Invoice::with_new_id(),
        };
        Invoice {
            customer_name: self.customer_name,
            customer_address: self.customer_address,
            customer_number: self.customer_number,
            total_amount: self.total_amount,
            order_items: self.order_items,
            ..base
        }
    }
}

#[derive(clap::Args, Debug)]
struct SubmitArgs {
    #[command(flatten)]
    invoice: InvoiceArgs,
}

#[derive(clap::Args, Debug)]
struct SearchArgs {
    /// The invoice ID to look up, e.g. INV-1718000000000
    #[arg(value_name = "INVOICE_ID")]
    invoice_id: String,
}

#[derive(clap::Args, Debug)]
struct PrintArgs {
    #[command(flatten)]
    invoice: InvoiceArgs,

    /// Write to this file instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,
}

fn remote_call(args: &GlobalArgs) -> Result<RemoteCall<HttpClient, TokioSleeper>> {
    let endpoint =
        EndpointConfig::new(args.endpoint.clone()).with_allowed_prefix(args.allowed_prefix.clone());
    let policy = RetryPolicy::new(
        args.max_attempts as usize,
        Duration::from_millis(args.base_delay_ms),
    );
    let config = Config::new(endpoint, policy, args.timeout.map(Duration::from_secs))?;
    Ok(config.into_remote_call())
}

async fn run(cli: Cli) -> Result<()> {
    let sink = ConsoleSink;

    match cli.command {
        Commands::NewId => commands::new_id(),
        Commands::Submit(args) => {
            let call = remote_call(&cli.global)?;
            commands::submit(&call, args.invoice.into_invoice(), &sink).await?
        }
        Commands::Search(args) => {
            let call = remote_call(&cli.global)?;
            commands::search(&call, &args.invoice_id, &sink).await?
        }
        Commands::Print(args) => {
            commands::print(&args.invoice.into_invoice(), args.output.as_deref())?
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(cli).await {
        // Already reported to the user through the status sink
        Err(e) if e.downcast_ref::<CallError>().is_some() => {
            debug!("{:#}", e);
            std::process::exit(1);
        }
        other => other,
    }
}
