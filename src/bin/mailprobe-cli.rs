use anyhow::Result;
use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use mailprobe::{ProbeOptions, VerificationResult, verify_with_options};

/// Checks whether an email address is plausibly deliverable without sending
/// a message: syntax, MX routing, then a live SMTP mailbox probe.
#[derive(Parser)]
#[command(name = "mailprobe-cli")]
struct Cli {
    /// address to verify
    email: String,

    /// output format (human|json)
    #[arg(long, default_value = "human")]
    format: String,

    /// name announced in the EHLO greeting
    #[arg(long)]
    helo: Option<String>,

    /// envelope MAIL FROM sender
    #[arg(long = "from")]
    mail_from: Option<String>,

    /// SMTP port on the exchange host
    #[arg(long, default_value_t = 25)]
    port: u16,

    /// hard session deadline in milliseconds
    #[arg(long = "timeout-ms", default_value_t = 1_000)]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut options = ProbeOptions {
        port: cli.port,
        timeout_ms: cli.timeout_ms,
        ..ProbeOptions::default()
    };
    if let Some(helo) = cli.helo {
        options.helo_name = helo;
    }
    if let Some(mail_from) = cli.mail_from {
        options.mail_from = mail_from;
    }

    let result = verify_with_options(&cli.email, &options).await;

    match cli.format.as_str() {
        "json" => {
            let report = json!({ "status": result, "message": result.message() });
            println!("{}", serde_json::to_string(&report)?);
        }
        _ => println!("{}", result.message()),
    }

    std::process::exit(exit_code(result))
}

fn exit_code(result: VerificationResult) -> i32 {
    match result {
        VerificationResult::MailboxExists => 0,
        VerificationResult::InvalidSyntax | VerificationResult::NoMailRoute => 1,
        VerificationResult::MailboxDoesNotExist => 2,
    }
}
