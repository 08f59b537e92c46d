use liqpay::{ClientConfig, LiqPayClient, LiqPayError, OrderStatus};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: liqpay <command>

commands:
  status <order_id>            look up an order
  offset-status <offset_id>    look up an offset
  info-merchant                show merchant balance information
  sign <json>                  sign a raw JSON payload (offline)
  decode <data> <signature>    verify and print a callback payload (offline)

environment:
  LIQPAY_PUBLIC_KEY, LIQPAY_PRIVATE_KEY, LIQPAY_API_URL, LIQPAY_TIMEOUT_SECS";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Status(String),
    OffsetStatus(String),
    InfoMerchant,
    Sign(String),
    Decode { data: String, signature: String },
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        ["status", order_id] => Ok(Command::Status(order_id.to_string())),
        ["offset-status", offset_id] => Ok(Command::OffsetStatus(offset_id.to_string())),
        ["info-merchant"] => Ok(Command::InfoMerchant),
        ["sign", json] => Ok(Command::Sign(json.to_string())),
        ["decode", data, signature] => Ok(Command::Decode {
            data: data.to_string(),
            signature: signature.to_string(),
        }),
        [] => Err("missing command".to_string()),
        [other, ..] => Err(format!("unknown command or wrong arguments: {other}")),
    }
}

/// Offline commands only need the private key.
fn private_key() -> Result<Vec<u8>, LiqPayError> {
    std::env::var("LIQPAY_PRIVATE_KEY")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(String::into_bytes)
        .ok_or_else(|| LiqPayError::Config("LIQPAY_PRIVATE_KEY is required".into()))
}

fn print_json(value: &impl serde::Serialize) -> Result<(), LiqPayError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(command: Command) -> Result<(), LiqPayError> {
    match command {
        Command::Sign(json) => {
            let payload: Value = serde_json::from_str(&json)?;
            let envelope = liqpay::sign(&private_key()?, &payload)?;
            println!("data={}", envelope.data);
            println!("signature={}", envelope.signature);
        }
        Command::Decode { data, signature } => {
            let payload: Value = liqpay::signing::decode_callback(&private_key()?, &data, &signature)?;
            print_json(&payload)?;
        }
        Command::Status(order_id) => {
            let client = LiqPayClient::new(ClientConfig::from_env()?)?;
            let status: Option<OrderStatus> = client.order_status(&order_id).await?;
            match status {
                Some(status) => print_json(&status)?,
                None => println!("no such order"),
            }
        }
        Command::OffsetStatus(offset_id) => {
            let client = LiqPayClient::new(ClientConfig::from_env()?)?;
            print_json(&client.offset_status(&offset_id).await?)?;
        }
        Command::InfoMerchant => {
            let client = LiqPayClient::new(ClientConfig::from_env()?)?;
            print_json(&client.info_merchant().await?)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {e}\n\n{USAGE}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(command).await {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
