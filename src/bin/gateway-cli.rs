use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Operator CLI for the signing gateway", long_about = None)]
struct Cli {
    #[arg(short, long, env = "SIGN_GATEWAY_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the gateway version and loaded configuration counts
    Status,
    /// List the trusted certificate authorities
    Ca,
    /// Hash a plain secret for use in a signing configuration
    HashSecret {
        /// The plain secret
        plain: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let res = match cli.command {
        Commands::Status => {
            client
                .get(format!("{}/status", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Ca => {
            client
                .get(format!("{}/ca", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::HashSecret { plain } => {
            client
                .post(format!("{}/secrets/hash", cli.url))
                .headers(headers)
                .json(&json!({ "plainSecret": plain }))
                .send()
                .await?
        }
    };
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
