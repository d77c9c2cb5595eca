use clap::Parser;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "health-cli")]
#[command(about = "Query a health aggregator and exit non-zero when it reports failure", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:9292")]
    url: String,

    /// Comma separated hosts whose failure is ignored
    #[arg(short, long)]
    allowed_to_fail: Option<String>,

    /// Comma separated hosts that must succeed
    #[arg(short, long)]
    must_succeed: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    match check(&cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

/// Returns whether the aggregator answered 200.
async fn check(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let mut query = Vec::new();
    if let Some(hosts) = &cli.allowed_to_fail {
        query.push(("allowed_to_fail", hosts.as_str()));
    }
    if let Some(hosts) = &cli.must_succeed {
        query.push(("must_succeed", hosts.as_str()));
    }

    let res = reqwest::Client::new()
        .get(&cli.url)
        .query(&query)
        .send()
        .await?;

    let status = res.status();
    let text = res.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }

    if !status.is_success() {
        eprintln!("Aggregator reported status {}", status);
    }
    Ok(status.is_success())
}
