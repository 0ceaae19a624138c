// CLI: run one product search and print the result set as JSON.
//
// Usage: shopscrape <query words...>

use anyhow::{Result, bail};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if query.trim().is_empty() {
        bail!("usage: shopscrape <query>");
    }

    let results = shopscrape::search(&query).await;

    // Close the browser before reporting; a zombie Chrome outlives the
    // process otherwise
    shopscrape::shutdown().await?;

    let results = results?;
    println!("{}", serde_json::to_string_pretty(&results)?);

    if let Some(diagnostic) = &results.diagnostic {
        bail!("search failed: {diagnostic}");
    }

    eprintln!("{} product(s) for '{}'", results.products.len(), results.query);
    Ok(())
}
