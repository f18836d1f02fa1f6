use std::time::Duration;

use gemini_http::{CancellationToken, GeminiClient, ProjectBrief};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = GeminiClient::from_env().map_err(anyhow::Error::msg)?;

    let project = ProjectBrief::new(
        "Flood Risk Analytics for Montpelier, VT",
        "Identify high-risk flood zones and flag underinsured properties.",
        "K-means clustering on elevation and proximity to water, plus an insurance-to-value model.",
        "Found 25%+ coverage gaps in high-value properties near the Winooski River.",
    );
    println!("{}", client.explain_project(&project).await);

    // Give up if nothing arrives within ten seconds, retries included.
    let cancel = CancellationToken::new();
    let deadline = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(10)).await;
        deadline.cancel();
    });

    match client
        .generate_cancellable("Summarise that project in five words.", &cancel)
        .await
    {
        Some(text) => println!("{text}"),
        None => eprintln!("cancelled"),
    }

    Ok(())
}
