use gemini_http::{ClientOptions, GeminiClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let api_key = std::env::var("GEMINI_API_KEY")?;
    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Explain exponential backoff in one sentence.".to_owned());

    let client = GeminiClient::new(api_key).with_options(ClientOptions {
        max_retries: 2,
        ..ClientOptions::default()
    });

    match client.try_generate(&prompt).await {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("generation failed ({}): {err}", err.kind()),
    }

    Ok(())
}
