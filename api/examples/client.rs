use reqwest::Client;
use serde_json::{json, Value};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();
    let base_url = std::env::var("ASKDOCS_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());

    println!("Testing Ask Docs proxy at {}", base_url);

    let health: Value = client
        .get(format!("{}/health", base_url))
        .send()
        .await?
        .json()
        .await?;
    println!("Health: {}", health);

    let mut conversation_id: Option<String> = None;
    for question in ["How do I install the search server?", "And how do I configure it?"] {
        println!("\nQ: {}", question);
        let response = client
            .post(format!("{}/ask", base_url))
            .json(&json!({ "message": question, "conversation_id": conversation_id }))
            .send()
            .await?;

        println!("Status: {}", response.status());
        let body: Value = response.json().await?;
        println!("{}", serde_json::to_string_pretty(&body)?);

        conversation_id = body["conversation_id"].as_str().map(str::to_string);
    }

    Ok(())
}
