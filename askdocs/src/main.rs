// Terminal front end for the docs assistant. The browser widget talks to ../api instead.

use anyhow::Result;
use askdocs::{unique_hits, ChatSession, Config, TypesenseClient};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    log::info!("Using search backend at {} ({})", config.base_url, config.collection);

    let mut session = ChatSession::new(TypesenseClient::new(&config)?);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Ask the docs. /clear starts over, /quit exits.");
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" => break,
            "/clear" => {
                session.clear();
                println!("Conversation cleared.");
            }
            question => {
                let Some(reply) = session.send(question).await else {
                    continue;
                };
                println!("\n{}\n", reply.rendered());
                for (i, hit) in unique_hits(&reply.hits).iter().enumerate() {
                    println!("  [{}] {} - {}", i + 1, hit.title, hit.url);
                }
                println!();
            }
        }
    }

    Ok(())
}
