//! Interactive chat session and one-shot messages

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::core::{build_assistant, open_db};

pub async fn cmd_chat(db_path: &Path, user: i64) -> Result<()> {
    let db = open_db(db_path)?;
    let assistant = build_assistant(&db)?;

    println!("💬 Tally assistant ready. Type a message, or 'quit' to leave.");
    if let Ok(insights) = assistant.quick_insights(user) {
        println!("   {}", insights);
    }
    println!();

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut line = String::new();

    loop {
        print!("you> ");
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if matches!(message, "quit" | "exit" | "bye") {
            println!("👋 Bye!");
            break;
        }

        let reply = assistant
            .process_message(message, user)
            .await
            .context("Failed to process message")?;
        println!("\n{}\n", reply.response);
    }

    Ok(())
}

pub async fn cmd_say(db_path: &Path, user: i64, message: &str, json: bool) -> Result<()> {
    if message.trim().is_empty() {
        anyhow::bail!("Nothing to say. Try: tally say spent 500 on groceries");
    }

    let db = open_db(db_path)?;
    let assistant = build_assistant(&db)?;

    let reply = assistant
        .process_message(message, user)
        .await
        .context("Failed to process message")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        println!("{}", reply.response);
    }

    Ok(())
}
