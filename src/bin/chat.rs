use anyhow::Result;
use dotenv::dotenv;
use log::{info, error};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use gemini_chat::client::{ChatSession, ChatView, HttpRelay, Relay, Transcript};
use gemini_chat::config::ClientConfig;

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    Save(&'a str),
}

/// Recognizes `/quit` and `/save <path>`. Everything else is a prompt, even
/// when it starts with a slash.
fn parse_command(input: &str) -> Option<Command<'_>> {
    let input = input.trim();
    if input == "/quit" {
        return Some(Command::Quit);
    }
    let path = input.strip_prefix("/save ")?.trim();
    (!path.is_empty()).then_some(Command::Save(path))
}

const HELP: &str = "Enter sends. End a line with \\ to continue on the next one. /save <file> writes the chat as HTML, /quit exits.";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let config = ClientConfig::from_env();
    let relay = HttpRelay::new(&config.relay_url);
    let view = ChatView::new()?;
    info!("Using relay at {}", relay.url());

    let mut session = ChatSession::new();
    let mut transcript = Transcript::new();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut draft = String::new();

    stdout.write_all(format!("Gemini Chat\n{}\n", HELP).as_bytes()).await?;

    loop {
        stdout.write_all(if draft.is_empty() { b"> " } else { b". " }).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        if let Some(continued) = line.strip_suffix('\\') {
            draft.push_str(continued);
            draft.push('\n');
            continue;
        }
        draft.push_str(&line);

        match parse_command(&draft) {
            Some(Command::Quit) => break,
            Some(Command::Save(path)) => {
                match view.render_html(&session) {
                    Ok(html) => match tokio::fs::write(path, html).await {
                        Ok(()) => stdout.write_all(format!("saved {}\n", path).as_bytes()).await?,
                        Err(e) => error!("Failed to save chat: {}", e),
                    },
                    Err(e) => error!("Failed to render chat: {:#}", e),
                }
                draft.clear();
                continue;
            }
            None => {}
        }

        session.set_input(std::mem::take(&mut draft));
        let Some(prompt) = session.begin_submit() else {
            continue;
        };

        for line in transcript.pending(&session) {
            stdout.write_all(format!("{}\n", line).as_bytes()).await?;
        }
        stdout.write_all(b"Sending...\n").await?;
        stdout.flush().await?;

        let result = relay.send(&prompt).await;
        session.finish_submit(result);

        for line in transcript.pending(&session) {
            stdout.write_all(format!("{}\n", line).as_bytes()).await?;
        }
    }

    Ok(())
}
