use std::process::ExitCode;

use chat_sync::api::models::{ContactId, Message};
use chat_sync::{ApiClient, ChatStore, Settings, SyncEngine};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chat-sync", version, about = "Sync chat contacts and conversations")]
struct Cli {
    /// Gateway base URL; overrides config and CHAT_SYNC_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List conversations and contacts.
    List {
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Show one conversation.
    Open { contact_id: ContactId },
    /// Send a message to a contact.
    Send { contact_id: ContactId, text: String },
}

fn print_lists(store: &ChatStore) {
    if let Some(me) = store.profile_user() {
        println!("Signed in as {} ({})", me.full_name, me.id);
    }
    println!("Chats:");
    for entry in store.chats_contacts() {
        let last = entry
            .chat
            .last_message
            .as_ref()
            .map(|m| m.message.as_str())
            .unwrap_or("");
        println!(
            "  [{}] {} ({} unseen): {}",
            entry.contact.id, entry.contact.full_name, entry.chat.unseen_msgs, last
        );
    }
    println!("Contacts:");
    for contact in store.contacts() {
        println!("  [{}] {} - {}", contact.id, contact.full_name, contact.role);
    }
}

fn print_messages(messages: &[Message]) {
    for m in messages {
        println!("  {} {}: {}", m.time.as_deref().unwrap_or("-"), m.sender_id, m.message);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = Settings::load();
    if let Some(url) = cli.base_url {
        settings.base_url = url;
    }
    let settings = settings.validated()?;
    log::info!("using gateway {}", settings.base_url);

    let mut engine = SyncEngine::new(ApiClient::new(&settings)?);
    match cli.command {
        Command::List { query } => {
            let source = engine.fetch_contacts_and_conversations(&query).await;
            log::info!("contacts loaded from {:?}", source);
            print_lists(engine.store());
        }
        Command::Open { contact_id } => {
            engine.load_conversation(contact_id).await?;
            if let Some(active) = engine.store().active_chat() {
                println!("{}", active.contact.full_name);
                match &active.chat {
                    Some(chat) => print_messages(&chat.messages),
                    None => println!("  (no messages yet)"),
                }
            }
        }
        Command::Send { contact_id, text } => {
            engine.fetch_contacts_and_conversations("").await;
            engine.load_conversation(contact_id).await?;
            let sent = engine.send_message(&text).await?;
            println!("sent: {}", sent.message);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
