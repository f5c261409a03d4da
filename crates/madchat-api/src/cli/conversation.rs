//! Conversation management CLI commands: list, show, rename, delete.
//!
//! Provides conversation browsing with rich tables and deletion with a
//! confirmation prompt.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;
use serde::Serialize;

use madchat_core::chat::levels::compute_levels;
use madchat_core::chat::store::ConversationStore;
use madchat_core::storage::PersistedStore;
use madchat_types::chat::{MESSAGE_CAP, MessageRecord, MessageRole};

use crate::state::AppState;

/// One row of the conversation listing.
#[derive(Debug, Serialize)]
pub struct ConversationSummary {
    pub title: String,
    pub user_messages: u32,
    pub records: usize,
    pub anger_level: u8,
    pub last_activity: Option<chrono::DateTime<chrono::Utc>>,
}

/// Summaries of every conversation, most recently active first.
pub fn summarize<S: PersistedStore>(store: &ConversationStore<S>) -> Vec<ConversationSummary> {
    store
        .list_titles()
        .into_iter()
        .map(|title| {
            let records = store.filter_by_title(&title);
            let user_messages = store.user_message_count(&title);
            ConversationSummary {
                last_activity: records.iter().filter_map(|r| r.timestamp).max(),
                records: records.len(),
                anger_level: compute_levels(user_messages.min(MESSAGE_CAP)).anger,
                user_messages,
                title,
            }
        })
        .collect()
}

/// List saved conversations.
///
/// # Examples
///
/// ```bash
/// madchat list
/// madchat list --json
/// ```
pub fn list_conversations(state: &AppState, json: bool) -> Result<()> {
    let summaries = summarize(&state.conversations());

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!();
        println!(
            "  {} No conversations yet. Start one with: {}",
            style("i").blue().bold(),
            style("madchat chat").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Title").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
        Cell::new("Anger").fg(Color::White),
        Cell::new("Last activity").fg(Color::White),
    ]);

    for summary in &summaries {
        let last = summary
            .last_activity
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        let anger_cell = match summary.anger_level {
            0..40 => Cell::new(summary.anger_level).fg(Color::Green),
            40..80 => Cell::new(summary.anger_level).fg(Color::Yellow),
            _ => Cell::new(summary.anger_level).fg(Color::Red),
        };

        table.add_row(vec![
            Cell::new(&summary.title).fg(Color::Cyan),
            Cell::new(format!("{}/{MESSAGE_CAP}", summary.user_messages)).fg(Color::White),
            anger_cell,
            Cell::new(last).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} conversation{}",
        style(summaries.len()).bold(),
        if summaries.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Print every record of a conversation, oldest first.
pub fn show_conversation(state: &AppState, title: &str, json: bool) -> Result<()> {
    let records = state.conversations().filter_by_title(title);
    if records.is_empty() {
        anyhow::bail!("Conversation '{title}' not found");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!();
    println!("  {}", style(title).cyan().bold());
    println!();
    for record in &records {
        println!("  {}", format_record(record));
    }
    println!();
    Ok(())
}

/// Role-labelled single line for a record.
pub fn format_record(record: &MessageRecord) -> String {
    let label = match record.role {
        MessageRole::User => style("You").green().bold(),
        MessageRole::Assistant => style("Bot").red().bold(),
        MessageRole::System => style("!").yellow().bold(),
    };
    format!("{label} {}", record.content)
}

/// Rename a conversation, merging into the target if it already exists.
pub fn rename_conversation(state: &AppState, old: &str, new: &str, json: bool) -> Result<()> {
    let mut store = state.conversations();
    if !store.contains(old) {
        anyhow::bail!("Conversation '{old}' not found");
    }

    let outcome = store.rename(old, new)?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "old_title": old,
                "new_title": new.trim(),
                "moved": outcome.moved,
                "merged": outcome.merged,
            })
        );
    } else if outcome.merged {
        println!(
            "  {} Merged '{}' into existing conversation '{}' ({} records moved).",
            style("!").yellow().bold(),
            old,
            style(new.trim()).cyan(),
            outcome.moved
        );
    } else {
        println!(
            "  {} Renamed '{}' to '{}'.",
            style("✓").green().bold(),
            old,
            style(new.trim()).cyan()
        );
    }
    Ok(())
}

/// Delete a conversation after confirmation.
///
/// # Examples
///
/// ```bash
/// madchat delete "Hello there"
/// madchat delete "Hello there" --force
/// ```
pub fn delete_conversation(state: &AppState, title: &str, force: bool, json: bool) -> Result<()> {
    let mut store = state.conversations();
    let records = store.filter_by_title(title);
    if records.is_empty() {
        anyhow::bail!("Conversation '{title}' not found");
    }

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete conversation '{}' ({} messages)?",
                style(title).red().bold(),
                records.len()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let removed = store.remove(title)?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "deleted": true, "title": title, "removed": removed })
        );
    } else {
        println!(
            "  {} Conversation '{}' deleted.",
            style("x").red().bold(),
            title
        );
    }
    Ok(())
}
