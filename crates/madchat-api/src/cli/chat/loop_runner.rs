//! Main chat loop orchestration.
//!
//! Wires a `SessionController` to the file store and the HTTP gateway, then
//! runs the input loop: slash commands, message sends raced against Ctrl+C,
//! and the level footer after every reply.

use std::time::Duration;

use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use madchat_core::chat::gateway::{ChatGateway, GenerationSettings};
use madchat_core::chat::session::{DiscardReason, SendOutcome, SessionController};
use madchat_infra::gateway::HttpChatGateway;
use madchat_types::error::{GatewayError, ValidationError};
use madchat_types::persona::PersonalityMode;

use crate::cli::conversation::summarize;
use crate::state::{AppState, SharedStore};

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer;

type Controller = SessionController<SharedStore, HttpChatGateway>;

/// Run the interactive chat loop.
pub async fn run_chat_loop(
    state: &AppState,
    title: Option<String>,
    gateway_url: Option<String>,
    mode: Option<PersonalityMode>,
) -> anyhow::Result<()> {
    let mut client_config = state.config.client.clone();
    if let Some(url) = gateway_url {
        client_config.gateway_url = url;
    }
    if let Some(mode) = mode {
        client_config.personality_mode = mode;
    }

    let gateway = HttpChatGateway::from_config(&client_config)
        .context("failed to create chat gateway")?;
    let profile = state.profiles().current();
    let user_name = profile.as_ref().map(|p| p.name.clone());

    let mut controller = SessionController::new(
        state.conversations(),
        gateway,
        GenerationSettings::from(&client_config),
    )
    .with_profile(profile);

    print_welcome_banner(
        user_name.as_deref(),
        client_config.personality_mode,
        &client_config.gateway_url,
    );

    if let Some(title) = title {
        open_conversation(&mut controller, &title);
    }

    let mut chat_input = ChatInput::new(prompt_for(&controller))
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;
    let mut confirm_new = false;

    loop {
        chat_input.update_prompt(&prompt_for(&controller));
        let event = chat_input.read_line().await;

        let text = match event {
            InputEvent::Eof => {
                println!("\n  {}", style("Chat ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Blank => continue,
            InputEvent::Message(text) => text,
        };

        let awaiting_confirm = std::mem::take(&mut confirm_new);

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::Exit => {
                    println!("\n  {}", style("Chat ended.").dim());
                    break;
                }
                ChatCommand::New => {
                    if controller.needs_confirmation() && !awaiting_confirm {
                        println!(
                            "\n  {} Leave '{}'? It stays saved. Type /new again to confirm.\n",
                            style("?").yellow().bold(),
                            controller.state().current_title.as_deref().unwrap_or_default()
                        );
                        confirm_new = true;
                    } else {
                        controller.start_new_conversation();
                        println!("\n  {} New conversation.\n", style("*").cyan().bold());
                    }
                }
                ChatCommand::List => print_titles(&controller),
                ChatCommand::Switch(title) => open_conversation(&mut controller, &title),
                ChatCommand::Rename(new_title) => rename_active(&mut controller, &new_title),
                ChatCommand::Delete(title) => delete(&mut controller, title),
                ChatCommand::Levels => {
                    println!();
                    renderer::print_levels(controller.state());
                    println!();
                }
                ChatCommand::History => match controller.state().current_title.clone() {
                    Some(title) => renderer::print_conversation(&title, &controller.conversation()),
                    None => println!("\n  {}\n", style("No active conversation.").dim()),
                },
                ChatCommand::Unknown(cmd_name) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(cmd_name).dim()
                    );
                }
            }
            continue;
        }

        send(&mut controller, &mut chat_input, &text).await;
    }

    let cancelled = controller.cancel_pending();
    if cancelled > 0 {
        debug!(cancelled, "Cancelled outstanding requests on exit");
    }
    Ok(())
}

/// Prompt showing the active conversation title.
fn prompt_for(controller: &Controller) -> String {
    match controller.state().current_title.as_deref() {
        Some(title) => format!("  {} {} ", style(title).dim(), style("You >").green().bold()),
        None => format!("  {} ", style("You >").green().bold()),
    }
}

/// Send one message, racing the gateway against Ctrl+C.
async fn send(controller: &mut Controller, chat_input: &mut ChatInput, text: &str) {
    let pending = match controller.begin_send(text) {
        Ok(pending) => pending,
        Err(ValidationError::MessageCapReached { cap }) => {
            println!(
                "\n  {} The bot has stopped listening after {cap} messages. /new to start over.\n",
                style("x").red().bold()
            );
            return;
        }
        Err(e) => {
            println!("\n  {} {e}\n", style("!").yellow().bold());
            return;
        }
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.red} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("fuming...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = {
        let reply = controller.gateway().send(&pending.request);
        tokio::pin!(reply);
        loop {
            tokio::select! {
                result = &mut reply => break result,
                event = chat_input.read_line() => match event {
                    InputEvent::Interrupted | InputEvent::Eof => {
                        pending.handle.cancellation_token().cancel();
                        break Err(GatewayError::Cancelled);
                    }
                    InputEvent::Message(_) | InputEvent::Blank => {
                        spinner.println("  still waiting for a reply, Ctrl+C to cancel");
                    }
                },
            }
        }
    };
    spinner.finish_and_clear();

    match controller.finish_send(pending.handle, result) {
        SendOutcome::Replied(record) => {
            println!();
            renderer::print_record(&record);
            println!();
        }
        SendOutcome::Failed { record, error } => {
            info!(error = %error, "Reply failed");
            println!();
            renderer::print_record(&record);
            println!("  {}", style(error).dim());
            println!();
        }
        SendOutcome::Discarded(DiscardReason::Cancelled) => {
            println!("\n  {}\n", style("Reply cancelled.").dim());
        }
        SendOutcome::Discarded(DiscardReason::Stale) => {}
    }
    renderer::print_levels(controller.state());
    println!();
}

fn open_conversation(controller: &mut Controller, title: &str) {
    let existed = controller.select_conversation(title);
    if existed {
        renderer::print_conversation(title, &controller.conversation());
        renderer::print_levels(controller.state());
        println!();
    } else {
        println!(
            "\n  {} No conversation named '{}' yet. Your next message starts it.\n",
            style("i").blue().bold(),
            style(title).cyan()
        );
    }
}

fn print_titles(controller: &Controller) {
    let summaries = summarize(controller.store());
    if summaries.is_empty() {
        println!("\n  {}\n", style("No saved conversations.").dim());
        return;
    }

    let active = controller.state().current_title.as_deref();
    println!();
    for summary in summaries {
        let marker = if active == Some(summary.title.as_str()) { "*" } else { " " };
        let detail = format!(
            "({} messages, anger {})",
            summary.user_messages, summary.anger_level
        );
        println!(
            "  {} {} {}",
            style(marker).cyan().bold(),
            style(&summary.title).cyan(),
            style(detail).dim()
        );
    }
    println!();
}

fn rename_active(controller: &mut Controller, new_title: &str) {
    let Some(old_title) = controller.state().current_title.clone() else {
        println!("\n  {}\n", style("No active conversation to rename.").dim());
        return;
    };

    match controller.rename_conversation(&old_title, new_title) {
        Ok(outcome) if outcome.merged => println!(
            "\n  {} Merged into existing conversation '{}'.\n",
            style("!").yellow().bold(),
            style(new_title.trim()).cyan()
        ),
        Ok(_) => println!(
            "\n  {} Renamed to '{}'.\n",
            style("✓").green().bold(),
            style(new_title.trim()).cyan()
        ),
        Err(e) => println!("\n  {} {e}\n", style("!").red().bold()),
    }
}

fn delete(controller: &mut Controller, title: Option<String>) {
    let Some(title) = title.or_else(|| controller.state().current_title.clone()) else {
        println!("\n  {}\n", style("No active conversation to delete.").dim());
        return;
    };

    match controller.delete_conversation(&title) {
        Ok(0) => println!(
            "\n  {} No conversation named '{}'.\n",
            style("?").yellow().bold(),
            title
        ),
        Ok(removed) => println!(
            "\n  {} Deleted '{}' ({removed} messages).\n",
            style("x").red().bold(),
            title
        ),
        Err(e) => println!("\n  {} {e}\n", style("!").red().bold()),
    }
}
