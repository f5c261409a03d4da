//! Welcome banner display for chat sessions.

use console::style;

use madchat_types::persona::PersonalityMode;

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(user_name: Option<&str>, mode: PersonalityMode, gateway_url: &str) {
    println!();
    println!("  {} {}", style("☠").red(), style("Angry Bot").red().bold());
    println!(
        "  {}",
        style("Gets angrier with every message. Twenty messages and it's done with you.").dim()
    );
    println!();
    if let Some(name) = user_name {
        println!("  {}  {}", style("User:").bold(), style(name).cyan());
    }
    println!("  {}  {}", style("Mode:").bold(), style(mode).dim());
    println!("  {}  {}", style("Backend:").bold(), style(gateway_url).dim());
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+C cancels a reply, Ctrl+D exits").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
