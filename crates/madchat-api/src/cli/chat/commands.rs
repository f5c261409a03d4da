//! Slash command parsing and help for the chat loop.
//!
//! Commands start with `/` and manage conversations without leaving the chat.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat.
    Exit,
    /// Start a new conversation.
    New,
    /// List saved conversations.
    List,
    /// Make another conversation active.
    Switch(String),
    /// Rename the active conversation.
    Rename(String),
    /// Delete a conversation (the active one when no title is given).
    Delete(Option<String>),
    /// Show the current levels.
    Levels,
    /// Reprint the active conversation.
    History,
    /// Unknown command or missing argument.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(' ') {
        Some((cmd, arg)) => (cmd.to_lowercase(), Some(arg.trim().to_string())),
        None => (trimmed.to_lowercase(), None),
    };
    let arg = arg.filter(|a| !a.is_empty());

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/clear" | "/cls" => ChatCommand::Clear,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        "/new" => ChatCommand::New,
        "/list" | "/ls" => ChatCommand::List,
        "/levels" => ChatCommand::Levels,
        "/history" => ChatCommand::History,
        "/switch" | "/open" => match arg {
            Some(title) => ChatCommand::Switch(title),
            None => ChatCommand::Unknown("/switch requires a title".to_string()),
        },
        "/rename" => match arg {
            Some(title) => ChatCommand::Rename(title),
            None => ChatCommand::Unknown("/rename requires a new title".to_string()),
        },
        "/delete" | "/rm" => ChatCommand::Delete(arg),
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

/// Print the help text listing all available commands.
pub fn print_help() {
    let rows = [
        ("/help", "Show this help message"),
        ("/new", "Start a new conversation"),
        ("/list", "List saved conversations"),
        ("/switch <title>", "Continue another conversation"),
        ("/rename <title>", "Rename this conversation (merges on collision)"),
        ("/delete [title]", "Delete a conversation (default: this one)"),
        ("/levels", "Show anger and glitch levels"),
        ("/history", "Reprint this conversation"),
        ("/clear", "Clear the screen"),
        ("/exit", "End the chat"),
    ];

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (cmd, desc) in rows {
        println!("  {:<18}{}", style(cmd).cyan(), desc);
    }
    println!();
    println!(
        "  {}",
        style("Ctrl+C cancels a pending reply, Ctrl+D exits").dim()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/h"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_exit() {
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/QUIT"), Some(ChatCommand::Exit));
        assert_eq!(parse("/q"), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_switch_keeps_title_case_and_spaces() {
        assert_eq!(
            parse("/switch  Why are you so Mad "),
            Some(ChatCommand::Switch("Why are you so Mad".to_string()))
        );
        assert!(matches!(parse("/switch"), Some(ChatCommand::Unknown(_))));
        assert!(matches!(parse("/switch   "), Some(ChatCommand::Unknown(_))));
    }

    #[test]
    fn test_parse_rename_requires_title() {
        assert_eq!(
            parse("/rename Round two"),
            Some(ChatCommand::Rename("Round two".to_string()))
        );
        assert!(matches!(parse("/rename"), Some(ChatCommand::Unknown(_))));
    }

    #[test]
    fn test_parse_delete_optional_title() {
        assert_eq!(parse("/delete"), Some(ChatCommand::Delete(None)));
        assert_eq!(
            parse("/rm old chat"),
            Some(ChatCommand::Delete(Some("old chat".to_string())))
        );
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("hello world"), None);
        assert_eq!(parse("  what / why"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse("/foo bar"),
            Some(ChatCommand::Unknown("/foo".to_string()))
        );
    }
}
