//! Terminal rendering for chat records and the level gauges.

use console::style;

use madchat_types::chat::{MESSAGE_CAP, MessageRecord, MessageRole, SessionState};

/// Width of the anger gauge in cells.
const GAUGE_WIDTH: usize = 20;

/// Horizontal gauge filled in proportion to `value / max`.
pub fn gauge(value: f64, max: f64, width: usize) -> String {
    let ratio = if max > 0.0 { (value / max).clamp(0.0, 1.0) } else { 0.0 };
    let filled = (ratio * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Print one record with a role label.
pub fn print_record(record: &MessageRecord) {
    match record.role {
        MessageRole::User => {
            println!("  {} {}", style("You >").green().bold(), record.content);
        }
        MessageRole::Assistant => {
            println!("  {} {}", style("Bot >").red().bold(), record.content);
        }
        MessageRole::System => {
            println!("  {} {}", style("!").yellow().bold(), style(&record.content).yellow());
        }
    }
}

/// Print every record of a conversation.
pub fn print_conversation(title: &str, records: &[MessageRecord]) {
    println!();
    println!("  {}", style(title).cyan().bold());
    println!();
    for record in records {
        print_record(record);
    }
    println!();
}

/// One-line summary of the session levels.
pub fn levels_line(state: &SessionState) -> String {
    format!(
        "anger {} {:>3}  glitch {:.1}  messages {}/{}",
        gauge(f64::from(state.anger_level), 100.0, GAUGE_WIDTH),
        state.anger_level,
        state.glitch_level,
        state.message_count,
        MESSAGE_CAP
    )
}

/// Print the levels footer after a reply.
pub fn print_levels(state: &SessionState) {
    let line = levels_line(state);
    let styled = match state.anger_level {
        0..40 => style(line).green(),
        40..80 => style(line).yellow(),
        _ => style(line).red(),
    };
    println!("  {}", styled.dim());
    if !state.has_capacity() {
        println!(
            "  {}",
            style("This conversation is over. /new to start another.").red().bold()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauge_bounds() {
        assert_eq!(gauge(0.0, 100.0, 4), "░░░░");
        assert_eq!(gauge(100.0, 100.0, 4), "████");
        assert_eq!(gauge(50.0, 100.0, 4), "██░░");
        assert_eq!(gauge(500.0, 100.0, 2), "██");
        assert_eq!(gauge(1.0, 0.0, 2), "░░");
    }

    #[test]
    fn test_levels_line() {
        let state = SessionState {
            current_title: Some("t".to_string()),
            conversation_id: None,
            message_count: 12,
            anger_level: 60,
            glitch_level: 0.4,
            loading: false,
        };
        let line = levels_line(&state);
        assert!(line.contains(" 60"));
        assert!(line.contains("glitch 0.4"));
        assert!(line.contains("messages 12/20"));
    }
}
