//! `madchat levels`: the anger/glitch schedule.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use serde::Serialize;

use madchat_core::chat::levels::compute_levels;
use madchat_types::chat::MESSAGE_CAP;

#[derive(Debug, Serialize)]
struct LevelRow {
    message_count: u32,
    anger_level: u8,
    glitch_level: f64,
}

fn row(message_count: u32) -> LevelRow {
    let levels = compute_levels(message_count);
    LevelRow {
        message_count,
        anger_level: levels.anger,
        glitch_level: levels.glitch,
    }
}

/// Print the levels for one message count, or the whole schedule up to the cap.
pub fn show_levels(count: Option<u32>, json: bool) -> Result<()> {
    let rows: Vec<LevelRow> = match count {
        Some(n) => vec![row(n)],
        None => (0..=MESSAGE_CAP).map(row).collect(),
    };

    if json {
        match count {
            Some(_) => println!("{}", serde_json::to_string_pretty(&rows[0])?),
            None => println!("{}", serde_json::to_string_pretty(&rows)?),
        }
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Messages").fg(Color::White),
        Cell::new("Anger").fg(Color::White),
        Cell::new("Glitch").fg(Color::White),
    ]);

    for r in &rows {
        table.add_row(vec![
            Cell::new(r.message_count).fg(Color::Cyan),
            Cell::new(r.anger_level).fg(Color::Red),
            Cell::new(format!("{:.1}", r.glitch_level)).fg(Color::Magenta),
        ]);
    }

    println!();
    println!("{table}");
    if count.is_none() {
        println!(
            "  {}",
            style(format!("A conversation closes after {MESSAGE_CAP} messages.")).dim()
        );
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_matches_schedule() {
        let r = row(12);
        assert_eq!(r.anger_level, 60);
        assert!((r.glitch_level - 0.4).abs() < 1e-9);

        let json = serde_json::to_value(row(0)).unwrap();
        assert_eq!(json["anger_level"], 0);
        assert_eq!(json["glitch_level"], 0.0);
    }
}
