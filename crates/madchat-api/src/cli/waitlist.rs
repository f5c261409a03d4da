//! `madchat waitlist`: the support queue countdown.

use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use madchat_core::waitlist::{Countdown, Tick};

/// Message shown for a waitlist position.
pub fn position_message(tick: &Tick) -> String {
    match tick.position {
        0 => "You're next!".to_string(),
        1 => "1 person ahead of you".to_string(),
        n => format!("{n} people ahead of you"),
    }
}

/// Count down until the user reaches the front of the line.
pub async fn run_waitlist(json: bool) -> Result<()> {
    let countdown = Countdown::new();

    if json {
        for tick in countdown {
            println!(
                "{}",
                serde_json::json!({ "position": tick.position, "delay_ms": tick.delay.as_millis() })
            );
            tokio::time::sleep(tick.delay).await;
        }
        return Ok(());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));

    println!();
    println!("  {}", style("All agents are currently busy yelling at someone else.").dim());
    for tick in countdown {
        spinner.set_message(position_message(&tick));
        tokio::time::sleep(tick.delay).await;
    }
    spinner.finish_and_clear();

    println!(
        "  {} You're at the front of the line. Run {} to start.",
        style("✓").green().bold(),
        style("madchat chat").yellow()
    );
    println!();
    Ok(())
}
