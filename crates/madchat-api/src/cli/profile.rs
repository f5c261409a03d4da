//! Profile CLI commands: login, logout, whoami.

use anyhow::Result;
use console::style;
use dialoguer::Input;

use madchat_types::profile::UserProfile;

use crate::state::AppState;

/// Log in, prompting for any detail not given on the command line.
///
/// # Examples
///
/// ```bash
/// madchat login Sam --age 30
/// madchat login            # interactive
/// ```
pub fn login(
    state: &AppState,
    name: Option<String>,
    gender: Option<String>,
    age: Option<u32>,
    json: bool,
) -> Result<()> {
    let interactive = name.is_none() && !json;

    let name = match name {
        Some(name) => name,
        None if json => anyhow::bail!("a name is required with --json"),
        None => Input::<String>::new()
            .with_prompt("Your name")
            .validate_with(|input: &String| {
                if input.trim().is_empty() {
                    Err("name is required")
                } else {
                    Ok(())
                }
            })
            .interact_text()?,
    };

    let (gender, age) = if interactive {
        prompt_optional_details(gender, age)?
    } else {
        (gender, age)
    };

    let profile = state.profiles().login(&name, gender.as_deref(), age)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        println!();
        println!(
            "  {} Logged in as {}",
            style("✓").green().bold(),
            style(&profile.name).cyan().bold()
        );
        println!();
    }
    Ok(())
}

fn prompt_optional_details(
    gender: Option<String>,
    age: Option<u32>,
) -> Result<(Option<String>, Option<u32>)> {
    let gender = match gender {
        Some(g) => Some(g),
        None => {
            let g: String = Input::new()
                .with_prompt("Gender (optional)")
                .allow_empty(true)
                .interact_text()?;
            Some(g)
        }
    };

    let age = match age {
        Some(a) => Some(a),
        None => {
            let raw: String = Input::new()
                .with_prompt("Age (optional)")
                .allow_empty(true)
                .validate_with(|input: &String| {
                    if input.trim().is_empty() || input.trim().parse::<u32>().is_ok() {
                        Ok(())
                    } else {
                        Err("age must be a whole number")
                    }
                })
                .interact_text()?;
            raw.trim().parse().ok()
        }
    };

    Ok((gender, age))
}

/// Forget the logged-in profile. Saved conversations are kept.
pub fn logout(state: &AppState, json: bool) -> Result<()> {
    state.profiles().logout()?;

    if json {
        println!("{}", serde_json::json!({ "logged_out": true }));
    } else {
        println!("  {} Logged out.", style("✓").green().bold());
    }
    Ok(())
}

/// Print the logged-in profile.
pub fn whoami(state: &AppState, json: bool) -> Result<()> {
    let profile = state.profiles().current();

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    match profile {
        Some(profile) => {
            println!();
            println!("  {}", describe(&profile));
            println!(
                "  {}",
                style(format!("data: {}", state.data_dir.display())).dim()
            );
            println!();
        }
        None => {
            println!();
            println!(
                "  {} Not logged in. Run: {}",
                style("i").blue().bold(),
                style("madchat login").yellow()
            );
            println!();
        }
    }
    Ok(())
}

/// One-line description of a profile.
pub fn describe(profile: &UserProfile) -> String {
    let mut details = Vec::new();
    if let Some(gender) = &profile.gender {
        details.push(gender.clone());
    }
    if let Some(age) = profile.age {
        details.push(format!("{age}"));
    }

    if details.is_empty() {
        format!("{}", style(&profile.name).cyan().bold())
    } else {
        format!(
            "{} {}",
            style(&profile.name).cyan().bold(),
            style(format!("({})", details.join(", "))).dim()
        )
    }
}
