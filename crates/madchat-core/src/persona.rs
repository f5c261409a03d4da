//! Persona prompt shaping and reply post-processing.
//!
//! Used by the generation backend: the anger level picks one of ten tone
//! tiers for the system prompt, and the glitch level corrupts the reply by
//! stuttering random characters.

use rand::Rng;
use rand::seq::SliceRandom;

use madchat_types::persona::PersonalityMode;

const MILD_WORDS: &[&str] = &[
    "annoyed",
    "irritated",
    "agitated",
    "exasperated",
    "frustrated",
    "miffed",
    "irked",
    "perturbed",
];

const ANGRY_WORDS: &[&str] = &[
    "enraged",
    "livid",
    "wrathful",
    "infuriated",
    "irate",
    "incensed",
    "fuming",
    "outraged",
];

const CENSORED_SWEARING: &str = "with this situation and throw in several swear words \
     but completely censor them with asterisks";

const ALL_CAPS_SWEARING: &str = "with this situation and shouting in all caps";

/// Character profile for a personality mode.
pub fn bot_profile(mode: PersonalityMode) -> &'static str {
    match mode {
        PersonalityMode::Normal => {
            "sarcastic person who doesn't like to use too many words, \
             you keep things brief and snappy. \
             You don't use any formal language or polite mannerisms"
        }
        PersonalityMode::Zesty => {
            "flamboyant drama queen who lives for gossip, \
             you keep things brief and snappy"
        }
    }
}

/// Tone description for an anger level (0..=100, higher is angrier).
pub fn anger_subprompt<R: Rng + ?Sized>(anger_level: u32, rng: &mut R) -> String {
    let mild = pick(MILD_WORDS, rng);
    let angry = pick(ANGRY_WORDS, rng);

    match anger_level {
        0..20 => format!("a little bit {mild}"),
        20..40 => format!("quite {mild}"),
        40..60 => format!(
            "very {mild}. You even throw in a swear word but completely censor it with asterisks"
        ),
        60..70 => format!("downright {angry} {CENSORED_SWEARING}"),
        70..80 => format!("downright {angry} {CENSORED_SWEARING}. You even shout briefly"),
        80..85 => format!("downright {angry} {CENSORED_SWEARING}. You are shouting in all caps"),
        85..90 => format!(
            "downright {angry} {ALL_CAPS_SWEARING}, using mostly swear words \
             but completely censor them with asterisks."
        ),
        90..95 => format!(
            "downright {angry} {ALL_CAPS_SWEARING}, using mostly swear words \
             but completely censor them with asterisks. Don't be afraid to insult \
             anything about the given text, the more personal the better"
        ),
        _ => format!(
            "downright {angry} {ALL_CAPS_SWEARING}, only using swear words \
             but completely censor them with asterisks. You are incoherent and \
             the sentence makes no sense"
        ),
    }
}

/// Assemble the persona system prompt for one incoming message.
pub fn build_prompt<R: Rng + ?Sized>(
    incoming_text: &str,
    anger_level: u32,
    mode: PersonalityMode,
    rng: &mut R,
) -> String {
    format!(
        "Respond to the text in quotes as if you are a {}. You are also {}. \
         Here is the text to respond to: \"{incoming_text}\"",
        bot_profile(mode),
        anger_subprompt(anger_level, rng),
    )
}

/// Stutter random characters of `text`.
///
/// `floor(len * glitch²)` characters (chosen with replacement) are each
/// repeated 2 to 6 times. A glitch level of zero or less leaves the text
/// unchanged.
pub fn apply_glitch<R: Rng + ?Sized>(text: &str, glitch_level: f64, rng: &mut R) -> String {
    let mut chars: Vec<String> = text.chars().map(String::from).collect();
    if glitch_level <= 0.0 || chars.is_empty() {
        return text.to_string();
    }

    let glitches = (chars.len() as f64 * glitch_level.powi(2)) as usize;
    for _ in 0..glitches {
        let index = rng.gen_range(0..chars.len());
        let repeats = rng.gen_range(2..=6);
        chars[index] = chars[index].repeat(repeats);
    }
    chars.concat()
}

fn pick<R: Rng + ?Sized>(words: &'static [&'static str], rng: &mut R) -> &'static str {
    words.choose(rng).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_low_anger_is_mild() {
        let prompt = anger_subprompt(0, &mut rng());
        assert!(prompt.starts_with("a little bit "));
        let word = prompt.trim_start_matches("a little bit ");
        assert!(MILD_WORDS.contains(&word));
    }

    #[test]
    fn test_tiers_escalate() {
        let mut r = rng();
        assert!(anger_subprompt(20, &mut r).starts_with("quite "));
        assert!(anger_subprompt(50, &mut r).contains("a swear word"));
        assert!(anger_subprompt(60, &mut r).starts_with("downright "));
        assert!(anger_subprompt(75, &mut r).ends_with("You even shout briefly"));
        assert!(anger_subprompt(80, &mut r).ends_with("all caps"));
        assert!(anger_subprompt(92, &mut r).contains("the more personal the better"));
        assert!(anger_subprompt(100, &mut r).contains("incoherent"));
    }

    #[test]
    fn test_angry_tiers_use_angry_words() {
        let prompt = anger_subprompt(65, &mut rng());
        let word = prompt.split_whitespace().nth(1).unwrap();
        assert!(ANGRY_WORDS.contains(&word));
    }

    #[test]
    fn test_build_prompt_quotes_message() {
        let prompt = build_prompt("hello bot", 10, PersonalityMode::Normal, &mut rng());
        assert!(prompt.starts_with("Respond to the text in quotes as if you are a sarcastic"));
        assert!(prompt.ends_with("Here is the text to respond to: \"hello bot\""));
    }

    #[test]
    fn test_zesty_profile_differs() {
        assert_ne!(
            bot_profile(PersonalityMode::Zesty),
            bot_profile(PersonalityMode::Normal)
        );
    }

    #[test]
    fn test_zero_glitch_is_identity() {
        assert_eq!(apply_glitch("unchanged", 0.0, &mut rng()), "unchanged");
        assert_eq!(apply_glitch("", 0.7, &mut rng()), "");
    }

    #[test]
    fn test_glitch_only_lengthens() {
        let text = "the quick brown fox jumps over the lazy dog";
        let glitched = apply_glitch(text, 0.7, &mut rng());
        assert!(glitched.chars().count() > text.chars().count());

        // Collapsing runs of repeated characters recovers the original
        let mut dedup: Vec<char> = glitched.chars().collect();
        dedup.dedup();
        let mut orig: Vec<char> = text.chars().collect();
        orig.dedup();
        assert_eq!(dedup, orig);
    }

    #[test]
    fn test_small_glitch_on_short_text_can_be_noop() {
        // 5 chars * 0.3^2 = 0.45 -> zero glitches
        assert_eq!(apply_glitch("hello", 0.3, &mut rng()), "hello");
    }
}
