//! Fuzzy command name correction.

use tracing::debug;

/// Minimum similarity for a correction to be offered.
pub const GUESS_THRESHOLD: f64 = 0.6;

/// Picks the single best correction for a mistyped command name.
///
/// Scores every candidate with Jaro-Winkler similarity and returns the
/// best one only when it clears [`GUESS_THRESHOLD`] *and* is strictly
/// better than the runner-up; ties are ambiguous and yield `None`.
///
/// This is a usability aid only: callers must check exact and alias
/// matches first, and skip guessing entirely when correction is
/// disabled for the run.
///
/// # Examples
///
/// ```
/// use command_kit_dispatch::guess_command;
///
/// let names = ["build".to_string(), "bench".to_string()];
/// assert_eq!(guess_command("buidl", &names), Some("build"));
/// assert_eq!(guess_command("qqqq", &names), None);
/// ```
pub fn guess_command<'a>(input: &str, candidates: &'a [String]) -> Option<&'a str> {
    let mut best: Option<(&str, f64)> = None;
    let mut runner_up = 0.0_f64;

    for candidate in candidates {
        let score = strsim::jaro_winkler(input, candidate);
        match best {
            Some((_, best_score)) if score > best_score => {
                runner_up = best_score;
                best = Some((candidate, score));
            }
            Some(_) => runner_up = runner_up.max(score),
            None => best = Some((candidate, score)),
        }
    }

    let (name, score) = best?;
    if score >= GUESS_THRESHOLD && score > runner_up {
        debug!(input, corrected = name, score, "fuzzy-corrected command name");
        Some(name)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_close_typo_corrected() {
        assert_eq!(guess_command("buidl", &names(&["build", "list"])), Some("build"));
    }

    #[test]
    fn test_distant_input_rejected() {
        assert_eq!(guess_command("zzzz", &names(&["build", "list"])), None);
    }

    #[test]
    fn test_tie_is_ambiguous() {
        // equidistant from both candidates
        assert_eq!(guess_command("lost", &names(&["lose", "lost"])), Some("lost"));
        assert_eq!(guess_command("ab", &names(&["ax", "ay"])), None);
    }

    #[test]
    fn test_empty_candidates() {
        assert_eq!(guess_command("anything", &[]), None);
    }
}
