//! Greedy line filling
//!
//! Tokens are appended to the current line until the measured width would
//! reach `max_width`; at that point the line is emitted and the token starts
//! the next one. A token that is too wide on its own still gets a line of
//! its own, so no token is ever dropped.

/// What to do with the trailing, partially filled line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushPolicy {
    /// Always emit it
    Always,
    /// Emit it only if fewer than `n` lines were emitted before it
    UnderLineCap(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOptions {
    pub separator: String,
    pub flush: FlushPolicy,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            separator: " | ".to_string(),
            flush: FlushPolicy::Always,
        }
    }
}

/// Pack `tokens` into lines narrower than `max_width`.
///
/// `measure` returns the rendered width of a string. A line is only ever
/// wider than `max_width` when it holds a single token that is wider on its
/// own. With `max_width <= 0` every token ends up on its own line.
pub fn layout_lines<S, F>(
    tokens: &[S],
    max_width: f32,
    options: &LineOptions,
    measure: F,
) -> Vec<String>
where
    S: AsRef<str>,
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for token in tokens {
        let token = token.as_ref();
        let candidate = if current.is_empty() {
            token.to_string()
        } else {
            format!("{current}{}{token}", options.separator)
        };

        if measure(&candidate) < max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            if measure(token) < max_width {
                current = token.to_string();
                continue;
            }
        }

        // Oversized on its own
        lines.push(token.to_string());
    }

    if !current.is_empty() {
        let keep = match options.flush {
            FlushPolicy::Always => true,
            FlushPolicy::UnderLineCap(cap) => lines.len() < cap,
        };
        if keep {
            lines.push(current);
        } else {
            tracing::debug!(
                dropped = %current,
                lines = lines.len(),
                "Trailing track line dropped by line cap"
            );
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Monospace stand-in: every char is 10px wide
    fn mono(s: &str) -> f32 {
        s.chars().count() as f32 * 10.0
    }

    fn opts(separator: &str, flush: FlushPolicy) -> LineOptions {
        LineOptions {
            separator: separator.to_string(),
            flush,
        }
    }

    /// Every token appears exactly once, in order, across all lines
    fn assert_no_token_dropped(tokens: &[&str], lines: &[String], separator: &str) {
        let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split(separator)).collect();
        assert_eq!(rejoined, tokens);
    }

    #[test]
    fn test_empty_input() {
        let tokens: [&str; 0] = [];
        assert!(layout_lines(&tokens, 100.0, &LineOptions::default(), mono).is_empty());
        assert!(layout_lines(&tokens, -1.0, &LineOptions::default(), mono).is_empty());
    }

    #[test]
    fn test_everything_fits_on_one_line() {
        let tokens = ["One", "Two", "Three"];
        let lines = layout_lines(&tokens, 1000.0, &LineOptions::default(), mono);
        assert_eq!(lines, vec!["One | Two | Three"]);
    }

    #[test]
    fn test_wraps_greedily() {
        // "Alpha | Beta" = 12 chars = 120px, adding " | Gamma" = 20 chars
        let tokens = ["Alpha", "Beta", "Gamma", "Delta"];
        let lines = layout_lines(&tokens, 150.0, &LineOptions::default(), mono);
        assert_eq!(lines, vec!["Alpha | Beta", "Gamma | Delta"]);
        for line in &lines {
            assert!(mono(line) < 150.0);
        }
        assert_no_token_dropped(&tokens, &lines, " | ");
    }

    #[test]
    fn test_width_equal_to_max_breaks() {
        // "ab cd" is exactly 50px: not strictly below 50, so it must wrap
        let tokens = ["ab", "cd"];
        let lines = layout_lines(&tokens, 50.0, &opts(" ", FlushPolicy::Always), mono);
        assert_eq!(lines, vec!["ab", "cd"]);
    }

    #[test]
    fn test_first_token_oversized() {
        let tokens = ["Supercalifragilistic", "a", "b"];
        let lines = layout_lines(&tokens, 100.0, &LineOptions::default(), mono);
        assert_eq!(lines, vec!["Supercalifragilistic", "a | b"]);
    }

    #[test]
    fn test_oversized_token_in_the_middle() {
        let tokens = ["a", "Supercalifragilistic", "b"];
        let lines = layout_lines(&tokens, 100.0, &LineOptions::default(), mono);
        assert_eq!(lines, vec!["a", "Supercalifragilistic", "b"]);
        assert_no_token_dropped(&tokens, &lines, " | ");
    }

    #[test]
    fn test_non_positive_width_gives_one_token_per_line() {
        let tokens = ["a", "b", "c"];
        for width in [0.0, -5.0] {
            let lines = layout_lines(&tokens, width, &LineOptions::default(), mono);
            assert_eq!(lines, vec!["a", "b", "c"]);
        }
    }

    #[test]
    fn test_flush_policy_under_cap() {
        let tokens = ["aaaa", "bbbb", "cccc", "dddd", "ee"];
        // 55px fits one 4-char token (40px) but never two (110px)
        let always = layout_lines(&tokens, 55.0, &opts(" | ", FlushPolicy::Always), mono);
        assert_eq!(always, vec!["aaaa", "bbbb", "cccc", "dddd", "ee"]);

        let capped = layout_lines(&tokens, 55.0, &opts(" | ", FlushPolicy::UnderLineCap(4)), mono);
        assert_eq!(capped, vec!["aaaa", "bbbb", "cccc", "dddd"]);

        let roomy = layout_lines(&tokens, 55.0, &opts(" | ", FlushPolicy::UnderLineCap(5)), mono);
        assert_eq!(roomy, always);
    }

    #[test]
    fn test_cap_never_drops_completed_lines() {
        let tokens = ["aaaa", "bbbb", "cccc"];
        let lines = layout_lines(&tokens, 55.0, &opts(" | ", FlushPolicy::UnderLineCap(1)), mono);
        // Completed lines survive; only the trailing buffer is subject to the cap
        assert_eq!(lines, vec!["aaaa", "bbbb"]);
    }

    #[test]
    fn test_space_separator_variant() {
        let tokens = ["the", "quick", "brown", "fox"];
        let lines = layout_lines(&tokens, 100.0, &opts(" ", FlushPolicy::Always), mono);
        assert_eq!(lines, vec!["the quick", "brown fox"]);
    }

    #[test]
    fn test_property_lines_fit_or_are_single_tokens() {
        let tokens: Vec<String> = (0..40)
            .map(|i| "x".repeat((i * 7 % 13) + 1))
            .collect();
        let token_refs: Vec<&str> = tokens.iter().map(String::as_str).collect();
        for width in [1.0, 35.0, 80.0, 150.0, 400.0] {
            let lines = layout_lines(&token_refs, width, &LineOptions::default(), mono);
            for line in &lines {
                let single = !line.contains(" | ");
                assert!(
                    mono(line) < width || single,
                    "line {line:?} is {}px at max {width}",
                    mono(line)
                );
            }
            assert_no_token_dropped(&token_refs, &lines, " | ");
        }
    }
}
