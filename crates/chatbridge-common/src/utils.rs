//! Shared text and time helpers.

/// Formats a number of seconds as a clock string.
///
/// Hours are only shown when non-zero, in which case minutes are padded to
/// two digits: `5` → `0:05`, `75` → `1:15`, `3725` → `1:02:05`.
pub fn format_clock(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Uppercases the first character of a string.
pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Returns the first line of a possibly multi-line message.
pub fn first_line(input: &str) -> &str {
    input.lines().next().unwrap_or_default()
}

/// Replaces line breaks with spaces so the text fits on one line.
pub fn single_line(input: &str) -> String {
    input.split(['\r', '\n']).filter(|part| !part.is_empty()).collect::<Vec<_>>().join(" ")
}

/// Greedily wraps words into lines no longer than `width` characters.
///
/// A single word longer than `width` gets a line of its own.
pub fn wrap_words(message: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in message.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}
