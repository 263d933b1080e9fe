use super::enums::Mode;

/// Format a countdown as "MM:SS"
///
/// Minutes are not clamped: 3661 seconds renders as "61:01".
pub fn format_seconds(total: u32) -> String {
    let minutes = total / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Parse user-edited timer text back to seconds
///
/// Everything except digits and colons is stripped first.
/// - "MM:SS" clamps each group to 0..=59
/// - "MM" clamps minutes to 0..=99
/// - anything else falls back to the mode's default duration
pub fn parse_user_input(text: &str, mode: Mode) -> u32 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ':')
        .collect();

    let groups: Vec<&str> = cleaned.split(':').collect();
    match groups.as_slice() {
        [minutes, seconds] => match (parse_group(minutes), parse_group(seconds)) {
            (Some(m), Some(s)) => m.min(59) * 60 + s.min(59),
            _ => mode.default_seconds(),
        },
        [minutes] => match parse_group(minutes) {
            Some(m) => m.min(99) * 60,
            None => mode.default_seconds(),
        },
        _ => mode.default_seconds(),
    }
}

/// Parse one digit group, saturating instead of overflowing on long input
fn parse_group(group: &str) -> Option<u32> {
    if group.is_empty() {
        return None;
    }
    Some(group.chars().fold(0u32, |acc, c| {
        let digit = c.to_digit(10).unwrap_or(0);
        acc.saturating_mul(10).saturating_add(digit)
    }))
}
