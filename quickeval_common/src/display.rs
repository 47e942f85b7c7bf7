//! Text helpers for table cells.

/// Format a number with thousands separators and two decimals, e.g. `-1,234.50`.
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.2}", value);
    let (sign, digits) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Greedy word wrap applied to each line of `text`.
///
/// Existing line breaks (including blank lines) are kept; words longer than
/// `width` get a line of their own.
pub fn wrap_text(text: &str, width: usize) -> String {
    let mut lines = Vec::new();

    for line in text.lines() {
        let mut current: Vec<&str> = Vec::new();
        let mut current_len = 0;

        for word in line.split_whitespace() {
            let word_len = word.chars().count();
            if current.is_empty() || current_len + word_len <= width {
                current.push(word);
                current_len += word_len + 1;
            } else {
                lines.push(current.join(" "));
                current = vec![word];
                current_len = word_len + 1;
            }
        }
        lines.push(current.join(" "));
    }

    lines.join("\n")
}
