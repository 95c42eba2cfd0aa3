//! Sanitizing server text before it reaches the terminal.
//!
//! Replies, previews and sources come from a remote server (and ultimately a
//! language model). Escape sequences in them would be interpreted by the
//! terminal, so they are removed before rendering.

/// Strips ANSI escape sequences and control characters from a string
///
/// Removes CSI sequences (`ESC [ ... letter`: colors, cursor movement,
/// screen clears), OSC sequences (`ESC ] ... BEL` or `ESC ] ... ESC \`:
/// window titles, hyperlinks) and any other control character except tab,
/// newline and carriage return.
///
/// # Examples
///
/// ```
/// use medigenius_chat::utils::terminal::strip_ansi_codes;
///
/// let text = "\x1b[31mTake with food\x1b[0m";
/// assert_eq!(strip_ansi_codes(text), "Take with food");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    // Parameters run until the final letter
                    for next_ch in chars.by_ref() {
                        if next_ch.is_ascii_alphabetic() {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    // Terminated by BEL or ST (ESC \)
                    while let Some(next_ch) = chars.next() {
                        if next_ch == '\x07' {
                            break;
                        }
                        if next_ch == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
            continue;
        }

        if ch.is_control() && ch != '\t' && ch != '\n' && ch != '\r' {
            continue;
        }

        result.push(ch);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_removed() {
        let text = "\x1b[1m\x1b[31mWarning:\x1b[0m see a doctor";
        assert_eq!(strip_ansi_codes(text), "Warning: see a doctor");
    }

    #[test]
    fn test_screen_clear_removed() {
        assert_eq!(strip_ansi_codes("\x1b[2J\x1b[HRest"), "Rest");
    }

    #[test]
    fn test_osc_title_removed() {
        assert_eq!(strip_ansi_codes("\x1b]0;pwned\x07Hydrate"), "Hydrate");
        assert_eq!(strip_ansi_codes("\x1b]8;;http://x\x1b\\link"), "link");
    }

    #[test]
    fn test_control_characters_removed() {
        assert_eq!(strip_ansi_codes("Alert\x07 back\x08"), "Alert back");
    }

    #[test]
    fn test_whitespace_and_unicode_kept() {
        let text = "Line 1\nLine 2\r\tTabbed 🩺";
        assert_eq!(strip_ansi_codes(text), text);
    }

    #[test]
    fn test_lone_escape_dropped() {
        assert_eq!(strip_ansi_codes("a\x1bb"), "ab");
        assert_eq!(strip_ansi_codes(""), "");
    }
}
