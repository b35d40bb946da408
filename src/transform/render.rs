// src/transform/render.rs
//
// Inbound renderer: bytes from the port -> display text. Never fails.

/// Render a chunk of received bytes for display.
pub fn render_inbound(raw: &[u8], hex_mode: bool, show_control_chars: bool) -> String {
    if hex_mode {
        return hex_render(raw);
    }
    let text = String::from_utf8_lossy(raw);
    if show_control_chars {
        escape_control_chars(&text)
    } else {
        filter_control_chars(&text)
    }
}

/// Format bytes as uppercase hex pairs separated by single spaces ("A1 0A").
pub fn hex_render(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<String>>()
        .join(" ")
}

/// Below 0x20, except the whitespace a terminal lays out itself.
fn is_control(ch: char) -> bool {
    (ch as u32) < 0x20 && !matches!(ch, '\n' | '\r' | '\t')
}

/// Replace control characters with a visible `\xHH` escape.
pub fn escape_control_chars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if is_control(ch) {
            out.push_str(&format!("\\x{:02x}", ch as u32));
        } else {
            out.push(ch);
        }
    }
    out
}

/// Drop control characters, keeping newline, carriage return and tab.
pub fn filter_control_chars(input: &str) -> String {
    input.chars().filter(|ch| !is_control(*ch)).collect()
}
