//! Text measurement and truncation.

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Truncate to fit `max_px` and add a single ellipsis if needed.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        out.push(ch);
        if estimate_text_width_px(&out, font_px) + estimate_text_width_px("…", font_px) > max_px {
            out.pop();
            break;
        }
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_to_width("Kenya", 10, 200), "Kenya");
    }

    #[test]
    fn long_text_gets_one_ellipsis() {
        let t = truncate_to_width("Democratic Republic of the Congo", 10, 60);
        assert!(t.ends_with('…'));
        assert!(estimate_text_width_px(&t, 10) <= 60);
    }
}
