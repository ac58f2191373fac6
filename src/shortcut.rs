// ── Desktop shortcut naming ───────────────────────────────────────────────────
//
// String handling for `create_desktop_shortcut`.  The COM side lives in
// `platform::win32::shortcut`.

/// Characters Windows rejects in a file name.
const ILLEGAL: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Replace every character that cannot appear in a file name with `_`.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if ILLEGAL.contains(&c) || c.is_control() { '_' } else { c })
        .collect()
}

/// `"<title>.lnk"` with the title sanitised.
pub fn shortcut_file_name(title: &str) -> String {
    format!("{}.lnk", sanitize_title(title))
}

/// Normalise slashes to backslashes and wrap in double quotes, so the target
/// receives the path as one argument even when it contains spaces.
pub fn quote_argument(path: &str) -> String {
    format!("\"{}\"", path.replace('/', "\\"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_illegal_character_becomes_underscore() {
        assert_eq!(sanitize_title(r#"a\b/c:d*e?f"g<h>i|j"#), "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn ordinary_titles_are_untouched() {
        assert_eq!(sanitize_title("My Project (2024) – draft"), "My Project (2024) – draft");
    }

    #[test]
    fn control_characters_are_replaced() {
        assert_eq!(sanitize_title("tab\there"), "tab_here");
    }

    #[test]
    fn file_name_gets_lnk_extension() {
        assert_eq!(shortcut_file_name("Notes: Q3"), "Notes_ Q3.lnk");
    }

    #[test]
    fn argument_slashes_are_normalised_and_quoted() {
        assert_eq!(
            quote_argument("C:/Users/me/My Documents/notes.db"),
            r#""C:\Users\me\My Documents\notes.db""#
        );
    }
}
