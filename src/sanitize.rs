//! Operator input sanitizing
//!
//! Anything typed by the operator that ends up inside a command line
//! (user name, password, remote file names, directory paths) goes through
//! [`sanitize_input`] first, so it can never smuggle a CRLF or another
//! control byte onto the control channel.

use lazy_regex::{Lazy, Regex, lazy_regex};

/// One letter, mark, number or punctuation character. Symbols such as `$`,
/// `+` and `|` never match, nor do separators or control characters.
static ALLOWED_CHAR_RE: Lazy<Regex> = lazy_regex!(r"[\p{L}\p{M}\p{N}\p{P}]");

/// Keep only letters, marks, numbers and punctuation, in their original order.
pub fn sanitize_input(input: &str) -> String {
    ALLOWED_CHAR_RE
        .find_iter(input)
        .map(|m| m.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strips_crlf_and_spaces() {
        assert_eq!(sanitize_input("ad min"), "admin");
        assert_eq!(sanitize_input("pa\r\nss"), "pass");
        assert_eq!(sanitize_input("file.txt\r\nDELE x"), "file.txtDELEx");
    }

    #[test]
    fn test_strips_control_bytes() {
        let dirty = "a\u{0}b\u{1b}[31mc\td\u{7f}";
        let clean = sanitize_input(dirty);
        assert!(!clean.chars().any(char::is_control));
        assert_eq!(clean, "ab[31mcd");
    }

    #[test]
    fn test_keeps_paths_and_punctuation() {
        assert_eq!(sanitize_input("/pub/my-file_1.tar.gz"), "/pub/my-file_1.tar.gz");
        assert_eq!(sanitize_input("user@host"), "user@host");
        assert_eq!(sanitize_input("café"), "café");
    }

    #[test]
    fn test_keeps_unicode_punctuation_and_marks() {
        assert_eq!(sanitize_input("¿qué?«x»—y…"), "¿qué?«x»—y…");
        assert_eq!(sanitize_input("cafe\u{301}"), "cafe\u{301}");
        assert_eq!(sanitize_input("résumé 2024.pdf"), "résumé2024.pdf");
        assert_eq!(sanitize_input("日本語\u{3000}ファイル"), "日本語ファイル");
    }

    #[test]
    fn test_drops_symbols() {
        assert_eq!(sanitize_input("a+b=c$d|e~f<g>h^i`j"), "abcdefghij");
    }

    #[test]
    fn test_result_is_subsequence_and_idempotent() {
        let inputs = [
            "",
            "\r\n",
            "RETR x\r\nDELE y",
            "  spaced   out  ",
            "\u{0}\u{1}\u{2}weird\u{85}",
        ];
        for input in inputs {
            let once = sanitize_input(input);
            assert_eq!(sanitize_input(&once), once);

            let mut rest = input.chars();
            for c in once.chars() {
                assert!(rest.any(|orig| orig == c), "{once:?} not in {input:?}");
            }
        }
    }
}
