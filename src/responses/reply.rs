//! Control channel reply decoding

use log::debug;
use std::fmt;

use super::status_codes::{is_error, is_success};

/// A reply read from the control channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    text: String,
}

impl Reply {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Raw reply text, line terminators included
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Three digit status code at the start of the reply, if any
    pub fn code(&self) -> Option<u16> {
        let prefix = self.text.get(0..3)?;
        if !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        prefix.parse().ok()
    }

    pub fn is_success(&self) -> bool {
        self.code().is_some_and(is_success)
    }

    /// True for 4xx and 5xx replies
    pub fn is_error(&self) -> bool {
        self.code().is_some_and(is_error)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text.trim_end())
    }
}

/// Decode raw control channel bytes.
///
/// Empty input means the peer closed the connection; invalid UTF-8 is
/// treated the same way, both yield no reply.
pub fn decode_reply(bytes: &[u8]) -> Option<Reply> {
    if bytes.is_empty() {
        return None;
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => Some(Reply::new(text)),
        Err(e) => {
            debug!("Discarding reply that is not valid UTF-8: {e}");
            None
        }
    }
}

/// Length of the first complete reply held in `buf`, or `None` if more bytes
/// are needed.
///
/// A reply is either a single line or a `ddd-` block closed by a line that
/// starts with the same code followed by a space.
pub fn complete_reply_len(buf: &[u8]) -> Option<usize> {
    let first_end = line_end(buf, 0)?;
    let first = &buf[..first_end];

    let is_block =
        first.len() >= 4 && first[..3].iter().all(u8::is_ascii_digit) && first[3] == b'-';
    if !is_block {
        return Some(first_end);
    }

    let mut closing = [b' '; 4];
    closing[..3].copy_from_slice(&first[..3]);

    let mut start = first_end;
    while let Some(end) = line_end(buf, start) {
        if buf[start..end].starts_with(&closing) {
            return Some(end);
        }
        start = end;
    }
    None
}

/// Index just past the next `\n` at or after `start`
fn line_end(buf: &[u8], start: usize) -> Option<usize> {
    buf[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|pos| start + pos + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reply_code() {
        assert_eq!(Reply::new("220 Welcome\r\n").code(), Some(220));
        assert_eq!(Reply::new("230-Hello\r\n230 Done\r\n").code(), Some(230));
        assert_eq!(Reply::new("hello").code(), None);
        assert_eq!(Reply::new("22").code(), None);
    }

    #[test]
    fn test_reply_classification() {
        assert!(Reply::new("226 Transfer complete\r\n").is_success());
        assert!(Reply::new("550 No such file\r\n").is_error());
        assert!(Reply::new("425 Can't open data connection\r\n").is_error());
        assert!(!Reply::new("150 Opening data connection\r\n").is_error());
        assert!(!Reply::new("garbage").is_error());
    }

    #[test]
    fn test_display_trims_line_terminator() {
        assert_eq!(Reply::new("257 \"/\"\r\n").to_string(), "257 \"/\"");
    }

    #[test]
    fn test_decode_reply() {
        assert_eq!(decode_reply(b""), None);
        assert_eq!(decode_reply(&[0xff, 0xfe, 0x32]), None);
        assert_eq!(decode_reply(b"200 OK\r\n"), Some(Reply::new("200 OK\r\n")));
    }

    #[test]
    fn test_complete_reply_single_line() {
        assert_eq!(complete_reply_len(b"200 OK\r\n"), Some(8));
        assert_eq!(complete_reply_len(b"200 OK\r\n226 Done\r\n"), Some(8));
        assert_eq!(complete_reply_len(b"200 OK"), None);
    }

    #[test]
    fn test_complete_reply_block() {
        let block = b"211-Features:\r\n PASV\r\n SIZE\r\n211 End\r\n150 next\r\n";
        assert_eq!(complete_reply_len(block), Some(38));
        assert_eq!(complete_reply_len(b"211-Features:\r\n PASV\r\n"), None);
        // a different code inside the block does not close it
        assert_eq!(
            complete_reply_len(b"230-Welcome\r\n200 inner\r\n230 Ok\r\n"),
            Some(32)
        );
    }

    #[test]
    fn test_complete_reply_non_conforming_line() {
        assert_eq!(complete_reply_len(b"hello there\n"), Some(12));
    }
}
