//! FTP reply handling
//!
//! Replies are mostly opaque text shown to the operator. The only structure
//! we look for is the status code and the PASV endpoint tuple.

pub mod pasv;
pub mod reply;
pub mod status_codes;

// Re-export main types
pub use pasv::{DataEndpoint, parse_pasv_reply};
pub use reply::{Reply, complete_reply_len, decode_reply};
pub use status_codes::*;
