//! PASV reply parsing

use lazy_regex::{Lazy, Regex, lazy_regex};
use log::{debug, trace};
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// Matches `(h1,h2,h3,h4,p1,p2)` anywhere in a PASV reply
static PASV_TUPLE_RE: Lazy<Regex> = lazy_regex!(r"\((\d+),(\d+),(\d+),(\d+),(\d+),(\d+)\)");

/// Address announced by the server for the next data connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataEndpoint {
    pub ip: Ipv4Addr,
    pub port: u16,
}

impl DataEndpoint {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.ip, self.port))
    }
}

impl fmt::Display for DataEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

/// Extract the data endpoint from a PASV reply.
///
/// Every field must fit in a byte; anything else is treated like a missing
/// tuple.
pub fn parse_pasv_reply(text: &str) -> Option<DataEndpoint> {
    let Some(caps) = PASV_TUPLE_RE.captures(text) else {
        debug!("No address tuple in PASV reply: {}", text.trim_end());
        return None;
    };

    let mut fields = [0u8; 6];
    for (i, field) in fields.iter_mut().enumerate() {
        match caps[i + 1].parse::<u8>() {
            Ok(value) => *field = value,
            Err(_) => {
                debug!("PASV field {} out of range: {}", i + 1, &caps[i + 1]);
                return None;
            }
        }
    }

    let ip = Ipv4Addr::new(fields[0], fields[1], fields[2], fields[3]);
    let port = (u16::from(fields[4]) << 8) | u16::from(fields[5]);
    trace!("Parsed PASV endpoint {ip}:{port}");

    Some(DataEndpoint { ip, port })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_standard_reply() {
        let endpoint = parse_pasv_reply("227 Entering Passive Mode (192,168,1,5,200,13).").unwrap();
        assert_eq!(endpoint.ip, Ipv4Addr::new(192, 168, 1, 5));
        assert_eq!(endpoint.port, 51213);
        assert_eq!(endpoint.to_string(), "192.168.1.5:51213");
    }

    #[test]
    fn test_parse_with_surrounding_text() {
        let endpoint =
            parse_pasv_reply("227 ok, connect to (127,0,0,1,4,1) please\r\n").unwrap();
        assert_eq!(endpoint.socket_addr(), "127.0.0.1:1025".parse().unwrap());
    }

    #[test]
    fn test_missing_tuple() {
        assert_eq!(parse_pasv_reply("500 Command not understood"), None);
        assert_eq!(parse_pasv_reply("227 Entering Passive Mode (1,2,3,4,5)"), None);
        assert_eq!(parse_pasv_reply("227 (a,b,c,d,e,f)"), None);
    }

    #[test]
    fn test_out_of_range_fields_rejected() {
        assert_eq!(parse_pasv_reply("227 (300,0,0,1,4,1)"), None);
        assert_eq!(parse_pasv_reply("227 (10,0,0,1,256,1)"), None);
    }
}
