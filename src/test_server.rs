//! Loopback FTP stub used by the protocol tests
//!
//! Each stub accepts exactly one control connection and runs a script
//! against it on its own thread. Every command line the client sends is
//! recorded verbatim, CRLF included, and handed back by [`StubServer::join`].

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

pub struct StubServer {
    addr: SocketAddr,
    handle: JoinHandle<Vec<String>>,
}

impl StubServer {
    pub fn spawn<F>(script: F) -> Self
    where
        F: FnOnce(&mut StubConn) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut conn = StubConn {
                reader: BufReader::new(stream.try_clone().unwrap()),
                writer: stream,
                received: Vec::new(),
            };
            script(&mut conn);
            conn.received
        });

        Self { addr, handle }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Wait for the script to finish; panics if the script panicked
    pub fn join(self) -> Vec<String> {
        self.handle.join().expect("stub server script failed")
    }
}

pub struct StubConn {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    received: Vec<String>,
}

impl StubConn {
    /// Write one reply line
    pub fn reply(&mut self, text: &str) {
        self.send_raw(format!("{text}\r\n").as_bytes());
    }

    pub fn send_raw(&mut self, bytes: &[u8]) {
        self.writer.write_all(bytes).unwrap();
        self.writer.flush().unwrap();
    }

    /// Read one command line, without its terminator
    pub fn read_command(&mut self) -> String {
        let mut line = String::new();
        self.reader.read_line(&mut line).unwrap();
        self.received.push(line.clone());
        line.trim_end_matches("\r\n").to_string()
    }

    pub fn expect(&mut self, command: &str) {
        assert_eq!(self.read_command(), command);
    }

    /// Greeting plus the `TYPE I` exchange done by every connect
    pub fn greet(&mut self) {
        self.reply("220 stub ready");
        self.expect("TYPE I");
        self.reply("200 Switching to Binary mode.");
    }

    /// Answer a PASV command and return the listener for the data connection
    pub fn passive(&mut self) -> TcpListener {
        self.expect("PASV");
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        self.reply(&format!(
            "227 Entering Passive Mode (127,0,0,1,{},{}).",
            port >> 8,
            port & 0xff
        ));
        listener
    }

    /// Accept a data connection and send `payload` over it
    pub fn send_data(listener: &TcpListener, payload: &[u8]) {
        let (mut data, _) = listener.accept().unwrap();
        data.write_all(payload).unwrap();
    }

    /// Accept a data connection and read it until the client closes it
    pub fn receive_data(listener: &TcpListener) -> Vec<u8> {
        let (mut data, _) = listener.accept().unwrap();
        let mut payload = Vec::new();
        data.read_to_end(&mut payload).unwrap();
        payload
    }
}
