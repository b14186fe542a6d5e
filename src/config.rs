use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::connection::ReplyMode;
use crate::error::{ClientError, Result};
use crate::session::SessionOptions;
use crate::transfer::FsStore;

/// Config file looked up in the working directory when `-c` is not given
const DEFAULT_CONFIG_FILE: &str = "minftp";
const ENV_PREFIX: &str = "MINFTP";

/// Command line arguments
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "minftp", about = "Minimal interactive FTP client")]
pub struct CliArgs {
    /// FTP server address
    #[arg(short = 'i', long = "ip", value_name = "IP_ADDRESS")]
    pub host: Option<String>,

    /// FTP server control port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Local directory used for downloads and uploads
    #[arg(short = 'd', long, value_name = "DIR")]
    pub local_dir: Option<String>,

    /// How control channel replies are read: "single" or "complete"
    #[arg(long, value_name = "MODE")]
    pub reply_mode: Option<String>,
}

/// Configuration for the minftp client
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// FTP server hostname or IP address
    pub host: String,

    /// FTP server control port
    pub port: u16,

    /// Local directory for file operations
    pub local_directory: String,

    /// Socket timeout in seconds, 0 blocks forever
    pub timeout_secs: u64,

    /// Control channel reply framing
    pub reply_mode: ReplyMode,

    /// Longest user name or password accepted at the login prompt
    pub max_credential_length: usize,

    /// Longest command line accepted at the `ftp>` prompt
    pub max_command_length: usize,
}

impl ClientConfig {
    /// Build the configuration from defaults, the config file, `MINFTP_*`
    /// environment variables and finally the command line.
    pub fn load(args: &CliArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .set_default("port", 21)?
            .set_default("local_directory", ".")?
            .set_default("timeout_secs", 0)?
            .set_default("reply_mode", "complete")?
            .set_default("max_credential_length", 128)?
            .set_default("max_command_length", 256)?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override_option("host", args.host.clone())?
            .set_override_option("port", args.port.map(i64::from))?
            .set_override_option("local_directory", args.local_dir.clone())?
            .set_override_option("reply_mode", args.reply_mode.clone())?
            .build()?;

        let host_missing = match settings.get_string("host") {
            Ok(host) => host.trim().is_empty(),
            Err(_) => true,
        };
        if host_missing {
            return Err(ClientError::Config("no IP address supplied".to_string()));
        }

        let config: ClientConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the basic configuration
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ClientError::Config("Host cannot be empty".to_string()));
        }

        if self.port == 0 {
            return Err(ClientError::Config("Port cannot be 0".to_string()));
        }

        if !Path::new(&self.local_directory).is_dir() {
            return Err(ClientError::Config(format!(
                "Local directory '{}' does not exist",
                self.local_directory
            )));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            timeout: self.timeout(),
            reply_mode: self.reply_mode,
        }
    }

    pub fn local_store(&self) -> FsStore {
        FsStore::new(&self.local_directory)
    }

    /// Server address as shown to the operator
    pub fn display_name(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl std::fmt::Display for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "minftp config - Server: {}, Timeout: {}s, Reply mode: {}, Local Dir: {}",
            self.display_name(),
            self.timeout_secs,
            self.reply_mode,
            self.local_directory
        )
    }
}
