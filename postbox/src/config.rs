use crate::service::PayloadPolicy;
use crate::store::CorruptionPolicy;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "postbox", version, about = "Serve posts from a JSON file")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "POSTBOX_ADDR", default_value = "0.0.0.0:3000")]
    pub addr: SocketAddr,
    /// JSON file holding the posts, created on startup if missing
    #[arg(long, env = "POSTBOX_DATA_FILE", default_value = "posts.json")]
    pub data_file: PathBuf,
    /// Reject create requests whose body is not a valid post
    #[arg(long, env = "POSTBOX_STRICT_PAYLOADS")]
    pub strict_payloads: bool,
    /// Fail requests when the data file is corrupt instead of starting over
    #[arg(long, env = "POSTBOX_REJECT_CORRUPT")]
    pub reject_corrupt: bool,
}

impl Config {
    pub fn payload_policy(&self) -> PayloadPolicy {
        if self.strict_payloads {
            PayloadPolicy::Strict
        } else {
            PayloadPolicy::Lenient
        }
    }

    pub fn corruption_policy(&self) -> CorruptionPolicy {
        if self.reject_corrupt {
            CorruptionPolicy::Reject
        } else {
            CorruptionPolicy::Recover
        }
    }
}
