use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "saferoute-server",
    version,
    about = "Store and serve geotagged safety reviews"
)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, env = "SAFEROUTE_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// SQLite database file. Reviews are kept in memory when omitted.
    #[arg(long, env = "SAFEROUTE_DATABASE")]
    pub database: Option<PathBuf>,

    /// Webhook receiving a POST for every new review
    #[arg(long, env = "SAFEROUTE_NOTIFY_URL")]
    pub notify_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub database: Option<PathBuf>,
    pub notify_url: Option<String>,
}

impl ServerConfig {
    /// In-memory store on a free local port, without notifications.
    pub fn ephemeral() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 0)),
            database: None,
            notify_url: None,
        }
    }
}

impl From<ServerArgs> for ServerConfig {
    fn from(args: ServerArgs) -> Self {
        Self {
            bind: args.bind,
            database: args.database,
            notify_url: args.notify_url.filter(|url| !url.trim().is_empty()),
        }
    }
}
