use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

/// JSON-RPC tool server for upstream sports data.
#[derive(Debug, Parser)]
#[command(name = "pressbox", version)]
pub struct Args {
    /// Path to the TOML configuration file. Defaults plus environment
    /// overrides apply when omitted.
    #[arg(short, long, env = "PRESSBOX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen address override, e.g. 127.0.0.1:8000.
    #[arg(short, long)]
    pub listen_address: Option<SocketAddr>,

    /// Log filter, e.g. "info" or "server=debug,tools=debug".
    #[arg(long, env = "PRESSBOX_LOG", default_value = "info")]
    pub log: String,
}
