//! Clap derive structures for the `omada-exporter` binary.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Default scrape listener, all interfaces on port 6779.
pub const DEFAULT_LISTEN: &str = "0.0.0.0:6779";

const CONFIG_HELP: &str = "\
Configuration:
  Use either --config <file> with a YAML file like this:

    path: https://192.168.255.123:8043/
    user: admin
    pass: foo
    secure: false

  Or configure via environment variables:

    OMADA_PATH=https://192.168.255.123:8043/
    OMADA_USER=admin
    OMADA_PASS=foo
    OMADA_SECURE=false

  Optional settings: ca_cert / OMADA_CA_CERT, timeout / OMADA_TIMEOUT (seconds).";

/// omada-exporter -- Prometheus metrics for Omada wireless stations
#[derive(Debug, Parser)]
#[command(
    name = "omada-exporter",
    version,
    about = "Connect to a TP-Link Omada controller and expose wireless station metrics",
    after_help = CONFIG_HELP
)]
pub struct Cli {
    /// Path to a YAML config file
    #[arg(long, short = 'c', env = "OMADA_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Listen address for the metrics endpoint (`:6779` binds all interfaces)
    #[arg(
        long,
        value_name = "ADDR",
        default_value = DEFAULT_LISTEN,
        value_parser = parse_listen_addr
    )]
    pub http: SocketAddr,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

/// Accept a full socket address or a bare `:port`.
fn parse_listen_addr(raw: &str) -> Result<SocketAddr, String> {
    if let Some(port) = raw.strip_prefix(':') {
        let port: u16 = port
            .parse()
            .map_err(|e| format!("invalid port {port:?}: {e}"))?;
        return Ok(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)));
    }
    raw.parse()
        .map_err(|e| format!("invalid listen address {raw:?}: {e}"))
}
