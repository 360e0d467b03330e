//! CLI interface for the utilstat server
//!
//! # Example
//!
//! ```bash
//! # Serve on the default address
//! utilstat
//!
//! # Bind elsewhere, quiet logging
//! utilstat --host 0.0.0.0 --port 9000 --quiet
//! ```

use clap::Parser;
use std::net::{IpAddr, SocketAddr};

/// Utility usage analytics service
#[derive(Parser, Debug, Clone)]
#[command(name = "utilstat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", env = "UTILSTAT_HOST")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', default_value_t = 8080, env = "PORT")]
    pub port: u16,

    /// Only log warnings and errors
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl Cli {
    /// Socket address the server binds to
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
