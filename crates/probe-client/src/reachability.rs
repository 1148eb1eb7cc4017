// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Reachability via a raw TCP connect.
//!
//! A successful three-way handshake with a public resolver (by default
//! `8.8.8.8:53`) is the cheapest reliable signal that packets leave the
//! local network. Nothing is sent over the socket; it is dropped as soon
//! as the connect completes.

use crate::{ProbeError, ReachabilityProbe};
use std::io::ErrorKind;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// TCP-connect reachability client.
#[derive(Debug, Clone)]
pub struct TcpReachability {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpReachability {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Returns the probed target as `host:port`.
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Attempts a connection to every resolved address in turn and returns
    /// the first one that accepts.
    pub fn try_connect(&self) -> Result<SocketAddr, ProbeError> {
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| ProbeError::Resolve {
                target: self.target(),
                detail: e.to_string(),
            })?
            .collect();

        if addrs.is_empty() {
            return Err(ProbeError::Resolve {
                target: self.target(),
                detail: "no addresses returned".to_string(),
            });
        }

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(_) => return Ok(addr),
                Err(e) => last_err = Some(e),
            }
        }

        Err(match last_err {
            Some(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                ProbeError::Timeout {
                    probe: "reachability",
                    after: self.timeout,
                }
            }
            Some(e) => ProbeError::Connect {
                target: self.target(),
                detail: e.to_string(),
            },
            None => ProbeError::Connect {
                target: self.target(),
                detail: "no connection attempted".to_string(),
            },
        })
    }
}

impl ReachabilityProbe for TcpReachability {
    fn probe(&mut self) -> bool {
        match self.try_connect() {
            Ok(addr) => {
                tracing::trace!("reachable via {addr}");
                true
            }
            Err(e) => {
                tracing::debug!("unreachable: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_reachable_local_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let mut probe = TcpReachability::new("127.0.0.1", port, Duration::from_secs(1));
        assert!(probe.probe());
    }

    #[test]
    fn test_closed_port_is_unreachable() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let probe = TcpReachability::new("127.0.0.1", port, Duration::from_secs(1));
        assert!(probe.try_connect().is_err());
        assert!(!probe.clone().probe());
    }

    #[test]
    fn test_unresolvable_host() {
        let probe = TcpReachability::new("host.invalid", 53, Duration::from_millis(500));
        let err = probe.try_connect().unwrap_err();
        assert!(matches!(err, ProbeError::Resolve { .. }));
    }

    #[test]
    fn test_target_format() {
        let probe = TcpReachability::new("8.8.8.8", 53, Duration::from_secs(3));
        assert_eq!(probe.target(), "8.8.8.8:53");
    }
}
