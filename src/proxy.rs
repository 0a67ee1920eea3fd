//! SOCKS5 proxy client construction.
//!
//! Builds a single `reqwest` client tunneled through a local Tor listener.
//! The primary endpoint is probed first and the fallback only if the
//! primary does not answer a SOCKS5 greeting. Probing happens once, at
//! construction time; individual requests are never re-routed.

use crate::error::{ScanError, ScanResult};
use reqwest::header::{HeaderMap, HeaderValue, CONNECTION};
use reqwest::{Client, Proxy};
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Tor Browser's SOCKS listener.
pub const TOR_BROWSER_PORT: u16 = 9150;
/// The system tor daemon's SOCKS listener.
pub const TOR_DAEMON_PORT: u16 = 9050;

/// SOCKS5 greeting offering only the "no authentication" method.
const SOCKS5_NO_AUTH_GREETING: [u8; 3] = [0x05, 0x01, 0x00];

/// Proxy endpoints and client timeouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Loopback address of the proxy.
    pub host: IpAddr,
    pub primary_port: u16,
    pub fallback_port: u16,
    /// Budget for the connect + greeting probe of each endpoint.
    pub probe_timeout: Duration,
    /// Bound on connection setup, TLS handshake included.
    pub tls_handshake_timeout: Duration,
    /// Bound on waiting for response data.
    pub response_header_timeout: Duration,
    /// Ceiling for a whole request including the body.
    pub request_timeout: Duration,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            primary_port: TOR_BROWSER_PORT,
            fallback_port: TOR_DAEMON_PORT,
            probe_timeout: Duration::from_secs(5),
            tls_handshake_timeout: Duration::from_secs(20),
            response_header_timeout: Duration::from_secs(20),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ProxyConfig {
    pub fn primary(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.primary_port)
    }

    pub fn fallback(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.fallback_port)
    }
}

/// A ready HTTP client and the proxy endpoint it is bound to.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: Client,
    endpoint: SocketAddr,
    used_fallback: bool,
}

impl ProxyClient {
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn endpoint(&self) -> SocketAddr {
        self.endpoint
    }

    /// Whether the primary endpoint was unreachable.
    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }
}

/// Builds proxy-routed clients from a [`ProxyConfig`].
#[derive(Debug, Clone)]
pub struct ProxyClientFactory {
    config: ProxyConfig,
}

impl ProxyClientFactory {
    pub fn new(config: ProxyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Probe the endpoints in order and build a client for the first one
    /// that answers.
    ///
    /// Fails with [`ScanError::ProxyUnavailable`] if neither does.
    pub async fn build(&self) -> ScanResult<ProxyClient> {
        let primary = self.config.primary();
        let fallback = self.config.fallback();

        let (endpoint, used_fallback) =
            match probe_socks5(primary, self.config.probe_timeout).await {
                Ok(()) => (primary, false),
                Err(primary_err) => {
                    warn!(
                        "Could not reach SOCKS5 proxy on {} ({}), trying {}...",
                        primary, primary_err, fallback
                    );
                    match probe_socks5(fallback, self.config.probe_timeout).await {
                        Ok(()) => (fallback, true),
                        Err(fallback_err) => {
                            return Err(ScanError::ProxyUnavailable {
                                primary,
                                fallback,
                                reason: fallback_err.to_string(),
                            });
                        }
                    }
                }
            };

        let client = self.client_for(endpoint)?;
        info!("Using SOCKS5 proxy at {}", endpoint);

        Ok(ProxyClient {
            client,
            endpoint,
            used_fallback,
        })
    }

    /// Build the HTTP client for a given proxy endpoint without probing.
    ///
    /// `socks5h` keeps hostname resolution inside the proxy, which `.onion`
    /// names require. Connections are never reused and no compression is
    /// advertised. HTTP/2 is off so TLS targets cannot negotiate a pooled,
    /// multiplexed connection through ALPN.
    pub fn client_for(&self, endpoint: SocketAddr) -> ScanResult<Client> {
        let proxy = Proxy::all(format!("socks5h://{}", endpoint))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONNECTION, HeaderValue::from_static("close"));

        let client = Client::builder()
            .proxy(proxy)
            .default_headers(headers)
            .http1_only()
            .pool_max_idle_per_host(1)
            .tcp_keepalive(None::<Duration>)
            .no_gzip()
            .no_brotli()
            .no_deflate()
            .connect_timeout(self.config.tls_handshake_timeout)
            .read_timeout(self.config.response_header_timeout)
            .timeout(self.config.request_timeout)
            .build()?;

        Ok(client)
    }
}

/// Check that `addr` accepts TCP and answers a SOCKS5 no-auth greeting.
pub async fn probe_socks5(addr: SocketAddr, budget: Duration) -> io::Result<()> {
    match timeout(budget, socks5_greet(addr)).await {
        Ok(result) => {
            debug!("SOCKS5 probe of {}: {:?}", addr, result);
            result
        }
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("probe timed out after {:?}", budget),
        )),
    }
}

async fn socks5_greet(addr: SocketAddr) -> io::Result<()> {
    let mut stream = TcpStream::connect(addr).await?;
    stream.write_all(&SOCKS5_NO_AUTH_GREETING).await?;

    let mut reply = [0u8; 2];
    stream.read_exact(&mut reply).await?;

    match reply {
        [0x05, 0x00] => Ok(()),
        [0x05, method] => Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("proxy requires SOCKS5 method {:#04x}", method),
        )),
        [version, _] => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("not a SOCKS5 proxy (version byte {:#04x})", version),
        )),
    }
}
