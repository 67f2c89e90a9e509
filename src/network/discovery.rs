// Neighbor discovery by scanning the local /24 subnet

use crate::core::LedgerError;
use std::net::Ipv4Addr;
use std::ops::Range;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::task::JoinSet;

/// Parse a dotted-quad IPv4 host
pub fn parse_host(host: &str) -> Result<Ipv4Addr, LedgerError> {
    host.parse::<Ipv4Addr>()
        .map_err(|_| LedgerError::MalformedHostAddress(host.to_string()))
}

/// Check whether something accepts TCP connections at `host:port`
pub async fn probe(host: &str, port: u16, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            log::debug!("Probe {}:{} failed: {}", host, port, e);
            false
        }
        Err(_) => {
            log::debug!("Probe {}:{} timed out", host, port);
            false
        }
    }
}

/// Scan `ports` × `ip_offsets` around `self_host` and return every reachable
/// endpoint other than this node's own.
///
/// Candidates keep the /24 prefix of `self_host`; the last octet is shifted by
/// each offset and candidates outside 0..=255 are skipped. Results are ordered
/// by port, then offset.
pub async fn discover_neighbors(
    self_host: &str,
    self_port: u16,
    ip_offsets: Range<i16>,
    ports: Range<u16>,
    probe_timeout: Duration,
) -> Result<Vec<String>, LedgerError> {
    let ip = parse_host(self_host)?;
    let [a, b, c, last] = ip.octets();
    let self_endpoint = format!("{}:{}", self_host, self_port);

    let mut probes = JoinSet::new();
    let mut order = 0usize;

    for port in ports {
        for offset in ip_offsets.clone() {
            let Some(octet) = i16::from(last).checked_add(offset) else {
                continue;
            };
            let Ok(octet) = u8::try_from(octet) else {
                continue;
            };

            let host = Ipv4Addr::new(a, b, c, octet).to_string();
            let endpoint = format!("{}:{}", host, port);
            if endpoint == self_endpoint {
                continue;
            }

            let index = order;
            order += 1;
            probes.spawn(async move {
                let reachable = probe(&host, port, probe_timeout).await;
                (index, endpoint, reachable)
            });
        }
    }

    let mut found = Vec::new();
    while let Some(joined) = probes.join_next().await {
        match joined {
            Ok((index, endpoint, true)) => found.push((index, endpoint)),
            Ok(_) => {}
            Err(e) => log::error!("Probe task failed: {}", e),
        }
    }

    found.sort_by_key(|(index, _)| *index);
    Ok(found.into_iter().map(|(_, endpoint)| endpoint).collect())
}
