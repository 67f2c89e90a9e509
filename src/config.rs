// Node configuration

use crate::consensus::DEFAULT_DIFFICULTY;
use std::ops::Range;
use std::time::Duration;

/// Default port a node listens on
pub const DEFAULT_PORT: u16 = 5001;

/// Runtime settings consumed by the node
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Address this node advertises and scans around (dotted quad)
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Leading hex zeros required of each block
    pub difficulty: usize,
    /// Pause between the end of one mining attempt and the next
    pub mining_interval: Duration,
    /// Pause between the end of one discovery cycle and the next
    pub discovery_interval: Duration,
    /// Offsets added to the last octet of `host` while scanning
    pub ip_offsets: Range<i16>,
    /// Ports probed on every candidate host
    pub ports: Range<u16>,
    /// Connection timeout of a single discovery probe
    pub probe_timeout: Duration,
    /// Timeout of outbound peer requests
    pub request_timeout: Duration,
    /// Run the periodic mining loop
    pub mining_enabled: bool,
}

impl NodeConfig {
    /// `host:port` of this node as neighbors see it
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            difficulty: DEFAULT_DIFFICULTY,
            mining_interval: Duration::from_secs(20),
            discovery_interval: Duration::from_secs(20),
            ip_offsets: 0..1,
            ports: 5001..5004,
            probe_timeout: Duration::from_secs(1),
            request_timeout: Duration::from_secs(3),
            mining_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NodeConfig::default();
        assert_eq!(config.difficulty, 3);
        assert_eq!(config.mining_interval, Duration::from_secs(20));
        assert_eq!(config.discovery_interval, Duration::from_secs(20));
        assert_eq!(config.endpoint(), "127.0.0.1:5001");
    }
}
