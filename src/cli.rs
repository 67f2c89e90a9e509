// CLI commands

use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use crate::config::{NodeConfig, DEFAULT_PORT};
use crate::consensus::DEFAULT_DIFFICULTY;
use crate::network::{api, HttpPeerClient, Node};
use crate::wallet::Wallet;

#[derive(Parser)]
#[command(name = "subnet-ledger")]
#[command(about = "Peer-replicated proof-of-work ledger", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a ledger node
    Node(NodeArgs),

    /// Create a new wallet and print its keys
    Wallet,

    /// Sign a transfer and print the request body
    Sign {
        /// Sender private key (hex)
        #[arg(long)]
        private_key: String,
        /// Recipient address
        #[arg(long)]
        recipient: String,
        /// Amount to transfer
        #[arg(long)]
        value: f64,
    },
}

#[derive(Args, Debug)]
pub struct NodeArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Dotted-quad address of this host, used for subnet scanning
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Address credited with mining rewards (a new wallet is created if omitted)
    #[arg(long)]
    pub miner_address: Option<String>,

    /// Leading hex zeros required of a block hash
    #[arg(long, default_value_t = DEFAULT_DIFFICULTY)]
    pub difficulty: usize,

    /// Seconds between mining attempts
    #[arg(long, default_value_t = 20)]
    pub mining_interval: u64,

    /// Seconds between neighbor scans
    #[arg(long, default_value_t = 20)]
    pub discovery_interval: u64,

    /// First last-octet offset to scan (inclusive)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub ip_offset_start: i16,

    /// Last last-octet offset to scan (exclusive)
    #[arg(long, default_value_t = 1, allow_hyphen_values = true)]
    pub ip_offset_end: i16,

    /// First port to scan (inclusive)
    #[arg(long, default_value_t = 5001)]
    pub port_start: u16,

    /// Last port to scan (exclusive)
    #[arg(long, default_value_t = 5004)]
    pub port_end: u16,

    /// Disable the periodic mining loop
    #[arg(long)]
    pub no_mining: bool,
}

impl NodeArgs {
    /// Map flags onto a node configuration
    pub fn to_config(&self) -> NodeConfig {
        NodeConfig {
            host: self.host.clone(),
            port: self.port,
            difficulty: self.difficulty,
            mining_interval: Duration::from_secs(self.mining_interval),
            discovery_interval: Duration::from_secs(self.discovery_interval),
            ip_offsets: self.ip_offset_start..self.ip_offset_end,
            ports: self.port_start..self.port_end,
            mining_enabled: !self.no_mining,
            ..NodeConfig::default()
        }
    }
}

/// CLI handler
#[derive(Default)]
pub struct CliHandler;

impl CliHandler {
    pub fn new() -> Self {
        Self
    }

    /// Handle CLI command
    pub async fn handle(&self, cli: Cli) -> Result<(), String> {
        match cli.command {
            Commands::Node(args) => self.run_node(args).await,
            Commands::Wallet => self.new_wallet(),
            Commands::Sign { private_key, recipient, value } => {
                self.sign(&private_key, &recipient, value)
            }
        }
    }

    /// Run a node until the HTTP server stops
    async fn run_node(&self, args: NodeArgs) -> Result<(), String> {
        let config = args.to_config();

        let miner_address = match args.miner_address {
            Some(address) => address,
            None => {
                let wallet = Wallet::generate();
                log::info!("Created miner wallet {}", wallet.address());
                println!("Miner wallet:");
                self.print_json(&wallet.info())?;
                wallet.address().to_string()
            }
        };

        let peers = HttpPeerClient::new(config.request_timeout)?;
        let node = Arc::new(Node::new(config, miner_address, Arc::new(peers)));

        let server = tokio::spawn(api::serve(Arc::clone(&node)));
        let handle = Arc::clone(&node).run().await;

        let result = match server.await {
            Ok(result) => result,
            Err(e) => Err(format!("Server task failed: {}", e)),
        };

        handle.stop().await;
        log::info!("Final chain:\n{}", node.describe_chain().await);
        result
    }

    /// Print a fresh wallet
    fn new_wallet(&self) -> Result<(), String> {
        self.print_json(&Wallet::generate().info())
    }

    /// Print a signed transfer request
    fn sign(&self, private_key: &str, recipient: &str, value: f64) -> Result<(), String> {
        let wallet = Wallet::from_private_key_hex(private_key).map_err(|e| e.to_string())?;
        self.print_json(&wallet.transfer(recipient, value))
    }

    fn print_json<T: serde::Serialize>(&self, value: &T) -> Result<(), String> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| format!("Failed to serialize output: {}", e))?;
        println!("{}", json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_args_defaults() {
        let cli = Cli::try_parse_from(["subnet-ledger", "node"]).unwrap();
        let Commands::Node(args) = cli.command else {
            panic!("Wrong command");
        };

        let config = args.to_config();
        assert_eq!(config.port, 5001);
        assert_eq!(config.difficulty, 3);
        assert_eq!(config.mining_interval, Duration::from_secs(20));
        assert_eq!(config.ip_offsets, 0..1);
        assert_eq!(config.ports, 5001..5004);
        assert!(config.mining_enabled);
    }

    #[test]
    fn test_node_args_overrides() {
        let cli = Cli::try_parse_from([
            "subnet-ledger", "node", "-p", "5002", "--host", "192.168.0.10",
            "--ip-offset-start", "-1", "--ip-offset-end", "2", "--no-mining",
        ]).unwrap();
        let Commands::Node(args) = cli.command else {
            panic!("Wrong command");
        };

        let config = args.to_config();
        assert_eq!(config.endpoint(), "192.168.0.10:5002");
        assert_eq!(config.ip_offsets, -1..2);
        assert!(!config.mining_enabled);
    }

    #[test]
    fn test_sign_command_parses() {
        let cli = Cli::try_parse_from([
            "subnet-ledger", "sign", "--private-key", "00", "--recipient", "bob", "--value", "1.5",
        ]).unwrap();
        assert!(matches!(cli.command, Commands::Sign { value, .. } if value == 1.5));
    }
}
