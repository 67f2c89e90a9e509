//! Integration tests for the node's HTTP endpoints

use axum_test::TestServer;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use subnet_ledger::network::api::router;
use subnet_ledger::{Block, HttpPeerClient, Node, NodeConfig, TransactionRequest, Wallet, WalletInfo};

fn test_node(miner: &Wallet) -> Arc<Node> {
    let config = NodeConfig {
        difficulty: 2,
        ports: 0..0,
        ..NodeConfig::default()
    };
    let peers = HttpPeerClient::new(Duration::from_millis(200)).expect("Failed to build client");
    Arc::new(Node::new(config, miner.address(), Arc::new(peers)))
}

#[tokio::test]
async fn test_chain_starts_at_genesis() {
    let miner = Wallet::generate();
    let server = TestServer::new(router(test_node(&miner))).expect("Failed to create test server");

    let response = server.get("/chain").await;
    assert_eq!(response.status_code(), 200);

    let json: Value = response.json();
    let chain: Vec<Block> = serde_json::from_value(json["chain"].clone()).unwrap();
    assert_eq!(chain.len(), 1);
    assert!(chain[0].is_genesis());
}

#[tokio::test]
async fn test_mine_and_transfer_flow() {
    let miner = Wallet::generate();
    let recipient = Wallet::generate();
    let server = TestServer::new(router(test_node(&miner))).expect("Failed to create test server");

    // Mine once so the miner can pay
    let response = server.get("/mine").await;
    assert_eq!(response.status_code(), 200);

    let response = server
        .get("/amount")
        .add_query_param("blockchain_address", miner.address())
        .await;
    let json: Value = response.json();
    assert_eq!(json["amount"], 1.0);

    // Submit a signed transfer
    let request = miner.transfer(recipient.address(), 0.25);
    let response = server.post("/transactions").json(&request).await;
    assert_eq!(response.status_code(), 201);

    let json: Value = server.get("/transactions").await.json();
    assert_eq!(json["length"], 1);
    assert_eq!(json["transactions"][0]["recipient_blockchain_address"], recipient.address());

    server.get("/mine").await;

    let json: Value = server
        .get("/amount")
        .add_query_param("blockchain_address", recipient.address())
        .await
        .json();
    assert_eq!(json["amount"], 0.25);

    let json: Value = server.get("/chain").await.json();
    assert_eq!(json["chain"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_bad_signature_is_rejected() {
    let miner = Wallet::generate();
    let server = TestServer::new(router(test_node(&miner))).expect("Failed to create test server");
    server.get("/mine").await;

    let mut request = miner.transfer("someone", 0.5);
    request.value = 0.75;

    let response = server.post("/transactions").json(&request).expect_failure().await;
    assert_eq!(response.status_code(), 400);

    let json: Value = server.get("/transactions").await.json();
    assert_eq!(json["length"], 0);
}

#[tokio::test]
async fn test_relayed_transaction_and_pool_clear() {
    let miner = Wallet::generate();
    let server = TestServer::new(router(test_node(&miner))).expect("Failed to create test server");
    server.get("/mine").await;

    let response = server
        .put("/transactions")
        .json(&miner.transfer("someone", 0.5))
        .await;
    assert_eq!(response.status_code(), 200);

    let json: Value = server.get("/transactions").await.json();
    assert_eq!(json["length"], 1);

    let response = server.delete("/transactions").await;
    assert_eq!(response.status_code(), 200);

    let json: Value = server.get("/transactions").await.json();
    assert_eq!(json["length"], 0);
}

#[tokio::test]
async fn test_reward_sender_cannot_be_submitted() {
    let miner = Wallet::generate();
    let server = TestServer::new(router(test_node(&miner))).expect("Failed to create test server");

    let request = TransactionRequest::unsigned(subnet_ledger::MINING_SENDER, miner.address(), 100.0);
    let response = server.put("/transactions").json(&request).expect_failure().await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_consensus_without_neighbors() {
    let miner = Wallet::generate();
    let server = TestServer::new(router(test_node(&miner))).expect("Failed to create test server");

    let json: Value = server.put("/consensus").await.json();
    assert_eq!(json["replaced"], false);
}

#[tokio::test]
async fn test_create_wallet() {
    let miner = Wallet::generate();
    let server = TestServer::new(router(test_node(&miner))).expect("Failed to create test server");

    let response = server.post("/wallet").await;
    assert_eq!(response.status_code(), 200);

    let info: WalletInfo = response.json();
    let restored = Wallet::from_private_key_hex(&info.private_key).unwrap();
    assert_eq!(restored.address(), info.blockchain_address);
    assert_eq!(restored.public_key_hex(), info.public_key);
}

#[tokio::test]
async fn test_neighbor_adopts_longer_chain_over_http() {
    let node_a = test_node(&Wallet::generate());
    for _ in 0..3 {
        node_a.mine().await.unwrap();
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = listener.local_addr().unwrap().to_string();
    let server = tokio::spawn(axum::serve(listener, router(Arc::clone(&node_a))).into_future());

    let node_b = test_node(&Wallet::generate());
    node_b.set_neighbors(vec![endpoint]).await;

    assert!(node_b.resolve_conflicts().await);
    assert_eq!(node_b.get_chain().await, node_a.get_chain().await);
    assert_eq!(node_b.get_chain().await.len(), 4);

    // Equal length never replaces
    assert!(!node_b.resolve_conflicts().await);

    server.abort();
}
