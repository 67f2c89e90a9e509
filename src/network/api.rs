// HTTP surface of a node - peer wire contract plus client operations

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::core::{LedgerError, TransactionRequest};
use crate::network::{ChainResponse, Node};
use crate::wallet::Wallet;

#[derive(Debug, Deserialize)]
struct AmountQuery {
    blockchain_address: String,
}

/// Build the router for a node
pub fn router(node: Arc<Node>) -> Router {
    Router::new()
        .route("/chain", get(get_chain))
        .route(
            "/transactions",
            get(get_transactions)
                .post(create_transaction)
                .put(receive_transaction)
                .delete(clear_transactions),
        )
        .route("/consensus", put(resolve_conflicts))
        .route("/amount", get(get_amount))
        .route("/wallet", post(create_wallet))
        .route("/mine", get(mine))
        .with_state(node)
}

/// Listen on `0.0.0.0:<port>` until the server fails
pub async fn serve(node: Arc<Node>) -> Result<(), String> {
    let addr = SocketAddr::from(([0, 0, 0, 0], node.config().port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", addr, e))?;

    log::info!("Node listening on http://{}", addr);

    axum::serve(listener, router(node))
        .await
        .map_err(|e| format!("Server error: {}", e))
}

fn rejected(err: LedgerError) -> (StatusCode, Json<serde_json::Value>) {
    log::warn!("Transaction rejected: {}", err);
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "message": "fail", "error": err.to_string() })),
    )
}

async fn get_chain(State(node): State<Arc<Node>>) -> Json<ChainResponse> {
    Json(ChainResponse {
        chain: node.get_chain().await,
    })
}

async fn get_transactions(State(node): State<Arc<Node>>) -> impl IntoResponse {
    let transactions = node.pool_transactions().await;
    Json(json!({
        "length": transactions.len(),
        "transactions": transactions,
    }))
}

async fn create_transaction(
    State(node): State<Arc<Node>>,
    Json(request): Json<TransactionRequest>,
) -> impl IntoResponse {
    match node.create_transaction(&request).await {
        Ok(()) => (StatusCode::CREATED, Json(json!({ "message": "success" }))),
        Err(e) => rejected(e),
    }
}

async fn receive_transaction(
    State(node): State<Arc<Node>>,
    Json(request): Json<TransactionRequest>,
) -> impl IntoResponse {
    match node.receive_transaction(&request).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "message": "success" }))),
        Err(e) => rejected(e),
    }
}

async fn clear_transactions(State(node): State<Arc<Node>>) -> impl IntoResponse {
    node.clear_pool().await;
    Json(json!({ "message": "success" }))
}

async fn resolve_conflicts(State(node): State<Arc<Node>>) -> impl IntoResponse {
    let replaced = node.resolve_conflicts().await;
    Json(json!({ "message": "success", "replaced": replaced }))
}

async fn get_amount(
    State(node): State<Arc<Node>>,
    Query(query): Query<AmountQuery>,
) -> impl IntoResponse {
    let amount = node.get_balance(&query.blockchain_address).await;
    Json(json!({ "amount": amount }))
}

async fn create_wallet() -> impl IntoResponse {
    Json(Wallet::generate().info())
}

async fn mine(State(node): State<Arc<Node>>) -> impl IntoResponse {
    match node.try_mine().await {
        Some(Ok(block)) => (
            StatusCode::OK,
            Json(json!({ "message": "success", "block": block })),
        ),
        Some(Err(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "fail", "error": e.to_string() })),
        ),
        None => (
            StatusCode::CONFLICT,
            Json(json!({ "message": "fail", "error": "mining already in progress" })),
        ),
    }
}
