use axum::{extract::State, Json};
use tracing::{error, info};
use uuid::Uuid;

use super::types::WalletResponse;
use crate::error::{WALLET_FAILED, WALLET_NOT_FOUND};
use crate::{ErrorResponse, ServerState};

/// GET /api/wallet - exported wallet credential
pub async fn handle_get_wallet(State(state): State<ServerState>) -> Result<Json<WalletResponse>, ErrorResponse> {
    let request_id = Uuid::new_v4();
    info!("[{}] GET /api/wallet", request_id);

    match state.credentials.load().await {
        Ok(Some(wallet_data)) => Ok(Json(WalletResponse { wallet_data })),
        Ok(None) => Err(ErrorResponse::not_found(WALLET_NOT_FOUND)),
        Err(e) => {
            error!("[{}] Error retrieving wallet data: {}", request_id, e);
            Err(ErrorResponse::internal_error(WALLET_FAILED))
        }
    }
}
