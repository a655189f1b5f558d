use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{
    api::{self, CallbackState},
    oauth::OAuthProvider,
    types::PkceToken,
};

pub async fn start_api_server(
    addr: &str,
    provider: OAuthProvider,
    pkce: Arc<Mutex<Option<PkceToken>>>,
) -> crate::Res<()> {
    let state = CallbackState { provider, pkce };
    let app = Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)));

    let addr = SocketAddr::from_str(addr)
        .map_err(|e| format!("Failed to parse server address {}: {}", addr, e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
