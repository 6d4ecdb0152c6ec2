use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use leetdraw_discord::GatewayRunner;
use serde::Serialize;
use tracing::{error, info};

#[derive(Clone)]
pub struct HealthState {
    gateway_runner: Arc<GatewayRunner>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub gateway: HealthCheck,
    pub checked_at: String,
}

pub fn router(gateway_runner: Arc<GatewayRunner>) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { gateway_runner })
}

pub async fn spawn(
    bind_address: &str,
    port: u16,
    gateway_runner: Arc<GatewayRunner>,
) -> std::io::Result<()> {
    let address = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.health.start",
        correlation_id = "bootstrap",
        bind_address = %address,
        "health endpoint started"
    );

    tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, router(gateway_runner)).await {
            error!(
                event_name = "system.health.error",
                correlation_id = "bootstrap",
                error = %error,
                "health endpoint server terminated unexpectedly"
            );
        }
    });

    Ok(())
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let gateway = gateway_check(&state.gateway_runner);
    let ready = gateway.status != "degraded";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "leetdraw-server runtime initialized".to_string(),
        },
        gateway,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn gateway_check(runner: &GatewayRunner) -> HealthCheck {
    if runner.is_noop_transport() {
        return HealthCheck {
            status: "disabled",
            detail: "noop gateway transport; no chat events are received".to_string(),
        };
    }
    if runner.is_connected() {
        HealthCheck { status: "ready", detail: "discord gateway connected".to_string() }
    } else {
        HealthCheck { status: "degraded", detail: "discord gateway disconnected".to_string() }
    }
}
