use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryLeadStore};
use crate::routes::with_lead_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lead_intake::config::AppConfig;
use lead_intake::error::AppError;
use lead_intake::telemetry;
use lead_intake::workflows::leads::{AirtableStore, IntakeError, LeadIntakeService, LeadStore};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let addr = config.server.socket_addr()?;
    let router = match &config.store {
        Some(airtable) => {
            let store = AirtableStore::new(airtable).map_err(IntakeError::from)?;
            info!(base = %airtable.base_id, table = %airtable.table, "writing leads to airtable");
            lead_app(store, &config)
        }
        None => {
            warn!("airtable credentials missing; leads are kept in memory only");
            lead_app(InMemoryLeadStore::default(), &config)
        }
    };

    let app = router
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    serve(app, addr, readiness_flag, &config).await
}

fn lead_app<S>(store: S, config: &AppConfig) -> axum::Router
where
    S: LeadStore + 'static,
{
    let service = Arc::new(LeadIntakeService::new(Arc::new(store), config.gates));
    with_lead_routes(service)
}

async fn serve(
    app: axum::Router,
    addr: SocketAddr,
    readiness_flag: Arc<AtomicBool>,
    config: &AppConfig,
) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        ca_only = ?config.gates.require_california,
        kern_only = ?config.gates.require_kern_county,
        "lead intake service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
