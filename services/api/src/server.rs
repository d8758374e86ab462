use crate::cli::ServeArgs;
use crate::infra::{AppState, FileCandidateLoader, TracingNotificationGateway};
use crate::routes::with_gift_entry_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use gift_entry::config::AppConfig;
use gift_entry::error::AppError;
use gift_entry::telemetry;
use gift_entry::workflows::gift_entry::GiftEntryService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let loader = match args.donations.take() {
        Some(path) => {
            let loader = FileCandidateLoader::from_path(&path)?;
            info!(path = %path.display(), donors = loader.donors(), "loaded open donation fixture");
            loader
        }
        None => FileCandidateLoader::default(),
    };

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(GiftEntryService::new(
        Arc::new(loader),
        Arc::new(TracingNotificationGateway::default()),
        config.gift_entry.clone(),
    ));

    let app = with_gift_entry_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "gift entry service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
