use crate::{
    api::routes::{
        add_attendance, add_bulk_attendance, add_discipline, add_participant, add_verse,
        add_visitor, get_activity_history, get_leaderboard, get_rankings, health,
        leaderboard_page_handler, remove_attendance, remove_discipline, remove_verse,
        remove_visitor, set_points_as_of,
    },
    config::Settings,
    domain::{Admin, LeaderboardStore, Scoreboard},
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::{connect_info::IntoMakeServiceWithConnectInfo, ConnectInfo, Request},
    http::{Extensions, HeaderValue},
    middleware::{self, AddExtension, Next},
    response::IntoResponse,
    routing::{delete, get, post, put},
    serve::Serve,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::{error, info, warn};
use reqwest_middleware::{
    reqwest::{self, Client},
    ClientBuilder, ClientWithMiddleware, Middleware,
};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::net::TcpListener;
use tokio::select;
use tokio::signal::unix::{signal, SignalKind};
use tower_http::cors::{AllowOrigin, CorsLayer};

type Server = Serve<
    TcpListener,
    IntoMakeServiceWithConnectInfo<Router, SocketAddr>,
    AddExtension<Router, ConnectInfo<SocketAddr>>,
>;

pub struct Application {
    server: Server,
    address: SocketAddr,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let address = format!(
            "{}:{}",
            config.api_settings.domain, config.api_settings.port
        );
        let listener = SocketAddr::from_str(&address)?;
        let app_state = build_app(config.clone())?;
        let (server, address) =
            build_server(listener, app_state, config.api_settings.origins).await?;
        Ok(Self { server, address })
    }

    /// Address actually bound, useful when the configured port is 0
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub async fn run_until_stopped(self) -> Result<(), anyhow::Error> {
        info!("Starting server...");
        match self.server.with_graceful_shutdown(shutdown_signal()).await {
            Ok(_) => {
                info!("Shutdown complete");
                Ok(())
            }
            Err(e) => {
                error!("Server shutdown error: {}", e);
                Err(anyhow!("Error during server shutdown: {}", e))
            }
        }
    }
}

pub struct AppState {
    pub title: String,
    pub admin: Arc<Admin>,
    pub scoreboard: Arc<Scoreboard>,
}

pub fn build_app(config: Settings) -> Result<AppState, anyhow::Error> {
    let data = &config.data_settings;
    let leaderboard_path = data.leaderboard_path();
    if !leaderboard_path.exists() {
        warn!(
            "Leaderboard document {} does not exist yet, requests will fail until it does",
            leaderboard_path.display()
        );
    }
    if let Some(mirror) = data.mirror_path() {
        info!("Mirroring leaderboard writes to {}", mirror.display());
    }

    let store = Arc::new(LeaderboardStore::new(leaderboard_path, data.mirror_path()));
    info!("Leaderboard store configured at {}", store.path().display());

    let admin = Arc::new(Admin::new(store.clone()));
    let scoreboard = Arc::new(Scoreboard::new(store, data.scoring_files()));

    Ok(AppState {
        title: config.ui_settings.title,
        admin,
        scoreboard,
    })
}

pub async fn build_server(
    socket_addr: SocketAddr,
    app_state: AppState,
    origins: Vec<String>,
) -> Result<(Server, SocketAddr), anyhow::Error> {
    let listener = TcpListener::bind(socket_addr).await?;
    let address = listener.local_addr()?;

    info!("Setting up service");
    let app = app(app_state, origins);
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    );
    info!(
        "Service running @: http://{}:{}",
        address.ip(),
        address.port()
    );
    Ok((server, address))
}

pub fn app(app_state: AppState, origins: Vec<String>) -> Router {
    let origins: Vec<HeaderValue> = origins
        .into_iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(AllowOrigin::list(origins));

    Router::new()
        .route("/", get(leaderboard_page_handler))
        .route("/api/health_check", get(health))
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/rankings", get(get_rankings))
        .route("/api/activity-history", get(get_activity_history))
        .route("/api/points-as-of", put(set_points_as_of))
        .route("/api/participants", post(add_participant))
        .route(
            "/api/participants/bulk/attendance",
            post(add_bulk_attendance),
        )
        .route("/api/participants/{id}/attendance", post(add_attendance))
        .route(
            "/api/participants/{id}/attendance/{index}",
            delete(remove_attendance),
        )
        .route("/api/participants/{id}/verse", post(add_verse))
        .route(
            "/api/participants/{id}/verse/{index}",
            delete(remove_verse),
        )
        .route("/api/participants/{id}/visitor", post(add_visitor))
        .route(
            "/api/participants/{id}/visitor/{index}",
            delete(remove_visitor),
        )
        .route("/api/participants/{id}/discipline", post(add_discipline))
        .route(
            "/api/participants/{id}/discipline/{index}",
            delete(remove_discipline),
        )
        .layer(middleware::from_fn(log_request))
        .with_state(Arc::new(app_state))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_string();
    info!(target: "http_request", "new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}

pub fn build_reqwest_client(max_retries: u32) -> ClientWithMiddleware {
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);
    ClientBuilder::new(Client::new())
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .with(LoggingMiddleware)
        .build()
}

struct LoggingMiddleware;

#[async_trait::async_trait]
impl Middleware for LoggingMiddleware {
    async fn handle(
        &self,
        req: reqwest::Request,
        extensions: &mut Extensions,
        next: reqwest_middleware::Next<'_>,
    ) -> reqwest_middleware::Result<reqwest::Response> {
        let method = req.method().clone();
        let url = req.url().clone();

        info!("Making {} request to: {}", method, url);

        let result = next.run(req, extensions).await;

        match &result {
            Ok(response) => {
                info!("{} {} -> Status: {}", method, url, response.status());
            }
            Err(error) => {
                warn!("{} {} -> Error: {:?}", method, url, error);
            }
        }

        result
    }
}

async fn shutdown_signal() {
    let (mut sigint, mut sigterm) = match (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
    ) {
        (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
        (Err(e), _) | (_, Err(e)) => {
            error!("Failed to install shutdown signal handlers: {}", e);
            return std::future::pending().await;
        }
    };

    select! {
        _ = sigint.recv() => info!("Received SIGINT signal"),
        _ = sigterm.recv() => info!("Received SIGTERM signal"),
    }
}
