use crate::events::EventBus;
use crate::handlers;
use crate::relay::{self, LobbyRegistry};
use crate::session::{SessionError, SessionManager};
use monkeybet_engine::engine::BOT_THINK_DELAY;
use std::convert::Infallible;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use warp::filters::BoxedFilter;
use warp::hyper::body::Bytes;
use warp::reply::{Reply, Response};
use warp::Filter;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
    think_delay: Duration,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            think_delay: BOT_THINK_DELAY,
        }
    }

    pub fn with_think_delay(mut self, think_delay: Duration) -> Self {
        self.think_delay = think_delay;
        self
    }

    /// Loopback on an ephemeral port with near-instant bots.
    pub fn for_tests() -> Self {
        Self::new("127.0.0.1", 0).with_think_delay(Duration::from_millis(1))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn think_delay(&self) -> Duration {
        self.think_delay
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", 8080)
    }
}

#[derive(Debug, Clone)]
pub struct AppContext {
    config: ServerConfig,
    event_bus: Arc<EventBus>,
    sessions: Arc<SessionManager>,
    lobbies: Arc<LobbyRegistry>,
}

impl AppContext {
    pub fn new(config: ServerConfig) -> Self {
        let event_bus = Arc::new(EventBus::new());
        let sessions = Arc::new(SessionManager::with_think_delay(
            Arc::clone(&event_bus),
            config.think_delay(),
        ));
        Self {
            config,
            event_bus,
            sessions,
            lobbies: Arc::new(LobbyRegistry::new()),
        }
    }

    pub fn new_for_tests() -> Self {
        Self::new(ServerConfig::for_tests())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    pub fn sessions(&self) -> Arc<SessionManager> {
        Arc::clone(&self.sessions)
    }

    pub fn lobbies(&self) -> Arc<LobbyRegistry> {
        Arc::clone(&self.lobbies)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Session error: {0}")]
    SessionError(#[from] SessionError),
}

#[derive(Debug, Clone)]
pub struct WebServer {
    context: AppContext,
}

impl WebServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            context: AppContext::new(config),
        }
    }

    pub fn from_context(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let WebServer { context } = self;
        let bind_addr = Self::bind_addr(context.config())?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        let (addr, server_future) = warp::serve(routes(&context))
            .try_bind_with_graceful_shutdown(bind_addr, shutdown_signal)
            .map_err(Self::map_warp_error)?;

        tracing::info!(%addr, "monkeybet server listening");

        let task = tokio::spawn(async move {
            server_future.await;
            Ok(())
        });

        Ok(ServerHandle::new(addr, shutdown_tx, task, context))
    }

    fn bind_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
        let host = config.host();

        if let Ok(addr) = host.parse::<SocketAddr>() {
            return Ok(addr);
        }

        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
            return Ok(SocketAddr::new(ip, config.port()));
        }

        let candidate = format!("{}:{}", host, config.port());
        let mut addrs = candidate.to_socket_addrs().map_err(|err| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`: {err}"))
        })?;

        addrs.next().ok_or_else(|| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`"))
        })
    }

    fn map_warp_error(err: warp::Error) -> ServerError {
        use std::error::Error as StdError;

        if let Some(io_err) = err
            .source()
            .and_then(|source| source.downcast_ref::<std::io::Error>())
        {
            return ServerError::BindError(std::io::Error::new(io_err.kind(), io_err.to_string()));
        }

        ServerError::ConfigError(err.to_string())
    }
}

/// Every route the server answers; also usable directly with `warp::test`.
pub fn routes(context: &AppContext) -> BoxedFilter<(Response,)> {
    health_route(context)
        .or(relay_route(context))
        .unify()
        .or(api_routes(context))
        .unify()
        .or(sse_route(context))
        .unify()
        .boxed()
}

fn health_route(context: &AppContext) -> BoxedFilter<(Response,)> {
    let sessions = context.sessions();
    let lobbies = context.lobbies();
    warp::path("health")
        .and(warp::get())
        .and(warp::path::end())
        .map(move || {
            handlers::health(sessions.active_sessions().len(), lobbies.lobby_count())
                .into_response()
        })
        .boxed()
}

fn relay_route(context: &AppContext) -> BoxedFilter<(Response,)> {
    warp::path("ws")
        .and(warp::path::end())
        .and(warp::ws())
        .and(with_lobbies(context.lobbies()))
        .map(|ws: warp::ws::Ws, lobbies: Arc<LobbyRegistry>| {
            ws.on_upgrade(move |socket| relay::client_connected(socket, lobbies))
                .into_response()
        })
        .boxed()
}

fn api_routes(context: &AppContext) -> BoxedFilter<(Response,)> {
    let sessions = context.sessions();

    let create = warp::path!("api" / "sessions")
        .and(warp::post())
        .and(with_session_manager(Arc::clone(&sessions)))
        .and(warp::body::bytes())
        .and_then(|sessions: Arc<SessionManager>, body: Bytes| async move {
            Ok::<_, Infallible>(handlers::create_session(sessions, body).await)
        });

    let state = warp::path!("api" / "sessions" / String / "state")
        .and(warp::get())
        .and(with_session_manager(Arc::clone(&sessions)))
        .and_then(|id: String, sessions: Arc<SessionManager>| async move {
            Ok::<_, Infallible>(handlers::get_session_state(id, sessions).await)
        });

    let actions = warp::path!("api" / "sessions" / String / "actions")
        .and(warp::post())
        .and(with_session_manager(Arc::clone(&sessions)))
        .and(warp::body::bytes())
        .and_then(
            |id: String, sessions: Arc<SessionManager>, body: Bytes| async move {
                Ok::<_, Infallible>(handlers::submit_action(id, sessions, body).await)
            },
        );

    let reset = warp::path!("api" / "sessions" / String / "reset")
        .and(warp::post())
        .and(with_session_manager(Arc::clone(&sessions)))
        .and_then(|id: String, sessions: Arc<SessionManager>| async move {
            Ok::<_, Infallible>(handlers::reset_session(id, sessions).await)
        });

    let delete = warp::path!("api" / "sessions" / String)
        .and(warp::delete())
        .and(with_session_manager(sessions))
        .and_then(|id: String, sessions: Arc<SessionManager>| async move {
            Ok::<_, Infallible>(handlers::delete_session(id, sessions).await)
        });

    create
        .or(state)
        .unify()
        .or(actions)
        .unify()
        .or(reset)
        .unify()
        .or(delete)
        .unify()
        .boxed()
}

fn sse_route(context: &AppContext) -> BoxedFilter<(Response,)> {
    warp::path!("api" / "sessions" / String / "events")
        .and(warp::get())
        .and(with_session_manager(context.sessions()))
        .and(with_event_bus(context.event_bus()))
        .and_then(
            |id: String, sessions: Arc<SessionManager>, event_bus: Arc<EventBus>| async move {
                Ok::<_, Infallible>(handlers::stream_events(id, sessions, event_bus).await)
            },
        )
        .boxed()
}

fn with_session_manager(
    sessions: Arc<SessionManager>,
) -> impl Filter<Extract = (Arc<SessionManager>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&sessions))
}

fn with_event_bus(
    event_bus: Arc<EventBus>,
) -> impl Filter<Extract = (Arc<EventBus>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&event_bus))
}

fn with_lobbies(
    lobbies: Arc<LobbyRegistry>,
) -> impl Filter<Extract = (Arc<LobbyRegistry>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&lobbies))
}

#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), ServerError>>>,
    context: AppContext,
}

impl ServerHandle {
    fn new(
        addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<Result<(), ServerError>>,
        context: AppContext,
    ) -> Self {
        Self {
            addr,
            shutdown: Some(shutdown),
            task: Some(task),
            context,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            match task.await {
                Ok(result) => result?,
                Err(err) => {
                    return Err(ServerError::ConfigError(format!(
                        "server task join error: {err}"
                    )))
                }
            }
        }

        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_accepts_ip_and_socket_forms() {
        let config = ServerConfig::new("127.0.0.1", 9000);
        assert_eq!(
            WebServer::bind_addr(&config).unwrap(),
            "127.0.0.1:9000".parse::<SocketAddr>().unwrap()
        );
        let config = ServerConfig::new("0.0.0.0:7000", 9000);
        assert_eq!(WebServer::bind_addr(&config).unwrap().port(), 7000);
    }

    #[test]
    fn test_config_uses_short_think_delay() {
        let config = ServerConfig::for_tests();
        assert_eq!(config.port(), 0);
        assert!(config.think_delay() < BOT_THINK_DELAY);
        assert_eq!(ServerConfig::default().think_delay(), BOT_THINK_DELAY);
    }

    #[tokio::test]
    async fn server_starts_and_stops() {
        let handle = WebServer::new(ServerConfig::for_tests())
            .start()
            .await
            .expect("start");
        assert_ne!(handle.address().port(), 0);
        handle.shutdown().await.expect("shutdown");
    }
}
