use serde::Serialize;
use warp::reply::Json;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    sessions: usize,
    lobbies: usize,
}

/// `GET /health`
pub fn health(sessions: usize, lobbies: usize) -> Json {
    warp::reply::json(&HealthBody {
        status: "ok",
        sessions,
        lobbies,
    })
}
