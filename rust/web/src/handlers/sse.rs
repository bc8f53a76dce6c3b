use crate::errors::IntoErrorResponse;
use crate::events::{EventBus, EventSubscription, SessionEvent};
use crate::session::{SessionId, SessionManager};
use futures_util::stream::{self, Stream};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use warp::http;
use warp::reply::{self, Response};
use warp::sse;
use warp::Reply;

/// `GET /api/sessions/{id}/events`: engine events as server-sent events,
/// ending with an `ended` event when the session is deleted.
pub async fn stream_events(
    session_id: SessionId,
    sessions: Arc<SessionManager>,
    event_bus: Arc<EventBus>,
) -> Response {
    if let Err(err) = sessions.get_session(&session_id) {
        return err.into_http_response();
    }

    let subscription = event_bus.subscribe(session_id);
    let keep_alive = sse::keep_alive()
        .interval(Duration::from_secs(15))
        .text(":keep-alive\n");

    let reply = sse::reply(keep_alive.stream(subscription_stream(subscription)));
    reply::with_header(reply, http::header::CACHE_CONTROL, "no-cache").into_response()
}

// The subscription rides along in the stream state so dropping the
// connection unsubscribes.
fn subscription_stream(
    subscription: EventSubscription,
) -> impl Stream<Item = Result<sse::Event, Infallible>> + Send + 'static {
    stream::unfold(subscription, |mut subscription| async move {
        let event = subscription.receiver().recv().await?;
        Some((Ok(render_event(&event)), subscription))
    })
}

fn render_event(event: &SessionEvent) -> sse::Event {
    let name = match event {
        SessionEvent::Game { .. } => "game_event",
        SessionEvent::Ended { .. } => "ended",
    };
    match serde_json::to_string(event) {
        Ok(json) => sse::Event::default().event(name).data(json),
        Err(err) => {
            let fallback = serde_json::json!({
                "kind": "error",
                "message": format!("failed to serialize session event: {err}")
            })
            .to_string();
            sse::Event::default().event("error").data(fallback)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monkeybet_engine::events::GameEvent;

    #[test]
    fn events_are_named_by_kind() {
        let game = render_event(&SessionEvent::Game {
            event: GameEvent::RoundStarted { round: 3 },
        })
        .to_string();
        assert!(game.contains("event:game_event"));
        assert!(game.contains("round_started"));

        let ended = render_event(&SessionEvent::Ended {
            reason: "terminated_by_request".into(),
        })
        .to_string();
        assert!(ended.contains("event:ended"));
        assert!(ended.contains("terminated_by_request"));
    }

    #[tokio::test]
    async fn stream_ends_when_the_session_is_dropped() {
        use futures_util::StreamExt;

        let bus = EventBus::new();
        let id = "s".to_string();
        let mut stream = Box::pin(subscription_stream(bus.subscribe(id.clone())));
        bus.broadcast(
            &id,
            SessionEvent::Ended {
                reason: "terminated_by_request".into(),
            },
        );
        bus.drop_session(&id);

        assert!(stream.next().await.is_some());
        assert!(stream.next().await.is_none());
        drop(stream);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
