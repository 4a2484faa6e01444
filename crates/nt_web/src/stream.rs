use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use chrono::{DateTime, Utc};
use futures::stream::{self, Stream, StreamExt};
use nt_core::Article;
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{interval_at, Instant};
use tracing::{debug, warn};

use crate::AppState;

pub const DEFAULT_HEARTBEAT: Duration = Duration::from_secs(30);
const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Connected { timestamp: DateTime<Utc> },
    Heartbeat { timestamp: DateTime<Utc> },
    NewArticle { article: Box<Article>, timestamp: DateTime<Utc> },
}

impl StreamEvent {
    fn to_sse(&self) -> Event {
        Event::default()
            .json_data(self)
            .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()))
    }
}

/// Fan-out for live article notifications. Publishing with no listeners is
/// a no-op.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<StreamEvent>,
    heartbeat: Duration,
}

impl Notifier {
    pub fn new(heartbeat: Duration) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            heartbeat: heartbeat.max(Duration::from_millis(1)),
        }
    }

    /// Returns how many clients received the event.
    pub fn publish(&self, article: Article) -> usize {
        let event = StreamEvent::NewArticle {
            article: Box::new(article),
            timestamp: Utc::now(),
        };
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// `connected` first, then heartbeats interleaved with published events.
    /// Ends when the notifier is dropped; dropping the stream unsubscribes.
    pub fn subscribe(&self) -> impl Stream<Item = StreamEvent> + Send + 'static {
        let rx = self.tx.subscribe();
        let ticker = interval_at(Instant::now() + self.heartbeat, self.heartbeat);

        let connected = stream::once(async {
            StreamEvent::Connected {
                timestamp: Utc::now(),
            }
        });
        let rest = stream::unfold((rx, ticker), |(mut rx, mut ticker)| async move {
            loop {
                let event = tokio::select! {
                    _ = ticker.tick() => StreamEvent::Heartbeat { timestamp: Utc::now() },
                    received = rx.recv() => match received {
                        Ok(event) => event,
                        Err(RecvError::Lagged(skipped)) => {
                            warn!("Stream client lagged, skipped {} events", skipped);
                            continue;
                        }
                        Err(RecvError::Closed) => return None,
                    },
                };
                return Some((event, (rx, ticker)));
            }
        });
        connected.chain(rest)
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_HEARTBEAT)
    }
}

pub async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!(
        clients = state.notifier.subscriber_count() + 1,
        "Stream client connected"
    );
    let events = state
        .notifier
        .subscribe()
        .map(|event| Ok::<_, Infallible>(event.to_sse()));
    Sse::new(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use nt_core::{Category, Importance, Sentiment};

    fn article() -> Article {
        Article {
            id: "1".to_string(),
            external_id: None,
            title: "Breaking".to_string(),
            description: None,
            content: None,
            url: "https://example.com/breaking".to_string(),
            image_url: None,
            published_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            source: "test".to_string(),
            category: Category::Politics,
            summary: vec![],
            sentiment: Sentiment::Neutral,
            importance: Importance::High,
        }
    }

    #[tokio::test]
    async fn test_connected_then_published_article() {
        let notifier = Notifier::new(Duration::from_secs(3600));
        let mut events = Box::pin(notifier.subscribe());

        assert!(matches!(events.next().await, Some(StreamEvent::Connected { .. })));
        assert_eq!(notifier.subscriber_count(), 1);
        assert_eq!(notifier.publish(article()), 1);

        match events.next().await {
            Some(StreamEvent::NewArticle { article, .. }) => assert_eq!(article.title, "Breaking"),
            other => panic!("expected new_article, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_heartbeat_fires() {
        let notifier = Notifier::new(Duration::from_millis(20));
        let mut events = Box::pin(notifier.subscribe());

        events.next().await;
        assert!(matches!(events.next().await, Some(StreamEvent::Heartbeat { .. })));
    }

    #[tokio::test]
    async fn test_dropping_stream_unsubscribes() {
        let notifier = Notifier::default();
        let events = notifier.subscribe();
        assert_eq!(notifier.subscriber_count(), 1);
        drop(events);
        assert_eq!(notifier.subscriber_count(), 0);
        assert_eq!(notifier.publish(article()), 0);
    }

    #[test]
    fn test_wire_format() {
        let event = StreamEvent::Heartbeat {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "heartbeat");
    }
}
