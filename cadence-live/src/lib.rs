//! WebSocket subscription delivering live dashboard frames.
//!
//! One connection per channel instance. Frames arrive in socket order and
//! fan out over a broadcast queue; a channel that fails to connect leaves
//! the dashboard on cache-only behavior, it never takes the view down.

use futures_util::StreamExt as _;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info};

/// How many frames may queue per subscriber before the oldest are dropped.
const FRAME_QUEUE_DEPTH: usize = 64;

/// Push actions the backend broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Action {
    #[serde(rename = "postprocess.create")]
    PostProcessCreate,
    #[serde(rename = "post.create")]
    PostCreate,
    #[serde(rename = "post.update")]
    PostUpdate,
}

/// One decoded push frame.
#[derive(Debug, Clone, Deserialize)]
pub struct Frame {
    pub action: Action,
    #[serde(default)]
    pub data: Value,
}

impl Frame {
    /// The record id carried in the frame payload, if any.
    ///
    /// The backend is inconsistent about emitting ids as numbers or
    /// strings, so both are accepted.
    pub fn record_id(&self) -> Option<i64> {
        let id = self.data.get("id")?;
        id.as_i64()
            .or_else(|| id.as_str().and_then(|raw| raw.parse().ok()))
    }
}

/// Failure to establish the push subscription.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to connect to live channel: {0}")]
    Connect(String),
}

/// A live push subscription with broadcast fan-out.
///
/// Dropping the channel aborts the read task and closes every receiver.
pub struct LiveChannel {
    frames: broadcast::Sender<Frame>,
    reader: JoinHandle<()>,
}

impl LiveChannel {
    /// Connect to the push endpoint and start reading frames.
    pub async fn connect(url: &str) -> Result<Self, ChannelError> {
        let (socket, _) = connect_async(url)
            .await
            .map_err(|err| ChannelError::Connect(err.to_string()))?;
        info!(url, "live channel connected");

        let (frames, _) = broadcast::channel(FRAME_QUEUE_DEPTH);
        let sender = frames.clone();

        let reader = tokio::spawn(async move {
            let mut socket = socket;
            while let Some(message) = socket.next().await {
                let message = match message {
                    Ok(message) => message,
                    Err(err) => {
                        error!(?err, "live channel stream error");
                        break;
                    }
                };

                let text = match message {
                    Message::Text(text) => text,
                    Message::Close(_) => break,
                    _ => continue,
                };

                match serde_json::from_str::<Frame>(&text) {
                    // Send only fails with zero subscribers; frames from
                    // before the first subscribe are simply dropped.
                    Ok(frame) => {
                        let _ = sender.send(frame);
                    }
                    Err(err) => debug!(%err, raw = %text, "skipping unrecognized frame"),
                }
            }
            info!("live channel closed");
        });

        Ok(Self { frames, reader })
    }

    /// Subscribe to frames delivered from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Frame> {
        self.frames.subscribe()
    }
}

impl Drop for LiveChannel {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, Frame};

    #[test]
    fn observed_actions_decode() {
        let cases = [
            (r#"{"action":"post.create","data":{"id":5}}"#, Action::PostCreate),
            (r#"{"action":"post.update","data":{"id":5}}"#, Action::PostUpdate),
            (
                r#"{"action":"postprocess.create","data":{}}"#,
                Action::PostProcessCreate,
            ),
        ];

        for (raw, expected) in cases {
            let frame: Frame = serde_json::from_str(raw).unwrap();
            assert_eq!(frame.action, expected);
        }
    }

    #[test]
    fn unknown_actions_fail_to_decode() {
        assert!(serde_json::from_str::<Frame>(r#"{"action":"proxy.create","data":{}}"#).is_err());
        assert!(serde_json::from_str::<Frame>("not json").is_err());
    }

    #[test]
    fn record_id_accepts_numbers_and_strings() {
        let numeric: Frame =
            serde_json::from_str(r#"{"action":"post.update","data":{"id":12}}"#).unwrap();
        assert_eq!(numeric.record_id(), Some(12));

        let stringly: Frame =
            serde_json::from_str(r#"{"action":"post.update","data":{"id":"12"}}"#).unwrap();
        assert_eq!(stringly.record_id(), Some(12));

        let missing: Frame =
            serde_json::from_str(r#"{"action":"postprocess.create"}"#).unwrap();
        assert_eq!(missing.record_id(), None);
    }
}
