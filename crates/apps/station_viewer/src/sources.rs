//! File-backed feed producers.

use std::path::PathBuf;

use runtime::FeedPublisher;
use serde_json::Value;
use tracing::{debug, warn};

/// Reads one JSON document from `path` and publishes it. Unreadable files,
/// malformed JSON and a bare `null` are published as invalid deliveries.
pub async fn publish_file(path: PathBuf, publisher: FeedPublisher<Value>) {
    let feed = publisher.name();
    let delivered = match tokio::fs::read_to_string(&path).await {
        Ok(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Null) => publisher.publish_invalid("no payload"),
            Ok(value) => {
                debug!(feed, path = %path.display(), "publishing feed payload");
                publisher.publish(value)
            }
            Err(e) => publisher.publish_invalid(format!("{}: {e}", path.display())),
        },
        Err(e) => publisher.publish_invalid(format!("{}: {e}", path.display())),
    };
    if !delivered {
        warn!(feed, "subscriber gone before delivery");
    }
}

#[cfg(test)]
mod tests {
    use super::publish_file;
    use runtime::{Delivery, channel};
    use serde_json::json;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "station_viewer_{}_{name}",
            std::process::id()
        ));
        std::fs::write(&path, contents).expect("write temp file");
        path
    }

    #[tokio::test]
    async fn publishes_parsed_json() {
        let path = temp_file("ok.json", r#"{ "type": "FeatureCollection", "features": [] }"#);
        let (tx, mut rx) = channel("acars");
        publish_file(path.clone(), tx).await;
        assert_eq!(
            rx.next().await,
            Some(Delivery::Payload(json!({ "type": "FeatureCollection", "features": [] })))
        );
        assert_eq!(rx.next().await, None);
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn null_and_missing_files_are_invalid() {
        let path = temp_file("null.json", "null");
        let (tx, mut rx) = channel("vdl");
        publish_file(path.clone(), tx.clone()).await;
        publish_file(path.with_extension("missing"), tx).await;

        assert_eq!(rx.next().await, Some(Delivery::Invalid("no payload".to_string())));
        assert!(matches!(rx.next().await, Some(Delivery::Invalid(_))));
        std::fs::remove_file(path).ok();
    }
}
