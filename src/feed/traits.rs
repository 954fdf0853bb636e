use std::path::PathBuf;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// A file-path notification read from the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Payload as a filesystem path. On Unix the bytes are kept as-is;
    /// elsewhere they are decoded as UTF-8, lossily. Empty when the
    /// message had no payload.
    pub path: PathBuf,
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
}

impl Notification {
    pub fn new(payload: Option<&[u8]>, topic: &str, partition: i32, offset: i64) -> Self {
        Self {
            path: path_from_bytes(payload.unwrap_or_default()),
            topic: topic.to_string(),
            partition,
            offset,
        }
    }
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;

    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Ordered source of notifications (a Kafka consumer in production).
#[async_trait]
pub trait NotificationSource: Send + Sync {
    /// Human-readable source name, e.g. the subscribed topic.
    fn name(&self) -> &str;

    /// Wait for the next notification.
    ///
    /// Returns `Ok(None)` once `cancel` fires. Errors are per-read and
    /// the caller may keep reading afterwards.
    async fn recv(&self, cancel: &CancellationToken) -> anyhow::Result<Option<Notification>>;

    /// Release the bus session. Called once when the listener stops.
    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_decoded_as_path() {
        let n = Notification::new(Some(b"/data/sample.go"), "code-bundles", 0, 42);
        assert_eq!(n.path, PathBuf::from("/data/sample.go"));
        assert_eq!(n.offset, 42);
    }

    #[test]
    fn missing_payload_is_empty_path() {
        let n = Notification::new(None, "t", 1, 0);
        assert!(n.path.as_os_str().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_payload_keeps_raw_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let n = Notification::new(Some(b"/data/caf\xe9.go"), "t", 0, 0);
        assert_eq!(n.path.as_os_str().as_bytes(), b"/data/caf\xe9.go");
    }

    #[cfg(not(unix))]
    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let n = Notification::new(Some(&[b'/', b'a', 0xff, b'b']), "t", 0, 0);
        assert_eq!(n.path, PathBuf::from("/a\u{fffd}b"));
    }
}
