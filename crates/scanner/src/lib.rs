//! Barcode scanner capability.
//!
//! Decoding barcodes from camera frames is the job of an external
//! collaborator. This crate only describes how to talk to one: start it with
//! some [`Constraints`], consume a stream of [`ScanEvent`]s, stop it. Product
//! lookups happen strictly downstream of the decoded text; nothing here polls
//! a device.

mod constraints;
pub mod error;
mod lines;
#[cfg(any(test, feature = "mock"))]
mod mock;

pub use crate::constraints::{Constraints, Facing, ScanBox};
pub use crate::lines::LineScanner;
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::MockScanner;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use futures::{Stream, StreamExt};
use std::pin::Pin;

/// Something the scanner reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// A barcode was decoded. The text is exactly what the decoder produced,
    /// stray whitespace included.
    Decoded(String),
    /// A frame could not be decoded. Happens constantly while nothing
    /// readable is in view.
    DecodeFailed(String),
}

pub type ScanStream = Pin<Box<dyn Stream<Item = ScanEvent> + Send>>;

/// A running (or startable) barcode scanner.
#[async_trait]
pub trait Scanner: Send {
    /// Name of the scanner, for logging.
    fn name(&self) -> &str;

    /// Start capturing. Decode results arrive on the returned stream until
    /// the scanner is stopped or the device goes away.
    async fn start(&mut self, constraints: &Constraints) -> Result<ScanStream>;

    /// Stop capturing. Stopping a scanner that isn't running is not an error.
    async fn stop(&mut self) -> Result<()>;
}

/// Start `scanner` with `primary`, retrying once with
/// [`relaxed`](Constraints::relaxed) constraints (same camera facing) if the
/// device rejects them.
///
/// Returns [`CameraAccess`](ErrorKind::CameraAccess) when both attempts fail.
pub async fn start_with_fallback<S: Scanner + ?Sized>(scanner: &mut S, primary: &Constraints) -> Result<ScanStream> {
    match scanner.start(primary).await {
        Ok(stream) => Ok(stream),
        Err(err) => {
            tracing::warn!(scanner = scanner.name(), error = ?err, "Start failed with constraints, trying relaxed");
            let relaxed = Constraints {
                facing: primary.facing,
                ..Constraints::relaxed()
            };
            let name = scanner.name().to_string();
            scanner.start(&relaxed).await.or_raise(|| ErrorKind::CameraAccess(name))
        },
    }
}

/// Only the successfully decoded texts; decode failures are logged and
/// dropped.
pub fn decoded(events: ScanStream) -> impl Stream<Item = String> + Send {
    events.filter_map(|event| {
        std::future::ready(match event {
            ScanEvent::Decoded(text) => Some(text),
            ScanEvent::DecodeFailed(reason) => {
                tracing::debug!(%reason, "Decode failed");
                None
            },
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_primary_constraints_accepted() {
        let mut scanner = MockScanner::new([ScanEvent::Decoded("123".into())]);
        let stream = start_with_fallback(&mut scanner, &Constraints::default()).await.unwrap();
        assert_eq!(decoded(stream).collect::<Vec<_>>().await, vec!["123".to_string()]);
        assert_eq!(scanner.starts(), &[Constraints::default()]);
    }

    #[tokio::test]
    async fn test_falls_back_to_relaxed() {
        let mut scanner =
            MockScanner::new([ScanEvent::Decoded("123".into())]).rejecting(|c| c.aspect_ratio.is_some());
        let stream = start_with_fallback(&mut scanner, &Constraints::default()).await.unwrap();
        assert_eq!(decoded(stream).collect::<Vec<_>>().await, vec!["123".to_string()]);
        assert_eq!(scanner.starts(), &[Constraints::default(), Constraints::relaxed()]);
    }

    #[tokio::test]
    async fn test_fallback_keeps_facing() {
        let mut scanner = MockScanner::new([]).rejecting(|c| c.aspect_ratio.is_some());
        let primary = Constraints {
            facing: Facing::User,
            ..Constraints::default()
        };
        let _stream = start_with_fallback(&mut scanner, &primary).await.unwrap();
        assert_eq!(scanner.starts()[1].facing, Facing::User);
    }

    #[tokio::test]
    async fn test_camera_access_error() {
        let mut scanner = MockScanner::new([]).rejecting(|_| true);
        let err = start_with_fallback(&mut scanner, &Constraints::default()).await.err().unwrap();
        assert!(matches!(&*err, ErrorKind::CameraAccess(_)));
        assert_eq!(scanner.starts().len(), 2);
    }

    #[tokio::test]
    async fn test_decode_failures_are_dropped() {
        let mut scanner = MockScanner::new([
            ScanEvent::DecodeFailed("no barcode in frame".into()),
            ScanEvent::Decoded("385 0104022517".into()),
            ScanEvent::DecodeFailed("no barcode in frame".into()),
        ]);
        let stream = scanner.start(&Constraints::default()).await.unwrap();
        assert_eq!(decoded(stream).collect::<Vec<_>>().await, vec!["385 0104022517".to_string()]);
    }
}
