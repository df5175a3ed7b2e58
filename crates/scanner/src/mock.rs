//! Scripted scanner for testing.

use crate::error::{ErrorKind, Result};
use crate::{Constraints, ScanEvent, ScanStream, Scanner};
use async_trait::async_trait;

type Reject = Box<dyn Fn(&Constraints) -> bool + Send + Sync>;

/// Scanner that replays a fixed list of events every time it starts.
///
/// Records the constraints of every start attempt, successful or not, so
/// tests can check what fallback happened.
///
/// # Examples
///
/// ```
/// use bezglutena_scanner::{Constraints, MockScanner, ScanEvent, Scanner};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut scanner = MockScanner::new([ScanEvent::Decoded("3850104022517".into())])
///     .rejecting(|constraints| constraints.aspect_ratio.is_some());
/// assert!(scanner.start(&Constraints::default()).await.is_err());
/// assert!(scanner.start(&Constraints::relaxed()).await.is_ok());
/// assert_eq!(scanner.starts().len(), 2);
/// # }
/// ```
pub struct MockScanner {
    events: Vec<ScanEvent>,
    reject: Option<Reject>,
    starts: Vec<Constraints>,
    running: bool,
    stops: usize,
    fail_stop: bool,
}

impl MockScanner {
    pub fn new(events: impl IntoIterator<Item = ScanEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            reject: None,
            starts: Vec::new(),
            running: false,
            stops: 0,
            fail_stop: false,
        }
    }

    /// Refuse to start whenever `reject` returns `true` for the requested
    /// constraints, like a camera that can't do the requested resolution.
    pub fn rejecting(mut self, reject: impl Fn(&Constraints) -> bool + Send + Sync + 'static) -> Self {
        self.reject = Some(Box::new(reject));
        self
    }

    /// Fail every [`stop()`](Scanner::stop) of a running scanner, like a
    /// device that was unplugged mid-scan.
    pub fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    /// Constraints of every start attempt, in order.
    pub fn starts(&self) -> &[Constraints] {
        &self.starts
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of times [`stop()`](Scanner::stop) was called while running.
    pub fn stops(&self) -> usize {
        self.stops
    }
}

#[async_trait]
impl Scanner for MockScanner {
    fn name(&self) -> &str {
        "mock"
    }

    async fn start(&mut self, constraints: &Constraints) -> Result<ScanStream> {
        self.starts.push(*constraints);
        constraints.validate()?;
        if let Some(reject) = &self.reject
            && reject(constraints)
        {
            exn::bail!(ErrorKind::InvalidConstraints(format!("{constraints:?}")));
        }
        self.running = true;
        Ok(Box::pin(futures::stream::iter(self.events.clone())))
    }

    async fn stop(&mut self) -> Result<()> {
        if self.running {
            self.running = false;
            self.stops += 1;
            if self.fail_stop {
                exn::bail!(ErrorKind::Device("device went away".to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let mut scanner = MockScanner::new([]);
        scanner.stop().await.unwrap();
        assert_eq!(scanner.stops(), 0);

        let _stream = scanner.start(&Constraints::default()).await.unwrap();
        assert!(scanner.is_running());
        scanner.stop().await.unwrap();
        scanner.stop().await.unwrap();
        assert!(!scanner.is_running());
        assert_eq!(scanner.stops(), 1);
    }

    #[tokio::test]
    async fn test_failing_stop() {
        let mut scanner = MockScanner::new([]).failing_stop();
        let _stream = scanner.start(&Constraints::default()).await.unwrap();
        let err = scanner.stop().await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Device(_)));
        assert!(!scanner.is_running());
    }

    #[tokio::test]
    async fn test_rejected_start_is_recorded() {
        let mut scanner = MockScanner::new([]).rejecting(|_| true);
        let err = scanner.start(&Constraints::relaxed()).await.err().unwrap();
        assert!(matches!(&*err, ErrorKind::InvalidConstraints(_)));
        assert_eq!(scanner.starts(), &[Constraints::relaxed()]);
        assert!(!scanner.is_running());
    }
}
