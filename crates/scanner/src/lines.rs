use crate::error::{ErrorKind, Result};
use crate::{Constraints, ScanEvent, ScanStream, Scanner};
use async_stream::stream;
use async_trait::async_trait;
use exn::OptionExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::oneshot;

/// A scanner that reads one decoded barcode per line.
///
/// This is what a USB or Bluetooth barcode reader in keyboard-wedge mode looks
/// like from a terminal: the device "types" the digits followed by Enter. Feed
/// it `BufReader::new(tokio::io::stdin())` and every non-blank line becomes a
/// [`ScanEvent::Decoded`], untrimmed. A line that is not valid UTF-8 becomes
/// a [`ScanEvent::DecodeFailed`] and reading carries on; only a failing
/// reader ends the stream.
///
/// The input can only be consumed once; starting again after the input is
/// exhausted (or while it is still being read) fails with
/// [`AlreadyStarted`](ErrorKind::AlreadyStarted). Dropping the scanner ends
/// its stream just like [`stop()`](Scanner::stop) does.
pub struct LineScanner<R> {
    name: String,
    input: Option<R>,
    stop: Option<oneshot::Sender<()>>,
}

impl<R> LineScanner<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    pub fn new(name: impl Into<String>, input: R) -> Self {
        Self {
            name: name.into(),
            input: Some(input),
            stop: None,
        }
    }
}

#[async_trait]
impl<R> Scanner for LineScanner<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&mut self, constraints: &Constraints) -> Result<ScanStream> {
        // Line input has no camera to configure, but nonsense is still nonsense.
        constraints.validate()?;
        let input = self.input.take().ok_or_raise(|| ErrorKind::AlreadyStarted)?;
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        self.stop = Some(stop_tx);
        tracing::debug!(scanner = %self.name, "Reading barcodes line by line");

        Ok(Box::pin(stream! {
            let mut segments = input.split(b'\n');
            loop {
                let segment = tokio::select! {
                    _ = &mut stop_rx => break,
                    segment = segments.next_segment() => segment,
                };
                match segment {
                    Ok(Some(bytes)) => match String::from_utf8(bytes) {
                        Ok(mut line) => {
                            if line.ends_with('\r') {
                                line.pop();
                            }
                            if line.trim().is_empty() {
                                continue;
                            }
                            yield ScanEvent::Decoded(line);
                        },
                        // One garbled scan; the next line is still readable.
                        Err(err) => {
                            yield ScanEvent::DecodeFailed(err.to_string());
                        },
                    },
                    Ok(None) => break,
                    Err(err) => {
                        tracing::warn!(error = %err, "Barcode input failed, stopping");
                        yield ScanEvent::DecodeFailed(err.to_string());
                        break;
                    },
                }
            }
        }))
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(stop) = self.stop.take() {
            // The stream may already have finished and dropped its receiver.
            let _ = stop.send(());
        }
        Ok(())
    }
}
