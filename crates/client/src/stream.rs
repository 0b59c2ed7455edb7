//! Long-lived, newline-delimited stream consumption.

use reqwest::Method;
use shodan_core::{Chunk, ShodanError, StreamHandle};
use tokio::sync::mpsc;
use tracing::{debug, debug_span, instrument, warn, Instrument, Span};

use crate::lines::LineSplitter;
use crate::request::{
    is_failure, record_failure, remote_error, retry_after_secs, transport_error,
};
use crate::Client;

impl Client {
    /// Opens a streaming connection and forwards each body line to `output`.
    ///
    /// Connection setup is awaited here; the body is consumed by a background
    /// task. `Ok` means the server accepted the request with a success status.
    /// From then on the reader:
    ///
    /// - sends every non-blank line (terminator stripped) in arrival order,
    ///   so a body of N newline-terminated lines yields exactly N chunks
    ///   unless some of those lines are blank; blank lines are keep-alives
    ///   and are dropped,
    /// - stops at end of body, on a read error, when the receiver is dropped,
    ///   or when [`StreamHandle::cancel`] is called,
    /// - closes the channel exactly once by dropping the only sender.
    ///
    /// No error is ever sent on the channel; a closed channel is the sole
    /// end-of-stream signal.
    ///
    /// ## Errors
    ///
    /// Returns [`ShodanError::StreamSetup`] wrapping an `InvalidUrl`,
    /// `Transport`, or `Remote` error when the stream could not be started.
    /// In that case nothing is sent and `output` is dropped.
    #[instrument(
        name = "shodan_stream",
        skip(self, url, output),
        fields(
            http.method = %method,
            http.path = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    pub async fn execute_stream_request(
        &self,
        method: Method,
        url: &str,
        output: mpsc::Sender<Chunk>,
    ) -> Result<StreamHandle, ShodanError> {
        let response = self
            .send_request(method, url, None)
            .await
            .map_err(stream_setup)?;

        let status = response.status();
        Span::current().record("http.status_code", status.as_u16());

        if is_failure(status) {
            record_failure(status);
            let retry_after = retry_after_secs(response.headers());
            let body = response
                .bytes()
                .await
                .map_err(|e| stream_setup(transport_error(e)))?;
            return Err(stream_setup(remote_error(status, retry_after, &body)));
        }

        Span::current().record("otel.status_code", "OK");
        debug!("stream established");

        let reader_span = debug_span!("shodan_stream_reader", http.path = response.url().path());
        let task = tokio::spawn(forward_lines(response, output).instrument(reader_span));

        Ok(StreamHandle::new(task))
    }
}

fn stream_setup(source: ShodanError) -> ShodanError {
    ShodanError::StreamSetup {
        source: Box::new(source),
    }
}

/// Reads `response` to the end, forwarding complete lines to `output`.
///
/// `output` is dropped on return, which closes the channel.
async fn forward_lines(mut response: reqwest::Response, output: mpsc::Sender<Chunk>) {
    let mut splitter = LineSplitter::new();
    let mut delivered: u64 = 0;

    loop {
        let frame = tokio::select! {
            frame = response.chunk() => frame,
            () = output.closed() => {
                debug!(delivered, "stream receiver dropped");
                return;
            }
        };

        match frame {
            Ok(Some(bytes)) => {
                for line in splitter.push(&bytes) {
                    if output.send(Chunk::new(line)).await.is_err() {
                        debug!(delivered, "stream receiver dropped");
                        return;
                    }
                    delivered += 1;
                }
            }
            Ok(None) => {
                if splitter.pending() > 0 {
                    debug!(
                        discarded = splitter.pending(),
                        "discarding unterminated trailing line"
                    );
                }
                debug!(delivered, "stream ended");
                return;
            }
            Err(e) => {
                let error = transport_error(e);
                warn!(%error, delivered, "stream read failed");
                return;
            }
        }
    }
}
