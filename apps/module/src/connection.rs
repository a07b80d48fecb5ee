//! One host connection: newline-delimited JSON requests in, correlated replies out.

use crate::error::{ModuleError, ModuleErrorExt};
use modkit::kernel::error::ErrorKind;
use modkit::kernel::protocol::{Envelope, ErrorBody, Outcome, Reply};
use modkit::kernel::session::Session;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::UnixStream;
use tokio::net::unix::OwnedWriteHalf;
use tokio::sync::{mpsc, watch};
use tracing::{debug, trace, warn};

/// Replies waiting for the writer before request tasks start to wait.
const REPLY_BUFFER: usize = 64;
/// Id used for replies to lines that could not be parsed.
pub(crate) const UNPARSED_ID: u64 = 0;

/// Serves `stream` until the host disconnects or `shutdown` fires.
///
/// Every request runs on its own task, so replies may come back out of order.
/// In-flight requests still get their replies written before the connection closes.
pub(crate) async fn serve(
    stream: UnixStream,
    session: Arc<Session>,
    mut shutdown: watch::Receiver<bool>,
) {
    let (reader, writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();
    let (replies, outgoing) = mpsc::channel(REPLY_BUFFER);
    let writer = tokio::spawn(write_replies(writer, outgoing));

    debug!("Host connected");
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            line = lines.next_line() => match line {
                Ok(Some(line)) => dispatch(&line, &session, &replies).await,
                Ok(None) => break,
                Err(err) => {
                    warn!(error = %err, "Failed to read from host");
                    break;
                }
            },
        }
    }

    drop(replies);
    match writer.await {
        Ok(Ok(())) => debug!("Host connection closed"),
        Ok(Err(err)) => warn!(error = %err, "Failed to write to host"),
        Err(err) => warn!(error = %err, "Reply writer task failed"),
    }
}

async fn dispatch(line: &str, session: &Arc<Session>, replies: &mpsc::Sender<Reply>) {
    if line.trim().is_empty() {
        return;
    }

    match serde_json::from_str::<Envelope>(line) {
        Ok(Envelope { id, request }) => {
            let session = Arc::clone(session);
            let replies = replies.clone();
            tokio::spawn(async move {
                let method = request.method();
                let outcome = session.handle(request);
                trace!(id, method, ok = outcome.is_ok(), "Request handled");
                send(&replies, Reply { id, outcome }).await;
            });
        }
        Err(err) => {
            warn!(error = %err, "Malformed request");
            let body = ErrorBody::new(ErrorKind::MalformedRequest, err.to_string());
            send(replies, Reply { id: UNPARSED_ID, outcome: Outcome::Error(body) }).await;
        }
    }
}

async fn send(replies: &mpsc::Sender<Reply>, reply: Reply) {
    let id = reply.id;
    if replies.send(reply).await.is_err() {
        debug!(id, "Connection closed before reply was written");
    }
}

async fn write_replies(
    writer: OwnedWriteHalf,
    mut outgoing: mpsc::Receiver<Reply>,
) -> Result<(), ModuleError> {
    let mut writer = BufWriter::new(writer);
    while let Some(reply) = outgoing.recv().await {
        let mut line = serde_json::to_vec(&reply).context("Encoding reply")?;
        line.push(b'\n');
        writer.write_all(&line).await.context("Writing reply")?;
        writer.flush().await.context("Flushing reply")?;
    }
    writer.shutdown().await.context("Closing connection")
}
