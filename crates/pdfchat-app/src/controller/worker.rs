//! Background worker that runs uploads and exchanges off the UI thread.
//!
//! Requests arrive on a std channel; each one runs as its own tokio task
//! and reports back through the event sink, so replies may complete in
//! any order. Tickets let the controller match them up.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use pdfchat_api::DocumentChat;
use tracing::debug;

use super::types::{WorkerEvent, WorkerRequest};

/// Callback that delivers worker events to the owning thread.
pub type EventSink = Arc<dyn Fn(WorkerEvent) + Send + Sync>;

/// Owns the tokio runtime that network calls run on.
pub struct Worker {
    runtime: tokio::runtime::Runtime,
}

impl Worker {
    /// Start the runtime and the dispatch loop.
    ///
    /// Returns the worker and the sender used to submit requests. The
    /// dispatch loop ends once every sender has been dropped.
    pub fn start(
        client: Arc<dyn DocumentChat>,
        sink: EventSink,
    ) -> std::io::Result<(Self, Sender<WorkerRequest>)> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("pdfchat-worker")
            .enable_all()
            .build()?;

        let (request_tx, request_rx) = std::sync::mpsc::channel::<WorkerRequest>();
        runtime.spawn(dispatch_task(client, request_rx, sink));

        Ok((Self { runtime }, request_tx))
    }

    /// Stop the runtime, giving in-flight calls a moment to finish.
    pub fn shutdown(self) {
        self.runtime.shutdown_timeout(Duration::from_secs(1));
    }
}

async fn dispatch_task(
    client: Arc<dyn DocumentChat>,
    request_rx: Receiver<WorkerRequest>,
    sink: EventSink,
) {
    while let Ok(request) = tokio::task::block_in_place(|| request_rx.recv()) {
        tokio::spawn(run_request(Arc::clone(&client), request, Arc::clone(&sink)));
    }
    debug!("Worker request channel closed");
}

async fn run_request(client: Arc<dyn DocumentChat>, request: WorkerRequest, sink: EventSink) {
    let event = match request {
        WorkerRequest::Upload { ticket, path } => {
            debug!(%ticket, path = %path.display(), "Running upload");
            let result = client.upload(&path).await;
            WorkerEvent::Uploaded { ticket, result }
        }
        WorkerRequest::Exchange {
            ticket,
            session,
            prompt,
        } => {
            debug!(%ticket, source_id = %session.source_id(), "Running exchange");
            let result = client.exchange(&session, &prompt).await;
            WorkerEvent::Replied { ticket, result }
        }
    };
    sink(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::mpsc;

    use async_trait::async_trait;
    use pdfchat_api::DocumentSession;
    use pdfchat_common::{PdfChatError, Ticket};

    /// Answers instantly, except prompts starting with "slow" which wait.
    struct FakeChat;

    #[async_trait]
    impl DocumentChat for FakeChat {
        async fn upload(&self, path: &Path) -> Result<DocumentSession, PdfChatError> {
            Ok(DocumentSession::new("src_fake", path))
        }

        async fn exchange(
            &self,
            _session: &DocumentSession,
            prompt: &str,
        ) -> Result<String, PdfChatError> {
            if prompt.starts_with("slow") {
                tokio::time::sleep(Duration::from_millis(300)).await;
            }
            Ok(format!("re: {prompt}"))
        }
    }

    fn start() -> (Worker, Sender<WorkerRequest>, mpsc::Receiver<WorkerEvent>) {
        let (event_tx, event_rx) = mpsc::channel();
        let sink: EventSink = Arc::new(move |event| {
            let _ = event_tx.send(event);
        });
        let (worker, request_tx) = Worker::start(Arc::new(FakeChat), sink).unwrap();
        (worker, request_tx, event_rx)
    }

    #[test]
    fn upload_result_carries_ticket() {
        let (worker, tx, rx) = start();
        let ticket = Ticket::new();
        tx.send(WorkerRequest::Upload {
            ticket: ticket.clone(),
            path: "paper.pdf".into(),
        })
        .unwrap();

        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            WorkerEvent::Uploaded { ticket: t, result } => {
                assert_eq!(t, ticket);
                assert_eq!(result.unwrap().source_id(), "src_fake");
            }
            other => panic!("unexpected event: {other:?}"),
        }

        drop(tx);
        worker.shutdown();
    }

    #[test]
    fn exchanges_run_concurrently_and_may_finish_out_of_order() {
        let (worker, tx, rx) = start();
        let session = DocumentSession::new("src_fake", "paper.pdf");
        let slow = Ticket::new();
        let fast = Ticket::new();

        tx.send(WorkerRequest::Exchange {
            ticket: slow.clone(),
            session: session.clone(),
            prompt: "slow question".into(),
        })
        .unwrap();
        tx.send(WorkerRequest::Exchange {
            ticket: fast.clone(),
            session,
            prompt: "quick question".into(),
        })
        .unwrap();

        let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let second = rx.recv_timeout(Duration::from_secs(5)).unwrap();

        match (first, second) {
            (
                WorkerEvent::Replied { ticket: t1, result: r1 },
                WorkerEvent::Replied { ticket: t2, result: r2 },
            ) => {
                assert_eq!(t1, fast);
                assert_eq!(r1.unwrap(), "re: quick question");
                assert_eq!(t2, slow);
                assert_eq!(r2.unwrap(), "re: slow question");
            }
            other => panic!("unexpected events: {other:?}"),
        }

        drop(tx);
        worker.shutdown();
    }
}
