//! Language detection service.
//!
//! Feeds enumerated documents through a fixed pool of workers, each running
//! the [`DocumentAnalyzer`] on the blocking thread pool. Separated from UI
//! concerns - emits events for progress tracking.

mod analyzer;
mod discovery;
mod types;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

pub use analyzer::{AnalyzerSettings, DocumentAnalyzer};
pub use discovery::enumerate_documents;
pub use types::{DetectionEvent, DetectionResult, Document};

/// Service for analysing a batch of documents.
pub struct DetectionService {
    analyzer: Arc<DocumentAnalyzer>,
    resume: bool,
}

impl DetectionService {
    /// Create a new detection service.
    ///
    /// With `resume`, documents that already have a verdict are skipped.
    pub fn new(analyzer: DocumentAnalyzer, resume: bool) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            resume,
        }
    }

    /// Analyse `documents` with `workers` concurrent workers.
    ///
    /// Sends one outcome event per document on `event_tx` as it finishes and
    /// returns once every document has one. A failing or panicking analysis
    /// only fails its own document.
    pub async fn detect(
        &self,
        documents: Vec<Document>,
        workers: usize,
        event_tx: mpsc::Sender<DetectionEvent>,
    ) -> DetectionResult {
        let workers = workers.max(1);
        let discovered = documents.len();

        let succeeded = Arc::new(AtomicUsize::new(0));
        let skipped = Arc::new(AtomicUsize::new(0));
        let failed = Arc::new(AtomicUsize::new(0));
        let failures = Arc::new(Mutex::new(Vec::new()));

        let (queue_tx, queue_rx) = mpsc::channel::<Document>(workers);
        let queue_rx = Arc::new(Mutex::new(queue_rx));

        let mut handles = Vec::with_capacity(workers);

        for worker_id in 0..workers {
            let analyzer = self.analyzer.clone();
            let resume = self.resume;
            let queue_rx = queue_rx.clone();
            let succeeded = succeeded.clone();
            let skipped = skipped.clone();
            let failed = failed.clone();
            let failures = failures.clone();
            let event_tx = event_tx.clone();

            let handle = tokio::spawn(async move {
                loop {
                    let next = { queue_rx.lock().await.recv().await };
                    let Some(document) = next else {
                        break;
                    };
                    let path = document.source.clone();

                    if resume && document.output.is_complete() {
                        tracing::debug!(document = %path.display(), "already analysed, skipping");
                        skipped.fetch_add(1, Ordering::Relaxed);
                        let _ = event_tx
                            .send(DetectionEvent::Skipped {
                                worker_id,
                                document: path,
                            })
                            .await;
                        continue;
                    }

                    let _ = event_tx
                        .send(DetectionEvent::Started {
                            worker_id,
                            document: path.clone(),
                        })
                        .await;

                    let job = analyzer.clone();
                    let outcome =
                        tokio::task::spawn_blocking(move || job.analyze(&document)).await;

                    let event = match outcome {
                        Ok(Ok(lang)) => {
                            succeeded.fetch_add(1, Ordering::Relaxed);
                            DetectionEvent::Completed {
                                worker_id,
                                document: path,
                                lang,
                            }
                        }
                        Ok(Err(e)) => {
                            tracing::warn!(stage = %e.stage, "{}", e);
                            failed.fetch_add(1, Ordering::Relaxed);
                            failures.lock().await.push((path.clone(), e.to_string()));
                            DetectionEvent::Failed {
                                worker_id,
                                document: path,
                                error: e.to_string(),
                            }
                        }
                        Err(e) => {
                            tracing::error!("Analysis of {} panicked: {}", path.display(), e);
                            failed.fetch_add(1, Ordering::Relaxed);
                            let error = format!("analysis panicked: {}", e);
                            failures.lock().await.push((path.clone(), error.clone()));
                            DetectionEvent::Failed {
                                worker_id,
                                document: path,
                                error,
                            }
                        }
                    };
                    let _ = event_tx.send(event).await;
                }
            });

            handles.push(handle);
        }

        // Workers hold their own senders; ours must not keep the channel open.
        drop(event_tx);

        for document in documents {
            if queue_tx.send(document).await.is_err() {
                tracing::error!("All detection workers exited early");
                break;
            }
        }
        drop(queue_tx);

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!("Detection worker failed: {}", e);
            }
        }

        let failures = std::mem::take(&mut *failures.lock().await);
        DetectionResult {
            discovered,
            succeeded: succeeded.load(Ordering::Relaxed),
            skipped: skipped.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
            failures,
        }
    }
}
