use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use teloxide::types::ChatId;
use tokio::time::timeout;

use super::directory::RecipientDirectory;
use super::draft::DraftMessage;
use super::transport::{MessageTransport, TransportError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    Failed(String),
    /// The draft had no delivery method; nothing was sent.
    Skipped,
}

/// Result of one broadcast run, in directory order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub outcomes: Vec<(ChatId, DeliveryOutcome)>,
    pub directory_error: Option<String>,
}

impl DeliveryReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn sent(&self) -> usize {
        self.count(|o| matches!(o, DeliveryOutcome::Sent))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DeliveryOutcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, DeliveryOutcome::Skipped))
    }

    fn count(&self, pred: impl Fn(&DeliveryOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

impl fmt::Display for DeliveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={} sent={} failed={} skipped={}",
            self.total(),
            self.sent(),
            self.failed(),
            self.skipped()
        )?;
        if let Some(err) = &self.directory_error {
            write!(f, " directory_error={}", err)?;
        }
        Ok(())
    }
}

/// Sends one draft to every recipient. Each attempt is bounded by `send_timeout`
/// and at most `concurrency` attempts are in flight; a failed attempt is final.
pub struct FanoutDispatcher {
    directory: Arc<dyn RecipientDirectory>,
    transport: Arc<dyn MessageTransport>,
    concurrency: usize,
    send_timeout: Duration,
}

impl FanoutDispatcher {
    pub fn new(
        directory: Arc<dyn RecipientDirectory>,
        transport: Arc<dyn MessageTransport>,
        concurrency: usize,
        send_timeout: Duration,
    ) -> Self {
        Self {
            directory,
            transport,
            concurrency: concurrency.max(1),
            send_timeout,
        }
    }

    pub async fn dispatch(&self, draft: &DraftMessage) -> DeliveryReport {
        let recipients = match self.directory.fetch_all_recipients().await {
            Ok(recipients) => recipients,
            Err(e) => {
                log::error!("Broadcast aborted, no recipients obtained: {}", e);
                return DeliveryReport {
                    outcomes: Vec::new(),
                    directory_error: Some(e.to_string()),
                };
            }
        };

        if *draft == DraftMessage::Unsupported {
            log::warn!("Unsupported message type for broadcast, skipping {} recipients", recipients.len());
            return DeliveryReport {
                outcomes: recipients
                    .iter()
                    .map(|r| (r.target, DeliveryOutcome::Skipped))
                    .collect(),
                directory_error: None,
            };
        }

        log::info!("Broadcasting {} message to {} recipients", draft.kind(), recipients.len());

        // `buffered` keeps directory order regardless of completion order
        let outcomes = stream::iter(recipients)
            .map(|recipient| self.deliver(recipient.target, draft))
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        let report = DeliveryReport { outcomes, directory_error: None };
        log::info!("Broadcast finished: {}", report);
        report
    }

    async fn deliver(&self, target: ChatId, draft: &DraftMessage) -> (ChatId, DeliveryOutcome) {
        let result = match timeout(self.send_timeout, self.transport.send_draft(target, draft)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(self.send_timeout)),
        };

        match result {
            Ok(()) => (target, DeliveryOutcome::Sent),
            Err(e) => {
                log::warn!("Failed to send broadcast to {}: {}", target.0, e);
                (target, DeliveryOutcome::Failed(e.to_string()))
            }
        }
    }
}
