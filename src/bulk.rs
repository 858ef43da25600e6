//! Bulk Orchestrator — scheduling many single-identifier fetches
//!
//! Two deliberately distinct strategies live behind [`ScrapeStrategy::run`]:
//!
//! - **Sequential-with-retry**: one identifier at a time, each under the
//!   jittered retry ladder from [`crate::retry`]. Every identifier yields a
//!   recorded outcome, including retry exhaustion.
//! - **Pooled**: `W` workers over a shared queue, gated by a single global
//!   pacing signal (aggregate throughput ≈ one fetch per interval across the
//!   whole pool, not per worker). No automatic retries — each attempt's
//!   error is a final per-identifier outcome; resubmit to retry.
//!
//! Both strategies observe a [`CancellationToken`]; on trigger no new
//! fetches start and the partial outcome list collected so far is returned.

use crate::client::ResultClient;
use crate::retry::fetch_with_retry;
use crate::types::ScrapeOutcome;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// The orchestration strategy a caller picks deliberately.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrapeStrategy {
    /// One identifier at a time with per-identifier retries
    SequentialRetry,
    /// Bounded worker pool with a global pacing cap
    Pooled {
        /// Worker count
        workers: usize,
        /// Pacing interval shared by the whole pool
        pacing: Duration,
    },
}

impl ScrapeStrategy {
    /// Pooled strategy using the client's configured worker count and
    /// pacing interval.
    pub fn pooled_from_config(client: &ResultClient) -> Self {
        Self::Pooled {
            workers: client.config().workers,
            pacing: client.config().pacing_interval,
        }
    }

    /// Run the strategy over `roll_numbers`, returning one outcome per
    /// processed identifier.
    pub async fn run(
        &self,
        client: &ResultClient,
        roll_numbers: &[String],
        cancel: CancellationToken,
    ) -> Vec<ScrapeOutcome> {
        match *self {
            Self::SequentialRetry => scrape_sequential(client, roll_numbers, &cancel).await,
            Self::Pooled { workers, pacing } => {
                scrape_pooled(client, roll_numbers.to_vec(), workers, pacing, cancel).await
            }
        }
    }
}

/// Sequential-with-retry scrape.
///
/// Input order is preserved in the outcome list. Cancellation is observed
/// between identifiers; the in-flight identifier finishes its attempt.
pub async fn scrape_sequential(
    client: &ResultClient,
    roll_numbers: &[String],
    cancel: &CancellationToken,
) -> Vec<ScrapeOutcome> {
    let total = roll_numbers.len();
    let retry = client.config().retry.clone();
    tracing::info!(total, "starting sequential scrape");

    let mut outcomes = Vec::with_capacity(total);
    for roll_number in roll_numbers {
        if cancel.is_cancelled() {
            tracing::info!(
                collected = outcomes.len(),
                total,
                "sequential scrape cancelled, returning partial outcomes"
            );
            break;
        }
        let outcome = match fetch_with_retry(&retry, roll_number, || client.fetch_one(roll_number))
            .await
        {
            Ok(record) => ScrapeOutcome::success(roll_number, record),
            Err(e) => ScrapeOutcome::failure(roll_number, e),
        };
        outcomes.push(outcome);
        tracing::info!(%roll_number, done = outcomes.len(), total, "identifier processed");
    }
    outcomes
}

/// Pooled scrape: feeder + `workers` workers + pacer + collector over
/// bounded channels.
///
/// Output order is completion order. Exactly one outcome per identifier is
/// produced unless cancellation cuts the run short, in which case the
/// partial list is returned.
pub async fn scrape_pooled(
    client: &ResultClient,
    roll_numbers: Vec<String>,
    workers: usize,
    pacing: Duration,
    cancel: CancellationToken,
) -> Vec<ScrapeOutcome> {
    let total = roll_numbers.len();
    if total == 0 || workers == 0 {
        return Vec::new();
    }
    tracing::info!(total, workers, pacing_ms = pacing.as_millis() as u64, "starting pooled scrape");

    let (roll_tx, roll_rx) = mpsc::channel::<String>(workers);
    let roll_rx = Arc::new(Mutex::new(roll_rx));
    let (tick_tx, tick_rx) = mpsc::channel::<()>(1);
    let tick_rx = Arc::new(Mutex::new(tick_rx));
    let (outcome_tx, mut outcome_rx) = mpsc::channel::<ScrapeOutcome>(workers);

    // Pacer: one tick per interval for the whole pool (global cap). Exits
    // when cancelled or when every worker is gone.
    let pacer_cancel = cancel.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(pacing);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                _ = pacer_cancel.cancelled() => break,
                _ = interval.tick() => {
                    if tick_tx.send(()).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Feeder: pushes identifiers until done or cancelled; dropping the
    // sender closes the queue.
    let feeder_cancel = cancel.clone();
    tokio::spawn(async move {
        for roll_number in roll_numbers {
            tokio::select! {
                biased;
                _ = feeder_cancel.cancelled() => return,
                sent = roll_tx.send(roll_number) => {
                    if sent.is_err() {
                        return;
                    }
                }
            }
        }
    });

    for worker in 0..workers {
        let client = client.clone();
        let roll_rx = Arc::clone(&roll_rx);
        let tick_rx = Arc::clone(&tick_rx);
        let outcome_tx = outcome_tx.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            loop {
                let roll_number = {
                    let mut rx = roll_rx.lock().await;
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => None,
                        roll = rx.recv() => roll,
                    }
                };
                let Some(roll_number) = roll_number else { break };

                // Workers compete for pacing ticks; whoever wins issues the
                // next fetch.
                let tick = {
                    let mut rx = tick_rx.lock().await;
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => None,
                        tick = rx.recv() => tick,
                    }
                };
                if tick.is_none() {
                    break;
                }

                let outcome = match client.fetch_one(&roll_number).await {
                    Ok(record) => ScrapeOutcome::success(&roll_number, record),
                    Err(e) => ScrapeOutcome::failure(&roll_number, e),
                };
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    sent = outcome_tx.send(outcome) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!(worker, "worker finished");
        });
    }
    drop(outcome_tx);

    let mut collected = Vec::with_capacity(total);
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(
                    collected = collected.len(),
                    total,
                    "pooled scrape cancelled, returning partial outcomes"
                );
                break;
            }
            outcome = outcome_rx.recv() => {
                match outcome {
                    Some(outcome) => {
                        collected.push(outcome);
                        tracing::info!(progress = collected.len(), total, "outcome collected");
                        if collected.len() == total {
                            break;
                        }
                    }
                    // All workers gone; nothing more will arrive
                    None => break,
                }
            }
        }
    }
    collected
}
