use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Interval, MissedTickBehavior};

use crate::common::{ApiCommand, ApiEvent, ConnectionState};

use super::client::BridgeApi;
use super::poller::{FAST_POLL, PollPlanner};

/// Background task that owns the poll loop and runs every backend call.
///
/// The loop is strictly sequential: each tick and each command is awaited to
/// completion before the next is taken, so poll ticks can never overlap and
/// no busy-flag juggling is needed on this side.
pub struct ApiWorker<A> {
    api: A,
    event_sender: mpsc::Sender<ApiEvent>,
    command_receiver: mpsc::Receiver<ApiCommand>,
    planner: PollPlanner,
}

impl<A: BridgeApi> ApiWorker<A> {
    pub fn new(
        api: A,
        event_sender: mpsc::Sender<ApiEvent>,
        command_receiver: mpsc::Receiver<ApiCommand>,
    ) -> Self {
        Self {
            api,
            event_sender,
            command_receiver,
            planner: PollPlanner::new(),
        }
    }

    pub async fn run(mut self) {
        log::info!("API worker started");
        let mut ticker = make_ticker(FAST_POLL, true);

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(ApiCommand::Shutdown) | None => break,
                        Some(command) => self.handle_command(command).await,
                    }
                }
                _ = ticker.tick() => {
                    if let Some(period) = self.poll_once().await {
                        log::info!("Poll cadence now {period:?}");
                        ticker = make_ticker(period, false);
                    }
                }
            }
        }
        log::info!("API worker stopped");
    }

    /// One status tick. Returns the new poll period when the cadence changed.
    async fn poll_once(&mut self) -> Option<Duration> {
        let report = self.api.check_status().await;
        let plan = self.planner.observe(report.state);
        if !plan.changed {
            return None;
        }

        log::info!("Bridge status changed to {:?} (epoch {})", report.state, plan.epoch);
        self.emit(ApiEvent::Status {
            state: report.state,
            message: report.message,
            epoch: plan.epoch,
        })
        .await;

        if plan.load_chats {
            let chats = self.api.list_chats().await;
            self.emit(ApiEvent::Chats {
                chats,
                epoch: plan.epoch,
            })
            .await;
        }

        if plan.fetch_qr {
            self.fetch_qr().await;
        }

        plan.reschedule
    }

    async fn handle_command(&mut self, command: ApiCommand) {
        match command {
            ApiCommand::LoadMessages { chat_id } => {
                let messages = self.api.list_messages(&chat_id).await;
                self.emit(ApiEvent::Messages { chat_id, messages }).await;
            }
            ApiCommand::SendMessage { chat_id, content } => {
                let outcome = self.api.send_message(&chat_id, &content).await;
                let succeeded = outcome.success;
                self.emit(ApiEvent::SendResult {
                    chat_id: chat_id.clone(),
                    outcome,
                })
                .await;
                // Reload-for-consistency: the displayed list comes back from
                // the backend rather than being appended locally.
                if succeeded {
                    let messages = self.api.list_messages(&chat_id).await;
                    self.emit(ApiEvent::Messages { chat_id, messages }).await;
                }
            }
            ApiCommand::RefreshQr => {
                // Refresh only makes sense while the bridge still wants
                // pairing; a stale click after a status flip is dropped.
                if self.planner.state() == Some(ConnectionState::WaitingForQr) {
                    self.fetch_qr().await;
                } else {
                    log::debug!("Ignoring QR refresh outside the pairing state");
                }
            }
            // Shutdown is consumed by the select loop before we get here.
            ApiCommand::Shutdown => {}
        }
    }

    async fn fetch_qr(&mut self) {
        let result = self.api.fetch_qr().await;
        if let Err(err) = &result {
            log::warn!("QR fetch failed: {err}");
        }
        self.emit(ApiEvent::Qr {
            result,
            epoch: self.planner.epoch(),
        })
        .await;
    }

    async fn emit(&self, event: ApiEvent) {
        if self.event_sender.send(event).await.is_err() {
            log::debug!("UI event channel closed");
        }
    }
}

fn make_ticker(period: Duration, immediate: bool) -> Interval {
    let mut ticker = time::interval(period);
    // A slow backend call can outlive the period; skip the backlog instead of
    // firing a burst of catch-up ticks.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    if !immediate {
        ticker.reset();
    }
    ticker
}
