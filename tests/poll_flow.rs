//! Drives the API worker with a scripted backend over paused tokio time and
//! checks the polling contract: one chat load per connected entry, one QR
//! fetch per pairing entry, refresh semantics, and the send failure path.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use bridgechat::api::{ApiError, ApiWorker, BridgeApi};
use bridgechat::common::{
    ApiCommand, ApiEvent, Chat, ChatMessage, ConnectionState, SendOutcome, Sender, StatusReport,
};

struct Shared {
    /// Status returned per poll tick; the last entry repeats once drained.
    statuses: Mutex<VecDeque<ConnectionState>>,
    last_status: Mutex<ConnectionState>,
    chat_loads: AtomicUsize,
    message_loads: AtomicUsize,
    qr_fetches: AtomicUsize,
    fail_sends: bool,
}

#[derive(Clone)]
struct ScriptedApi {
    shared: Arc<Shared>,
}

impl ScriptedApi {
    fn new(script: &[ConnectionState], fail_sends: bool) -> Self {
        Self {
            shared: Arc::new(Shared {
                statuses: Mutex::new(script.iter().copied().collect()),
                last_status: Mutex::new(ConnectionState::Disconnected),
                chat_loads: AtomicUsize::new(0),
                message_loads: AtomicUsize::new(0),
                qr_fetches: AtomicUsize::new(0),
                fail_sends,
            }),
        }
    }
}

impl BridgeApi for ScriptedApi {
    async fn check_status(&self) -> StatusReport {
        let mut last = self.shared.last_status.lock().unwrap();
        if let Some(state) = self.shared.statuses.lock().unwrap().pop_front() {
            *last = state;
        }
        StatusReport {
            state: *last,
            message: None,
        }
    }

    async fn list_chats(&self) -> Vec<Chat> {
        self.shared.chat_loads.fetch_add(1, Ordering::SeqCst);
        vec![Chat {
            id: "c1".to_string(),
            name: "Alice".to_string(),
            last_message: Some("hi".to_string()),
            timestamp: 1_700_000_000_000,
        }]
    }

    async fn list_messages(&self, chat_id: &str) -> Vec<ChatMessage> {
        self.shared.message_loads.fetch_add(1, Ordering::SeqCst);
        vec![ChatMessage {
            id: format!("{chat_id}-m1"),
            content: "hello".to_string(),
            timestamp: 1_700_000_000_000,
            sender: Sender::Bot,
        }]
    }

    async fn send_message(&self, _chat_id: &str, _content: &str) -> SendOutcome {
        if self.shared.fail_sends {
            SendOutcome::failure("Send failed: HTTP 500 Internal Server Error")
        } else {
            SendOutcome::sent("Message sent")
        }
    }

    async fn fetch_qr(&self) -> Result<Vec<u8>, ApiError> {
        self.shared.qr_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0x89, b'P', b'N', b'G'])
    }
}

struct Harness {
    shared: Arc<Shared>,
    commands: mpsc::Sender<ApiCommand>,
    events: mpsc::Receiver<ApiEvent>,
}

fn start(script: &[ConnectionState], fail_sends: bool) -> Harness {
    let api = ScriptedApi::new(script, fail_sends);
    let shared = Arc::clone(&api.shared);
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::channel(64);
    tokio::spawn(ApiWorker::new(api, event_tx, cmd_rx).run());
    Harness {
        shared,
        commands: cmd_tx,
        events: event_rx,
    }
}

impl Harness {
    async fn next_event(&mut self) -> ApiEvent {
        self.events
            .recv()
            .await
            .expect("worker closed event channel")
    }

    async fn expect_status(&mut self, expected: ConnectionState) -> u64 {
        match self.next_event().await {
            ApiEvent::Status { state, epoch, .. } => {
                assert_eq!(state, expected);
                epoch
            }
            other => panic!("expected status event, got {other:?}"),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn entry_actions_fire_once_per_transition() {
    use ConnectionState::{Connected, Disconnected, WaitingForQr};

    let mut harness = start(
        &[
            Disconnected,
            WaitingForQr,
            WaitingForQr,
            WaitingForQr,
            Connected,
            Connected,
            Connected,
            Disconnected,
        ],
        false,
    );

    let e1 = harness.expect_status(Disconnected).await;

    let e2 = harness.expect_status(WaitingForQr).await;
    assert!(e2 > e1);
    match harness.next_event().await {
        ApiEvent::Qr { result, epoch } => {
            assert!(result.is_ok());
            assert_eq!(epoch, e2);
        }
        other => panic!("expected QR event, got {other:?}"),
    }

    let e3 = harness.expect_status(Connected).await;
    match harness.next_event().await {
        ApiEvent::Chats { chats, epoch } => {
            assert_eq!(chats.len(), 1);
            assert_eq!(epoch, e3);
        }
        other => panic!("expected chats event, got {other:?}"),
    }

    harness.expect_status(Disconnected).await;

    // Repeated ticks in the same state triggered no extra work.
    assert_eq!(harness.shared.qr_fetches.load(Ordering::SeqCst), 1);
    assert_eq!(harness.shared.chat_loads.load(Ordering::SeqCst), 1);

    let _ = harness.commands.send(ApiCommand::Shutdown).await;
}

#[tokio::test(start_paused = true)]
async fn manual_refresh_refetches_only_while_pairing() {
    use ConnectionState::WaitingForQr;

    let mut harness = start(&[WaitingForQr], false);
    harness.expect_status(WaitingForQr).await;
    assert!(matches!(harness.next_event().await, ApiEvent::Qr { .. }));

    harness
        .commands
        .send(ApiCommand::RefreshQr)
        .await
        .expect("worker gone");
    assert!(matches!(harness.next_event().await, ApiEvent::Qr { .. }));
    assert_eq!(harness.shared.qr_fetches.load(Ordering::SeqCst), 2);

    let _ = harness.commands.send(ApiCommand::Shutdown).await;
}

#[tokio::test(start_paused = true)]
async fn refresh_outside_pairing_is_ignored() {
    use ConnectionState::Connected;

    let mut harness = start(&[Connected], false);
    harness.expect_status(Connected).await;
    assert!(matches!(harness.next_event().await, ApiEvent::Chats { .. }));

    harness
        .commands
        .send(ApiCommand::RefreshQr)
        .await
        .expect("worker gone");
    harness
        .commands
        .send(ApiCommand::LoadMessages {
            chat_id: "c1".to_string(),
        })
        .await
        .expect("worker gone");

    // The next event is the message list; no QR event slipped in between.
    match harness.next_event().await {
        ApiEvent::Messages { chat_id, messages } => {
            assert_eq!(chat_id, "c1");
            assert_eq!(messages.len(), 1);
        }
        other => panic!("expected messages event, got {other:?}"),
    }
    assert_eq!(harness.shared.qr_fetches.load(Ordering::SeqCst), 0);

    let _ = harness.commands.send(ApiCommand::Shutdown).await;
}

#[tokio::test(start_paused = true)]
async fn failed_send_reports_the_reason_and_skips_the_reload() {
    use ConnectionState::Connected;

    let mut harness = start(&[Connected], true);
    harness.expect_status(Connected).await;
    assert!(matches!(harness.next_event().await, ApiEvent::Chats { .. }));

    harness
        .commands
        .send(ApiCommand::SendMessage {
            chat_id: "c1".to_string(),
            content: "hello".to_string(),
        })
        .await
        .expect("worker gone");

    match harness.next_event().await {
        ApiEvent::SendResult { chat_id, outcome } => {
            assert_eq!(chat_id, "c1");
            assert!(!outcome.success);
            assert!(outcome.message.contains("HTTP 500"));
        }
        other => panic!("expected send result, got {other:?}"),
    }
    assert_eq!(harness.shared.message_loads.load(Ordering::SeqCst), 0);

    let _ = harness.commands.send(ApiCommand::Shutdown).await;
}

#[tokio::test(start_paused = true)]
async fn successful_send_reloads_the_chat() {
    use ConnectionState::Connected;

    let mut harness = start(&[Connected], false);
    harness.expect_status(Connected).await;
    assert!(matches!(harness.next_event().await, ApiEvent::Chats { .. }));

    harness
        .commands
        .send(ApiCommand::SendMessage {
            chat_id: "c1".to_string(),
            content: "hello".to_string(),
        })
        .await
        .expect("worker gone");

    match harness.next_event().await {
        ApiEvent::SendResult { outcome, .. } => assert!(outcome.success),
        other => panic!("expected send result, got {other:?}"),
    }
    match harness.next_event().await {
        ApiEvent::Messages { chat_id, .. } => assert_eq!(chat_id, "c1"),
        other => panic!("expected reload event, got {other:?}"),
    }
    assert_eq!(harness.shared.message_loads.load(Ordering::SeqCst), 1);

    let _ = harness.commands.send(ApiCommand::Shutdown).await;
}
