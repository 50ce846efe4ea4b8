use std::time::Duration;

use crate::common::types::ConnectionState;

/// Poll quickly while the user is blocked on connecting or pairing.
pub const FAST_POLL: Duration = Duration::from_secs(5);
/// Once connected the status rarely changes; back off.
pub const SLOW_POLL: Duration = Duration::from_secs(30);

/// What one status observation asks the worker to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickPlan {
    /// Epoch the observation belongs to. Bumped on every state transition so
    /// results of work started under an older state can be discarded.
    pub epoch: u64,
    /// State changed since the previous tick (always true on the first).
    pub changed: bool,
    /// Entered `Connected`: load the chat list, exactly once per entry.
    pub load_chats: bool,
    /// Entered `WaitingForQr`: fetch the QR, exactly once per entry.
    pub fetch_qr: bool,
    /// The poll interval must be restarted with this period.
    pub reschedule: Option<Duration>,
}

/// Pure transition logic for the poll loop. Tracks the last reported state
/// and turns each new report into one-shot entry actions plus the cadence the
/// timer should run at.
#[derive(Debug, Default)]
pub struct PollPlanner {
    last: Option<ConnectionState>,
    epoch: u64,
}

pub fn cadence(state: ConnectionState) -> Duration {
    match state {
        ConnectionState::Connected => SLOW_POLL,
        ConnectionState::Disconnected | ConnectionState::WaitingForQr => FAST_POLL,
    }
}

impl PollPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn state(&self) -> Option<ConnectionState> {
        self.last
    }

    pub fn observe(&mut self, state: ConnectionState) -> TickPlan {
        let changed = self.last != Some(state);
        if changed {
            self.epoch += 1;
        }

        let reschedule = match (changed, self.last) {
            // First observation: the loop starts at the fast cadence, so only
            // reschedule when the first state is already connected.
            (true, None) => (cadence(state) != FAST_POLL).then(|| cadence(state)),
            (true, Some(prev)) => (cadence(prev) != cadence(state)).then(|| cadence(state)),
            (false, _) => None,
        };

        self.last = Some(state);

        TickPlan {
            epoch: self.epoch,
            changed,
            load_chats: changed && state == ConnectionState::Connected,
            fetch_qr: changed && state == ConnectionState::WaitingForQr,
            reschedule,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConnectionState::{Connected, Disconnected, WaitingForQr};

    #[test]
    fn first_tick_counts_as_a_transition() {
        let mut planner = PollPlanner::new();
        let plan = planner.observe(Disconnected);
        assert!(plan.changed);
        assert_eq!(plan.epoch, 1);
        assert!(!plan.load_chats);
        assert!(!plan.fetch_qr);
        assert_eq!(plan.reschedule, None);
    }

    #[test]
    fn chats_load_once_per_connected_entry_not_per_tick() {
        let mut planner = PollPlanner::new();
        assert!(planner.observe(Connected).load_chats);
        assert!(!planner.observe(Connected).load_chats);
        assert!(!planner.observe(Connected).load_chats);

        // Drop and reconnect: a fresh entry loads again.
        planner.observe(Disconnected);
        assert!(planner.observe(Connected).load_chats);
    }

    #[test]
    fn qr_fetch_once_per_waiting_entry() {
        let mut planner = PollPlanner::new();
        planner.observe(Disconnected);
        assert!(planner.observe(WaitingForQr).fetch_qr);
        assert!(!planner.observe(WaitingForQr).fetch_qr);

        planner.observe(Connected);
        assert!(planner.observe(WaitingForQr).fetch_qr);
    }

    #[test]
    fn epoch_bumps_only_on_transitions() {
        let mut planner = PollPlanner::new();
        planner.observe(Disconnected);
        planner.observe(Disconnected);
        assert_eq!(planner.epoch(), 1);
        planner.observe(WaitingForQr);
        assert_eq!(planner.epoch(), 2);
        planner.observe(Connected);
        planner.observe(Connected);
        assert_eq!(planner.epoch(), 3);
    }

    #[test]
    fn cadence_slows_on_connect_and_speeds_up_on_drop() {
        let mut planner = PollPlanner::new();
        planner.observe(Disconnected);

        let plan = planner.observe(Connected);
        assert_eq!(plan.reschedule, Some(SLOW_POLL));

        // Connected -> disconnected mid-session flips back to fast.
        let plan = planner.observe(Disconnected);
        assert_eq!(plan.reschedule, Some(FAST_POLL));
    }

    #[test]
    fn waiting_and_disconnected_share_the_fast_cadence() {
        let mut planner = PollPlanner::new();
        planner.observe(Disconnected);
        let plan = planner.observe(WaitingForQr);
        assert!(plan.changed);
        assert_eq!(plan.reschedule, None);
    }

    #[test]
    fn connected_as_first_state_reschedules_immediately() {
        let mut planner = PollPlanner::new();
        let plan = planner.observe(Connected);
        assert!(plan.load_chats);
        assert_eq!(plan.reschedule, Some(SLOW_POLL));
    }
}
