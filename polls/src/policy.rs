//! Whether a poll's start and end times gate registration and voting.

use civic_types::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{Poll, PollError};

/// Time-window policy applied by the poll engine.
///
/// With `enforce_time_window` off, `poll_start_time` and `poll_end_time` are
/// informational. A finished poll rejects votes under either setting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollPolicy {
    pub enforce_time_window: bool,
}

impl PollPolicy {
    pub fn enforcing() -> Self {
        Self {
            enforce_time_window: true,
        }
    }

    /// May `poll` accept a vote at `now`?
    pub fn check_vote(&self, poll: &Poll, now: Timestamp) -> Result<(), PollError> {
        if poll.poll_is_finished {
            return Err(PollError::PollFinished(poll.poll_id));
        }
        if !self.enforce_time_window || now.is_within(poll.poll_start_time, poll.poll_end_time) {
            return Ok(());
        }
        if now < poll.poll_start_time {
            Err(PollError::PollNotStarted {
                poll_id: poll.poll_id,
                start: poll.poll_start_time,
            })
        } else {
            Err(ended(poll))
        }
    }

    /// May a candidate be registered in `poll` at `now`? Registration may open
    /// before the voting window does.
    pub fn check_registration(&self, poll: &Poll, now: Timestamp) -> Result<(), PollError> {
        if !self.enforce_time_window || now.is_within(Timestamp::EPOCH, poll.poll_end_time) {
            return Ok(());
        }
        Err(ended(poll))
    }
}

fn ended(poll: &Poll) -> PollError {
    PollError::PollEnded {
        poll_id: poll.poll_id,
        end: poll.poll_end_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_types::Identity;

    fn poll(start: u64, end: u64) -> Poll {
        Poll {
            poll_id: 1,
            poll_name: "p".into(),
            poll_description: String::new(),
            poll_start_time: Timestamp::new(start),
            poll_end_time: Timestamp::new(end),
            poll_is_finished: false,
            total_votes: 0,
            authority: Identity::ZERO,
        }
    }

    #[test]
    fn lenient_policy_ignores_window() {
        let policy = PollPolicy::default();
        let p = poll(100, 200);
        assert!(policy.check_vote(&p, Timestamp::new(0)).is_ok());
        assert!(policy.check_vote(&p, Timestamp::new(500)).is_ok());
        assert!(policy.check_registration(&p, Timestamp::new(500)).is_ok());
    }

    #[test]
    fn enforcing_policy_uses_inclusive_window() {
        let policy = PollPolicy::enforcing();
        let p = poll(100, 200);
        assert_eq!(
            policy.check_vote(&p, Timestamp::new(99)),
            Err(PollError::PollNotStarted {
                poll_id: 1,
                start: Timestamp::new(100)
            })
        );
        assert!(policy.check_vote(&p, Timestamp::new(100)).is_ok());
        assert!(policy.check_vote(&p, Timestamp::new(200)).is_ok());
        assert!(matches!(
            policy.check_vote(&p, Timestamp::new(201)),
            Err(PollError::PollEnded { .. })
        ));
    }

    #[test]
    fn registration_allowed_before_start() {
        let policy = PollPolicy::enforcing();
        let p = poll(100, 200);
        assert!(policy.check_registration(&p, Timestamp::new(50)).is_ok());
        assert!(policy.check_registration(&p, Timestamp::new(201)).is_err());
    }

    #[test]
    fn finished_poll_rejects_votes_under_any_policy() {
        let mut p = poll(0, u64::MAX);
        p.poll_is_finished = true;
        for policy in [PollPolicy::default(), PollPolicy::enforcing()] {
            assert_eq!(
                policy.check_vote(&p, Timestamp::new(1)),
                Err(PollError::PollFinished(1))
            );
        }
    }
}
