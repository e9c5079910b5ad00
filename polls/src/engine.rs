//! The poll engine: poll lifecycle, candidate registration and voting.

use std::sync::Arc;

use civic_store::{RecordStore, RecordTxnExt, StoreError};
use civic_types::limits::{
    MAX_CANDIDATE_DESCRIPTION_LEN, MAX_CANDIDATE_NAME_LEN, MAX_POLL_DESCRIPTION_LEN,
    MAX_POLL_NAME_LEN,
};
use civic_types::{Address, CandidateId, Clock, Identity, Namespace, PollId, Timestamp};
use tracing::{debug, warn};

use crate::seeds::{candidate_address, poll_address, vote_address};
use crate::{Candidate, Poll, PollError, PollPolicy, VoteRecord};

/// Committed vote counts of a poll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tally {
    pub poll_id: PollId,
    pub total_votes: u64,
    /// `(candidate_id, votes)` for every requested candidate that exists.
    pub candidates: Vec<(CandidateId, u64)>,
}

impl Tally {
    /// Sum of the listed candidates' votes.
    pub fn candidate_sum(&self) -> u64 {
        self.candidates.iter().map(|(_, v)| *v).sum()
    }

    /// Whether the listed candidates account for every vote in the poll.
    pub fn is_complete(&self) -> bool {
        self.candidate_sum() == self.total_votes
    }
}

/// Runs every poll operation as one store transaction.
pub struct PollEngine<S, C> {
    store: Arc<S>,
    clock: Arc<C>,
    namespace: Namespace,
    policy: PollPolicy,
}

impl<S: RecordStore, C: Clock> PollEngine<S, C> {
    pub fn new(store: Arc<S>, clock: Arc<C>, namespace: Namespace, policy: PollPolicy) -> Self {
        Self {
            store,
            clock,
            namespace,
            policy,
        }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Create poll `poll_id` owned by `caller`, with no votes and not finished.
    pub fn initialize_poll(
        &self,
        caller: &Identity,
        poll_id: PollId,
        name: &str,
        description: &str,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Address, PollError> {
        let result = self.try_initialize_poll(caller, poll_id, name, description, start, end);
        match &result {
            Ok(address) => debug!(poll_id, %caller, %address, "poll initialized"),
            Err(e) => warn!(poll_id, %caller, error = %e, "initialize_poll rejected"),
        }
        result
    }

    fn try_initialize_poll(
        &self,
        caller: &Identity,
        poll_id: PollId,
        name: &str,
        description: &str,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Address, PollError> {
        check_len("poll_name", name, MAX_POLL_NAME_LEN)?;
        check_len("poll_description", description, MAX_POLL_DESCRIPTION_LEN)?;
        if start > end {
            return Err(PollError::InvalidWindow { start, end });
        }

        let address = poll_address(&self.namespace, poll_id)?;
        let poll = Poll {
            poll_id,
            poll_name: name.to_owned(),
            poll_description: description.to_owned(),
            poll_start_time: start,
            poll_end_time: end,
            poll_is_finished: false,
            total_votes: 0,
            authority: *caller,
        };
        self.store.transaction(|txn| {
            txn.create(&address, *caller, &poll).map_err(|e| match e {
                StoreError::AlreadyExists(_) => PollError::PollAlreadyExists(poll_id),
                e => PollError::Store(e),
            })
        })?;
        Ok(address)
    }

    /// Register `candidate_id` in an existing poll.
    pub fn initialize_candidate(
        &self,
        caller: &Identity,
        poll_id: PollId,
        candidate_id: CandidateId,
        name: &str,
        description: &str,
    ) -> Result<Address, PollError> {
        let result =
            self.try_initialize_candidate(caller, poll_id, candidate_id, name, description);
        match &result {
            Ok(address) => debug!(poll_id, candidate_id, %address, "candidate initialized"),
            Err(e) => warn!(poll_id, candidate_id, error = %e, "initialize_candidate rejected"),
        }
        result
    }

    fn try_initialize_candidate(
        &self,
        caller: &Identity,
        poll_id: PollId,
        candidate_id: CandidateId,
        name: &str,
        description: &str,
    ) -> Result<Address, PollError> {
        check_len("candidate_name", name, MAX_CANDIDATE_NAME_LEN)?;
        check_len(
            "candidate_description",
            description,
            MAX_CANDIDATE_DESCRIPTION_LEN,
        )?;

        let poll_addr = poll_address(&self.namespace, poll_id)?;
        let address = candidate_address(&self.namespace, poll_id, candidate_id)?;
        let candidate = Candidate {
            poll_id,
            candidate_id,
            candidate_name: name.to_owned(),
            candidate_description: description.to_owned(),
            votes: 0,
        };
        let now = self.clock.now();

        self.store.transaction(|txn| {
            let poll: Poll = txn
                .load_opt(&poll_addr)?
                .ok_or(PollError::PollNotFound(poll_id))?;
            self.policy.check_registration(&poll, now)?;
            txn.create(&address, *caller, &candidate)
                .map_err(|e| match e {
                    StoreError::AlreadyExists(_) => PollError::CandidateAlreadyExists {
                        poll_id,
                        candidate_id,
                    },
                    e => PollError::Store(e),
                })
        })?;
        Ok(address)
    }

    /// Record `voter`'s vote for `candidate_id` and bump both counters.
    ///
    /// The vote record and the two counter updates commit together or not at
    /// all. A second vote by the same voter in the same poll fails
    /// `AlreadyVoted` whichever candidate it names.
    pub fn vote(
        &self,
        voter: &Identity,
        poll_id: PollId,
        candidate_id: CandidateId,
    ) -> Result<Address, PollError> {
        let result = self.try_vote(voter, poll_id, candidate_id);
        match &result {
            Ok(address) => debug!(poll_id, candidate_id, %voter, %address, "vote recorded"),
            Err(e) => warn!(poll_id, candidate_id, %voter, error = %e, "vote rejected"),
        }
        result
    }

    fn try_vote(
        &self,
        voter: &Identity,
        poll_id: PollId,
        candidate_id: CandidateId,
    ) -> Result<Address, PollError> {
        let poll_addr = poll_address(&self.namespace, poll_id)?;
        let cand_addr = candidate_address(&self.namespace, poll_id, candidate_id)?;
        let vote_addr = vote_address(&self.namespace, poll_id, voter)?;
        let now = self.clock.now();

        self.store.transaction(|txn| {
            let mut poll: Poll = txn
                .load_opt(&poll_addr)?
                .ok_or(PollError::PollNotFound(poll_id))?;
            self.policy.check_vote(&poll, now)?;

            let record = VoteRecord {
                poll_id,
                candidate_id,
                voter: *voter,
            };
            txn.create(&vote_addr, *voter, &record)
                .map_err(|e| match e {
                    StoreError::AlreadyExists(_) => PollError::AlreadyVoted {
                        poll_id,
                        voter: *voter,
                    },
                    e => PollError::Store(e),
                })?;

            let mut candidate: Candidate =
                txn.load_opt(&cand_addr)?
                    .ok_or(PollError::CandidateNotFound {
                        poll_id,
                        candidate_id,
                    })?;
            candidate.votes = candidate
                .votes
                .checked_add(1)
                .ok_or(PollError::Overflow("candidate votes"))?;
            poll.total_votes = poll
                .total_votes
                .checked_add(1)
                .ok_or(PollError::Overflow("poll total_votes"))?;

            txn.save(&cand_addr, &candidate)?;
            txn.save(&poll_addr, &poll)?;
            Ok(vote_addr)
        })
    }

    /// Mark a poll finished. Only its creator may do this; finishing twice is a no-op.
    pub fn finish_poll(&self, caller: &Identity, poll_id: PollId) -> Result<Address, PollError> {
        let result = self.try_finish_poll(caller, poll_id);
        match &result {
            Ok(_) => debug!(poll_id, %caller, "poll finished"),
            Err(e) => warn!(poll_id, %caller, error = %e, "finish_poll rejected"),
        }
        result
    }

    fn try_finish_poll(&self, caller: &Identity, poll_id: PollId) -> Result<Address, PollError> {
        let address = poll_address(&self.namespace, poll_id)?;
        self.store.transaction(|txn| {
            let mut poll: Poll = txn
                .load_opt(&address)?
                .ok_or(PollError::PollNotFound(poll_id))?;
            if poll.authority != *caller {
                return Err(PollError::NotCreator {
                    poll_id,
                    caller: *caller,
                });
            }
            if !poll.poll_is_finished {
                poll.poll_is_finished = true;
                txn.save(&address, &poll)?;
            }
            Ok(address)
        })
    }

    pub fn poll(&self, poll_id: PollId) -> Result<Option<Poll>, PollError> {
        let address = poll_address(&self.namespace, poll_id)?;
        Ok(self.store.fetch_typed(&address)?)
    }

    pub fn candidate(
        &self,
        poll_id: PollId,
        candidate_id: CandidateId,
    ) -> Result<Option<Candidate>, PollError> {
        let address = candidate_address(&self.namespace, poll_id, candidate_id)?;
        Ok(self.store.fetch_typed(&address)?)
    }

    pub fn vote_record(
        &self,
        poll_id: PollId,
        voter: &Identity,
    ) -> Result<Option<VoteRecord>, PollError> {
        let address = vote_address(&self.namespace, poll_id, voter)?;
        Ok(self.store.fetch_typed(&address)?)
    }

    pub fn has_voted(&self, poll_id: PollId, voter: &Identity) -> Result<bool, PollError> {
        let address = vote_address(&self.namespace, poll_id, voter)?;
        Ok(self.store.contains(&address)?)
    }

    /// Read the poll and the given candidates in one consistent snapshot.
    ///
    /// Uses a read snapshot, so it never waits on in-flight votes.
    pub fn tally(&self, poll_id: PollId, candidate_ids: &[CandidateId]) -> Result<Tally, PollError> {
        let mut addresses = Vec::with_capacity(candidate_ids.len() + 1);
        addresses.push(poll_address(&self.namespace, poll_id)?);
        for id in candidate_ids {
            addresses.push(candidate_address(&self.namespace, poll_id, *id)?);
        }

        let mut records = self.store.fetch_many(&addresses)?.into_iter();
        let poll: Poll = records
            .next()
            .flatten()
            .ok_or(PollError::PollNotFound(poll_id))?
            .decode()?;
        let mut candidates = Vec::with_capacity(candidate_ids.len());
        for (id, record) in candidate_ids.iter().zip(records) {
            if let Some(record) = record {
                let candidate: Candidate = record.decode()?;
                candidates.push((*id, candidate.votes));
            }
        }
        Ok(Tally {
            poll_id,
            total_votes: poll.total_votes,
            candidates,
        })
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), PollError> {
    if value.len() > max {
        return Err(PollError::FieldTooLong {
            field,
            len: value.len(),
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_nullables::{NullClock, NullRecordStore};
    use std::thread;

    fn alice() -> Identity {
        Identity::new([0xA1; 32])
    }

    fn bob() -> Identity {
        Identity::new([0xB0; 32])
    }

    fn engine_with(policy: PollPolicy) -> PollEngine<NullRecordStore, NullClock> {
        PollEngine::new(
            Arc::new(NullRecordStore::new()),
            Arc::new(NullClock::new(1_000)),
            Namespace::from_label("polls-test").unwrap(),
            policy,
        )
    }

    fn engine() -> PollEngine<NullRecordStore, NullClock> {
        engine_with(PollPolicy::default())
    }

    fn setup_poll(engine: &PollEngine<NullRecordStore, NullClock>) {
        engine
            .initialize_poll(
                &alice(),
                1,
                "Lunch",
                "What to eat",
                Timestamp::new(500),
                Timestamp::new(2_000),
            )
            .unwrap();
        engine
            .initialize_candidate(&alice(), 1, 1, "Pizza", "cheesy")
            .unwrap();
        engine
            .initialize_candidate(&alice(), 1, 2, "Sushi", "fishy")
            .unwrap();
    }

    #[test]
    fn initialize_poll_twice_keeps_first() {
        let engine = engine();
        engine
            .initialize_poll(&alice(), 7, "First", "", Timestamp::new(0), Timestamp::new(10))
            .unwrap();
        let before = engine.poll(7).unwrap();

        let err = engine
            .initialize_poll(&bob(), 7, "Second", "", Timestamp::new(5), Timestamp::new(6))
            .unwrap_err();
        assert_eq!(err, PollError::PollAlreadyExists(7));
        assert_eq!(engine.poll(7).unwrap(), before);

        let poll = before.unwrap();
        assert_eq!(poll.poll_name, "First");
        assert_eq!(poll.total_votes, 0);
        assert!(!poll.poll_is_finished);
        assert_eq!(poll.authority, alice());
    }

    #[test]
    fn initialize_poll_validates_input() {
        let engine = engine();
        let long = "x".repeat(MAX_POLL_NAME_LEN + 1);
        assert!(matches!(
            engine.initialize_poll(&alice(), 1, &long, "", Timestamp::new(0), Timestamp::new(1)),
            Err(PollError::FieldTooLong { field: "poll_name", .. })
        ));
        assert_eq!(
            engine.initialize_poll(&alice(), 1, "ok", "", Timestamp::new(5), Timestamp::new(4)),
            Err(PollError::InvalidWindow {
                start: Timestamp::new(5),
                end: Timestamp::new(4)
            })
        );
        assert_eq!(engine.poll(1).unwrap(), None);
    }

    #[test]
    fn candidate_requires_poll() {
        let engine = engine();
        assert_eq!(
            engine.initialize_candidate(&alice(), 9, 1, "a", "b"),
            Err(PollError::PollNotFound(9))
        );
        assert_eq!(engine.candidate(9, 1).unwrap(), None);
    }

    #[test]
    fn duplicate_candidate_is_rejected() {
        let engine = engine();
        setup_poll(&engine);
        assert_eq!(
            engine.initialize_candidate(&bob(), 1, 1, "Tacos", ""),
            Err(PollError::CandidateAlreadyExists {
                poll_id: 1,
                candidate_id: 1
            })
        );
        assert_eq!(engine.candidate(1, 1).unwrap().unwrap().candidate_name, "Pizza");
    }

    #[test]
    fn end_to_end_vote() {
        let engine = engine();
        setup_poll(&engine);
        let voter = bob();

        engine.vote(&voter, 1, 1).unwrap();

        assert_eq!(engine.poll(1).unwrap().unwrap().total_votes, 1);
        assert_eq!(engine.candidate(1, 1).unwrap().unwrap().votes, 1);
        assert_eq!(engine.candidate(1, 2).unwrap().unwrap().votes, 0);
        assert!(engine.has_voted(1, &voter).unwrap());
        assert_eq!(
            engine.vote_record(1, &voter).unwrap(),
            Some(VoteRecord {
                poll_id: 1,
                candidate_id: 1,
                voter
            })
        );

        for candidate in [1, 2] {
            assert_eq!(
                engine.vote(&voter, 1, candidate),
                Err(PollError::AlreadyVoted { poll_id: 1, voter })
            );
        }
        let tally = engine.tally(1, &[1, 2]).unwrap();
        assert_eq!(tally.total_votes, 1);
        assert_eq!(tally.candidates, vec![(1, 1), (2, 0)]);
        assert!(tally.is_complete());
    }

    #[test]
    fn vote_for_missing_candidate_leaves_nothing() {
        let engine = engine();
        setup_poll(&engine);
        assert_eq!(
            engine.vote(&bob(), 1, 99),
            Err(PollError::CandidateNotFound {
                poll_id: 1,
                candidate_id: 99
            })
        );
        assert!(!engine.has_voted(1, &bob()).unwrap());
        assert_eq!(engine.poll(1).unwrap().unwrap().total_votes, 0);

        // the voter can still vote properly afterwards
        engine.vote(&bob(), 1, 2).unwrap();
    }

    #[test]
    fn vote_in_missing_poll() {
        let engine = engine();
        assert_eq!(engine.vote(&bob(), 3, 1), Err(PollError::PollNotFound(3)));
    }

    #[test]
    fn failed_commit_leaves_no_vote() {
        let store = Arc::new(NullRecordStore::new());
        let engine = PollEngine::new(
            Arc::clone(&store),
            Arc::new(NullClock::new(1_000)),
            Namespace::default(),
            PollPolicy::default(),
        );
        setup_poll(&engine);
        let records_before = store.record_count().unwrap();

        store.fail_next_commit();
        assert!(matches!(
            engine.vote(&bob(), 1, 1),
            Err(PollError::Store(StoreError::Backend(_)))
        ));
        assert_eq!(store.record_count().unwrap(), records_before);
        assert!(!engine.has_voted(1, &bob()).unwrap());
        assert_eq!(engine.candidate(1, 1).unwrap().unwrap().votes, 0);
        assert_eq!(engine.poll(1).unwrap().unwrap().total_votes, 0);
    }

    #[test]
    fn finish_poll_is_creator_only_and_stops_votes() {
        let engine = engine();
        setup_poll(&engine);
        assert_eq!(
            engine.finish_poll(&bob(), 1),
            Err(PollError::NotCreator {
                poll_id: 1,
                caller: bob()
            })
        );
        engine.finish_poll(&alice(), 1).unwrap();
        engine.finish_poll(&alice(), 1).unwrap();
        assert!(engine.poll(1).unwrap().unwrap().poll_is_finished);
        assert_eq!(engine.vote(&bob(), 1, 1), Err(PollError::PollFinished(1)));
        assert!(!engine.has_voted(1, &bob()).unwrap());
    }

    #[test]
    fn window_is_ignored_by_default() {
        let engine = engine();
        engine
            .initialize_poll(&alice(), 2, "Past", "", Timestamp::new(0), Timestamp::new(10))
            .unwrap();
        engine.initialize_candidate(&alice(), 2, 1, "a", "").unwrap();
        engine.vote(&bob(), 2, 1).unwrap();
    }

    #[test]
    fn window_is_enforced_when_configured() {
        let store = Arc::new(NullRecordStore::new());
        let clock = Arc::new(NullClock::new(100));
        let engine = PollEngine::new(
            store,
            Arc::clone(&clock),
            Namespace::default(),
            PollPolicy::enforcing(),
        );
        engine
            .initialize_poll(&alice(), 1, "Timed", "", Timestamp::new(200), Timestamp::new(300))
            .unwrap();
        engine.initialize_candidate(&alice(), 1, 1, "a", "").unwrap();

        assert!(matches!(
            engine.vote(&bob(), 1, 1),
            Err(PollError::PollNotStarted { .. })
        ));
        clock.set(250);
        engine.vote(&bob(), 1, 1).unwrap();
        clock.set(301);
        assert!(matches!(
            engine.vote(&alice(), 1, 1),
            Err(PollError::PollEnded { .. })
        ));
        assert!(matches!(
            engine.initialize_candidate(&alice(), 1, 2, "late", ""),
            Err(PollError::PollEnded { .. })
        ));
        assert_eq!(engine.poll(1).unwrap().unwrap().total_votes, 1);
    }

    #[test]
    fn concurrent_voters_lose_no_updates() {
        let engine = Arc::new(engine());
        setup_poll(&engine);

        let handles: Vec<_> = (0..16u8)
            .map(|i| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || {
                    let voter = Identity::new([i; 32]);
                    let candidate = 1 + u64::from(i % 2);
                    // every voter tries twice; exactly one attempt may land
                    let first = engine.vote(&voter, 1, candidate).is_ok();
                    let second = engine.vote(&voter, 1, candidate).is_ok();
                    u32::from(first) + u32::from(second)
                })
            })
            .collect();
        let successes: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(successes, 16);

        let tally = engine.tally(1, &[1, 2]).unwrap();
        assert_eq!(tally.total_votes, 16);
        assert_eq!(tally.candidates, vec![(1, 8), (2, 8)]);
    }

    #[test]
    fn concurrent_double_vote_has_one_winner() {
        let engine = Arc::new(engine());
        setup_poll(&engine);
        let voter = bob();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || engine.vote(&voter, 1, 1 + (i % 2)).is_ok())
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(winners, 1);
        assert_eq!(engine.tally(1, &[1, 2]).unwrap().total_votes, 1);
        assert!(engine.tally(1, &[1, 2]).unwrap().is_complete());
    }
}
