use std::collections::HashMap;
use std::sync::Arc;

use civic_nullables::{NullClock, NullRecordStore};
use civic_polls::{PollEngine, PollError, PollPolicy};
use civic_store::RecordStore;
use civic_types::{Identity, Namespace, Timestamp};
use proptest::prelude::*;

const CANDIDATES: u64 = 4;

fn engine() -> (Arc<NullRecordStore>, PollEngine<NullRecordStore, NullClock>) {
    let store = Arc::new(NullRecordStore::new());
    let engine = PollEngine::new(
        Arc::clone(&store),
        Arc::new(NullClock::new(0)),
        Namespace::from_label("prop").unwrap(),
        PollPolicy::default(),
    );
    let creator = Identity::new([0xFF; 32]);
    engine
        .initialize_poll(&creator, 1, "p", "", Timestamp::new(0), Timestamp::new(1))
        .unwrap();
    for id in 1..=CANDIDATES {
        engine.initialize_candidate(&creator, 1, id, "c", "").unwrap();
    }
    (store, engine)
}

proptest! {
    #[test]
    fn tally_matches_vote_records(
        // (voter byte, candidate id); candidate 0 and CANDIDATES + 1 do not exist
        attempts in prop::collection::vec((0u8..12, 0u64..=CANDIDATES + 1), 0..60)
    ) {
        let (store, engine) = engine();
        let mut first_vote: HashMap<u8, u64> = HashMap::new();

        for (voter_byte, candidate) in attempts {
            let voter = Identity::new([voter_byte; 32]);
            let result = engine.vote(&voter, 1, candidate);
            let exists = (1..=CANDIDATES).contains(&candidate);
            match first_vote.get(&voter_byte) {
                Some(_) => prop_assert_eq!(result, Err(PollError::AlreadyVoted { poll_id: 1, voter })),
                None if exists => {
                    prop_assert!(result.is_ok());
                    first_vote.insert(voter_byte, candidate);
                }
                None => prop_assert!(matches!(result, Err(PollError::CandidateNotFound { .. })), "expected CandidateNotFound, got {:?}", result),
            }
        }

        let ids: Vec<u64> = (1..=CANDIDATES).collect();
        let tally = engine.tally(1, &ids).unwrap();
        prop_assert_eq!(tally.total_votes, first_vote.len() as u64);
        prop_assert!(tally.is_complete());
        for (id, votes) in &tally.candidates {
            let expected = first_vote.values().filter(|c| *c == id).count() as u64;
            prop_assert_eq!(*votes, expected);
        }

        let mut voted = 0u64;
        for voter_byte in 0u8..12 {
            if engine.has_voted(1, &Identity::new([voter_byte; 32])).unwrap() {
                voted += 1;
            }
        }
        prop_assert_eq!(voted, tally.total_votes);

        // one poll, CANDIDATES candidates and one record per voter
        prop_assert_eq!(store.record_count().unwrap(), 1 + CANDIDATES + voted);
    }
}
