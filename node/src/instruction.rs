//! Boundary instructions.
//!
//! External names follow the established call names (`initializePoll`,
//! `newRqUpdateFavorites`, ...) and argument names are camelCase, so JSON from
//! existing clients decodes directly:
//!
//! ```json
//! {"vote": {"pollId": 1, "candidateId": 2}}
//! ```

use civic_types::{CandidateId, Identity, PollId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::NodeError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Instruction {
    InitializePoll {
        poll_id: PollId,
        name: String,
        description: String,
        start: Timestamp,
        end: Timestamp,
    },
    InitializeCandidate {
        poll_id: PollId,
        candidate_id: CandidateId,
        name: String,
        description: String,
    },
    Vote {
        poll_id: PollId,
        candidate_id: CandidateId,
    },
    FinishPoll {
        poll_id: PollId,
    },
    InitializeAdmin {
        #[serde(with = "hex_identity")]
        admin: Identity,
    },
    SetFavorites {
        number: u8,
        name: String,
        description: String,
    },
    NewRqUpdateFavorites {
        number: u8,
        name: String,
        description: String,
    },
    ApproveUpdate {
        #[serde(with = "hex_identity")]
        owner: Identity,
    },
    CloseFavorite,
}

impl Instruction {
    /// External call name.
    pub fn name(&self) -> &'static str {
        match self {
            Instruction::InitializePoll { .. } => "initializePoll",
            Instruction::InitializeCandidate { .. } => "initializeCandidate",
            Instruction::Vote { .. } => "vote",
            Instruction::FinishPoll { .. } => "finishPoll",
            Instruction::InitializeAdmin { .. } => "initializeAdmin",
            Instruction::SetFavorites { .. } => "setFavorites",
            Instruction::NewRqUpdateFavorites { .. } => "newRqUpdateFavorites",
            Instruction::ApproveUpdate { .. } => "approveUpdate",
            Instruction::CloseFavorite => "closeFavorite",
        }
    }

    pub fn from_json(s: &str) -> Result<Self, NodeError> {
        serde_json::from_str(s).map_err(|e| NodeError::InvalidInstruction(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, NodeError> {
        serde_json::to_string(self).map_err(|e| NodeError::Encoding(e.to_string()))
    }
}

/// Identities travel as 64-char hex strings.
mod hex_identity {
    use civic_types::Identity;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &Identity, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&id.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Identity, D::Error> {
        let s = String::deserialize(d)?;
        Identity::from_hex(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_vote_json() {
        let ix = Instruction::from_json(r#"{"vote": {"pollId": 1, "candidateId": 2}}"#).unwrap();
        assert_eq!(
            ix,
            Instruction::Vote {
                poll_id: 1,
                candidate_id: 2
            }
        );
        assert_eq!(ix.name(), "vote");
    }

    #[test]
    fn decodes_initialize_poll_json() {
        let json = r#"{"initializePoll": {
            "pollId": 7, "name": "Lunch", "description": "What to eat",
            "start": 100, "end": 200
        }}"#;
        let ix = Instruction::from_json(json).unwrap();
        assert_eq!(
            ix,
            Instruction::InitializePoll {
                poll_id: 7,
                name: "Lunch".into(),
                description: "What to eat".into(),
                start: Timestamp::new(100),
                end: Timestamp::new(200),
            }
        );
    }

    #[test]
    fn identities_are_hex_in_json() {
        let ix = Instruction::ApproveUpdate {
            owner: Identity::new([0xAB; 32]),
        };
        let json = ix.to_json().unwrap();
        assert_eq!(json, format!(r#"{{"approveUpdate":{{"owner":"{}"}}}}"#, "ab".repeat(32)));
        assert_eq!(Instruction::from_json(&json).unwrap(), ix);
    }

    #[test]
    fn unit_instruction_is_a_string() {
        assert_eq!(
            Instruction::from_json(r#""closeFavorite""#).unwrap(),
            Instruction::CloseFavorite
        );
    }

    #[test]
    fn rejects_unknown_and_malformed() {
        assert!(matches!(
            Instruction::from_json(r#"{"transfer": {}}"#),
            Err(NodeError::InvalidInstruction(_))
        ));
        assert!(matches!(
            Instruction::from_json(r#"{"approveUpdate": {"owner": "abcd"}}"#),
            Err(NodeError::InvalidInstruction(_))
        ));
        let bad_char = format!(r#"{{"approveUpdate": {{"owner": "{}"}}}}"#, "zz".repeat(32));
        assert!(matches!(
            Instruction::from_json(&bad_char),
            Err(NodeError::InvalidInstruction(msg)) if msg.contains("invalid hex character")
        ));
        assert!(matches!(
            Instruction::from_json(r#"{"setFavorites": {"number": 300, "name": "", "description": ""}}"#),
            Err(NodeError::InvalidInstruction(_))
        ));
    }
}
