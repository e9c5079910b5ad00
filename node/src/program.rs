//! The program: boundary instructions dispatched to the engines.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use civic_favorites::{FavoriteValues, FavoritesEngine};
use civic_polls::{PollEngine, PollPolicy};
use civic_store::RecordStore;
use civic_types::{Clock, Identity, Namespace, SystemClock};
use tracing::info;

use crate::commit::encode_instruction;
use crate::tracing_spans::execute_span;
use crate::{Backend, CommitRef, Instruction, NodeConfig, NodeError};

/// Both engines over one shared store.
///
/// Every [`execute`](Self::execute) call is one atomic unit against the store;
/// it either commits and returns a [`CommitRef`] or changes nothing.
pub struct Program<S, C> {
    store: Arc<S>,
    polls: PollEngine<S, C>,
    favorites: FavoritesEngine<S>,
    sequence: AtomicU64,
}

impl<S: RecordStore, C: Clock> Program<S, C> {
    pub fn new(
        store: Arc<S>,
        clock: Arc<C>,
        namespace: Namespace,
        authority: Identity,
        policy: PollPolicy,
    ) -> Self {
        Self {
            polls: PollEngine::new(Arc::clone(&store), clock, namespace, policy),
            favorites: FavoritesEngine::new(Arc::clone(&store), namespace, authority),
            store,
            sequence: AtomicU64::new(0),
        }
    }

    /// Run one instruction on behalf of `caller`.
    pub fn execute(
        &self,
        caller: &Identity,
        instruction: &Instruction,
    ) -> Result<CommitRef, NodeError> {
        let _span = execute_span(instruction.name(), caller).entered();
        check_identities(caller, instruction)?;
        let encoded = encode_instruction(instruction)?;
        let address = match instruction {
            Instruction::InitializePoll {
                poll_id,
                name,
                description,
                start,
                end,
            } => self
                .polls
                .initialize_poll(caller, *poll_id, name, description, *start, *end)?,
            Instruction::InitializeCandidate {
                poll_id,
                candidate_id,
                name,
                description,
            } => self.polls.initialize_candidate(
                caller,
                *poll_id,
                *candidate_id,
                name,
                description,
            )?,
            Instruction::Vote {
                poll_id,
                candidate_id,
            } => self.polls.vote(caller, *poll_id, *candidate_id)?,
            Instruction::FinishPoll { poll_id } => self.polls.finish_poll(caller, *poll_id)?,
            Instruction::InitializeAdmin { admin } => {
                self.favorites.initialize_admin(caller, admin)?
            }
            Instruction::SetFavorites {
                number,
                name,
                description,
            } => self.favorites.set_favorites(
                caller,
                FavoriteValues::new(*number, name.as_str(), description.as_str()),
            )?,
            Instruction::NewRqUpdateFavorites {
                number,
                name,
                description,
            } => self.favorites.new_rq_update_favorites(
                caller,
                FavoriteValues::new(*number, name.as_str(), description.as_str()),
            )?,
            Instruction::ApproveUpdate { owner } => self.favorites.approve_update(caller, owner)?,
            Instruction::CloseFavorite => {
                let address = self.favorites.favorite_address(caller)?;
                self.favorites.close_favorite(caller)?;
                address
            }
        };

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        let commit = CommitRef::compute(sequence, caller, &address, &encoded);
        info!(%address, %commit, "committed");
        Ok(commit)
    }

    /// Decode a JSON instruction and run it.
    pub fn execute_json(&self, caller: &Identity, json: &str) -> Result<CommitRef, NodeError> {
        let instruction = Instruction::from_json(json)?;
        self.execute(caller, &instruction)
    }

    pub fn polls(&self) -> &PollEngine<S, C> {
        &self.polls
    }

    pub fn favorites(&self) -> &FavoritesEngine<S> {
        &self.favorites
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Reject the reserved all-zero identity as caller or identity argument.
fn check_identities(caller: &Identity, instruction: &Instruction) -> Result<(), NodeError> {
    if caller.is_zero() {
        return Err(NodeError::ReservedIdentity("caller"));
    }
    match instruction {
        Instruction::InitializeAdmin { admin } if admin.is_zero() => {
            Err(NodeError::ReservedIdentity("admin"))
        }
        Instruction::ApproveUpdate { owner } if owner.is_zero() => {
            Err(NodeError::ReservedIdentity("owner"))
        }
        _ => Ok(()),
    }
}

impl<C: Clock> Program<Backend, C> {
    /// Open the configured backend and build a program over it with `clock`.
    pub fn open(config: &NodeConfig, clock: Arc<C>) -> Result<Self, NodeError> {
        let authority = config.authority()?;
        let namespace = config.namespace()?;
        let backend = Backend::open(config)?;
        info!(
            backend = backend.kind().as_str(),
            %authority,
            enforce_poll_window = config.enforce_poll_window,
            "program ready"
        );
        Ok(Self::new(
            Arc::new(backend),
            clock,
            namespace,
            authority,
            config.poll_policy(),
        ))
    }
}

impl Program<Backend, SystemClock> {
    /// Open the configured backend on the wall clock.
    pub fn from_config(config: &NodeConfig) -> Result<Self, NodeError> {
        Self::open(config, Arc::new(SystemClock))
    }
}
