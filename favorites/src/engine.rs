//! The favorites engine: admin registration and the request → approve → apply
//! update workflow.

use std::sync::Arc;

use civic_store::{RecordStore, RecordTxn, RecordTxnExt, StoreError};
use civic_types::{Address, Identity, Namespace};
use tracing::{debug, warn};

use crate::seeds::{admin_config_address, favorite_address};
use crate::{AdminConfig, Favorite, FavoriteError, FavoriteValues};

/// Runs every favorite operation as one store transaction.
///
/// `authority` is the deployment authority whose `AdminConfig` gates approvals.
pub struct FavoritesEngine<S> {
    store: Arc<S>,
    namespace: Namespace,
    authority: Identity,
}

impl<S: RecordStore> FavoritesEngine<S> {
    pub fn new(store: Arc<S>, namespace: Namespace, authority: Identity) -> Self {
        Self {
            store,
            namespace,
            authority,
        }
    }

    pub fn authority(&self) -> &Identity {
        &self.authority
    }

    /// Register `authority` as the admin of its own `AdminConfig`, paid for by `payer`.
    pub fn initialize_admin(
        &self,
        payer: &Identity,
        authority: &Identity,
    ) -> Result<Address, FavoriteError> {
        let result = self.try_initialize_admin(payer, authority);
        match &result {
            Ok(address) => debug!(%authority, %address, "admin initialized"),
            Err(e) => warn!(%authority, error = %e, "initialize_admin rejected"),
        }
        result
    }

    fn try_initialize_admin(
        &self,
        payer: &Identity,
        authority: &Identity,
    ) -> Result<Address, FavoriteError> {
        let address = admin_config_address(&self.namespace, authority)?;
        let config = AdminConfig { admin: *authority };
        self.store.transaction(|txn| {
            txn.create(&address, *payer, &config).map_err(|e| match e {
                StoreError::AlreadyExists(_) => FavoriteError::AdminAlreadyInitialized(*authority),
                e => FavoriteError::Store(e),
            })
        })?;
        Ok(address)
    }

    /// Create the caller's favorite, or apply its approved update.
    ///
    /// Behaves as [`commit_initial`](Self::commit_initial) when the caller has
    /// no favorite and as [`apply_approved_update`](Self::apply_approved_update)
    /// otherwise. The presence check and the write share one transaction.
    pub fn set_favorites(
        &self,
        owner: &Identity,
        values: FavoriteValues,
    ) -> Result<Address, FavoriteError> {
        let result = self.try_set_favorites(owner, values);
        match &result {
            Ok(address) => debug!(%owner, %address, "favorites set"),
            Err(e) => warn!(%owner, error = %e, "set_favorites rejected"),
        }
        result
    }

    fn try_set_favorites(
        &self,
        owner: &Identity,
        values: FavoriteValues,
    ) -> Result<Address, FavoriteError> {
        let address = favorite_address(&self.namespace, owner)?;
        self.store.transaction(|txn| {
            if txn.get(&address)?.is_some() {
                apply_in(txn, &address, owner, &values)
            } else {
                commit_initial_in(txn, &address, owner, values)
            }
        })?;
        Ok(address)
    }

    /// Create the caller's favorite with `values` committed and nothing pending.
    pub fn commit_initial(
        &self,
        owner: &Identity,
        values: FavoriteValues,
    ) -> Result<Address, FavoriteError> {
        let result = self.try_commit_initial(owner, values);
        match &result {
            Ok(address) => debug!(%owner, %address, "favorite committed"),
            Err(e) => warn!(%owner, error = %e, "commit_initial rejected"),
        }
        result
    }

    fn try_commit_initial(
        &self,
        owner: &Identity,
        values: FavoriteValues,
    ) -> Result<Address, FavoriteError> {
        let address = favorite_address(&self.namespace, owner)?;
        self.store
            .transaction(|txn| commit_initial_in(txn, &address, owner, values))?;
        Ok(address)
    }

    /// Commit the caller's approved pending update.
    ///
    /// `values` must equal the staged values the admin approved.
    pub fn apply_approved_update(
        &self,
        owner: &Identity,
        values: FavoriteValues,
    ) -> Result<Address, FavoriteError> {
        let result = self.try_apply_approved_update(owner, values);
        match &result {
            Ok(address) => debug!(%owner, %address, "favorite update applied"),
            Err(e) => warn!(%owner, error = %e, "apply_approved_update rejected"),
        }
        result
    }

    fn try_apply_approved_update(
        &self,
        owner: &Identity,
        values: FavoriteValues,
    ) -> Result<Address, FavoriteError> {
        let address = favorite_address(&self.namespace, owner)?;
        self.store
            .transaction(|txn| apply_in(txn, &address, owner, &values))?;
        Ok(address)
    }

    /// Stage new values for the caller's favorite, awaiting admin approval.
    ///
    /// Replaces any earlier request, approved or not.
    pub fn new_rq_update_favorites(
        &self,
        owner: &Identity,
        values: FavoriteValues,
    ) -> Result<Address, FavoriteError> {
        let result = self.try_new_rq_update_favorites(owner, values);
        match &result {
            Ok(address) => debug!(%owner, %address, "favorite update requested"),
            Err(e) => warn!(%owner, error = %e, "new_rq_update_favorites rejected"),
        }
        result
    }

    fn try_new_rq_update_favorites(
        &self,
        owner: &Identity,
        values: FavoriteValues,
    ) -> Result<Address, FavoriteError> {
        values.validate()?;
        let address = favorite_address(&self.namespace, owner)?;
        self.store.transaction(|txn| {
            let mut favorite: Favorite = txn
                .load_opt(&address)?
                .ok_or(FavoriteError::FavoriteNotFound(*owner))?;
            favorite.stage(values);
            txn.save(&address, &favorite)?;
            Ok(address)
        })
    }

    /// Approve `owner`'s pending request. `caller` must be the registered admin
    /// of this deployment's authority.
    pub fn approve_update(
        &self,
        caller: &Identity,
        owner: &Identity,
    ) -> Result<Address, FavoriteError> {
        let result = self.try_approve_update(caller, owner);
        match &result {
            Ok(address) => debug!(%caller, %owner, %address, "favorite update approved"),
            Err(e) => warn!(%caller, %owner, error = %e, "approve_update rejected"),
        }
        result
    }

    fn try_approve_update(
        &self,
        caller: &Identity,
        owner: &Identity,
    ) -> Result<Address, FavoriteError> {
        let config_addr = admin_config_address(&self.namespace, &self.authority)?;
        let address = favorite_address(&self.namespace, owner)?;
        self.store.transaction(|txn| {
            let config: AdminConfig = txn
                .load_opt(&config_addr)?
                .ok_or(FavoriteError::AdminNotInitialized(self.authority))?;
            if config.admin != *caller {
                return Err(FavoriteError::NotAdmin { caller: *caller });
            }
            let mut favorite: Favorite = txn
                .load_opt(&address)?
                .ok_or(FavoriteError::FavoriteNotFound(*owner))?;
            if !favorite.has_update_request {
                return Err(FavoriteError::NoUpdateRequest(*owner));
            }
            if !favorite.update_approved {
                favorite.update_approved = true;
                txn.save(&address, &favorite)?;
            }
            Ok(address)
        })
    }

    /// Remove the caller's favorite.
    pub fn close_favorite(&self, owner: &Identity) -> Result<Favorite, FavoriteError> {
        let result = self.try_close_favorite(owner);
        match &result {
            Ok(_) => debug!(%owner, "favorite closed"),
            Err(e) => warn!(%owner, error = %e, "close_favorite rejected"),
        }
        result
    }

    fn try_close_favorite(&self, owner: &Identity) -> Result<Favorite, FavoriteError> {
        let address = favorite_address(&self.namespace, owner)?;
        let closed = self.store.close(&address, owner).map_err(|e| match e {
            StoreError::NotFound(_) => FavoriteError::FavoriteNotFound(*owner),
            e => FavoriteError::Store(e),
        })?;
        Ok(closed.decode()?)
    }

    pub fn favorite_address(&self, owner: &Identity) -> Result<Address, FavoriteError> {
        Ok(favorite_address(&self.namespace, owner)?)
    }

    pub fn favorite(&self, owner: &Identity) -> Result<Option<Favorite>, FavoriteError> {
        let address = favorite_address(&self.namespace, owner)?;
        Ok(self.store.fetch_typed(&address)?)
    }

    pub fn admin_config(&self, authority: &Identity) -> Result<Option<AdminConfig>, FavoriteError> {
        let address = admin_config_address(&self.namespace, authority)?;
        Ok(self.store.fetch_typed(&address)?)
    }
}

fn commit_initial_in(
    txn: &mut dyn RecordTxn,
    address: &Address,
    owner: &Identity,
    values: FavoriteValues,
) -> Result<(), FavoriteError> {
    values.validate()?;
    let favorite = Favorite::new(*owner, values);
    txn.create(address, *owner, &favorite).map_err(|e| match e {
        StoreError::AlreadyExists(_) => FavoriteError::FavoriteAlreadyExists(*owner),
        e => FavoriteError::Store(e),
    })
}

fn apply_in(
    txn: &mut dyn RecordTxn,
    address: &Address,
    owner: &Identity,
    values: &FavoriteValues,
) -> Result<(), FavoriteError> {
    let mut favorite: Favorite = txn
        .load_opt(address)?
        .ok_or(FavoriteError::FavoriteNotFound(*owner))?;
    if !(favorite.has_update_request && favorite.update_approved) {
        return Err(FavoriteError::UpdateNotApproved(*owner));
    }
    if favorite.pending().as_ref() != Some(values) {
        return Err(FavoriteError::PendingMismatch(*owner));
    }
    favorite.apply_pending();
    txn.save(address, &favorite)?;
    Ok(())
}
