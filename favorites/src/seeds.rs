//! Seed layouts for admin and favorite addresses.

use civic_crypto::{derive_address, DeriveError};
use civic_types::{Address, Identity, Namespace};

pub const ADMIN_CONFIG_TAG: &[u8] = b"admin_config";
pub const FAVORITE_TAG: &[u8] = b"favorite";

pub fn admin_config_address(
    namespace: &Namespace,
    authority: &Identity,
) -> Result<Address, DeriveError> {
    derive_address(&[ADMIN_CONFIG_TAG, authority.as_bytes()], namespace)
}

pub fn favorite_address(namespace: &Namespace, owner: &Identity) -> Result<Address, DeriveError> {
    derive_address(&[FAVORITE_TAG, owner.as_bytes()], namespace)
}
