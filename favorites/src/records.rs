//! AdminConfig and Favorite records.

use civic_store::{Record, RecordKind};
use civic_types::limits::{MAX_FAVORITE_DESCRIPTION_LEN, MAX_FAVORITE_NAME_LEN};
use civic_types::Identity;
use serde::{Deserialize, Serialize};

use crate::FavoriteError;

/// Who may approve favorite updates for one authority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    pub admin: Identity,
}

impl Record for AdminConfig {
    const KIND: RecordKind = RecordKind::AdminConfig;
}

/// The three user-facing values of a favorite, committed or staged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteValues {
    pub favorite_number: u8,
    pub favorite_name: String,
    pub favorite_description: String,
}

impl FavoriteValues {
    pub fn new(number: u8, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            favorite_number: number,
            favorite_name: name.into(),
            favorite_description: description.into(),
        }
    }

    pub fn validate(&self) -> Result<(), FavoriteError> {
        check_len("favorite_name", &self.favorite_name, MAX_FAVORITE_NAME_LEN)?;
        check_len(
            "favorite_description",
            &self.favorite_description,
            MAX_FAVORITE_DESCRIPTION_LEN,
        )
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), FavoriteError> {
    if value.len() > max {
        return Err(FavoriteError::FieldTooLong {
            field,
            len: value.len(),
            max,
        });
    }
    Ok(())
}

/// An owner's favorite, with an optional staged update.
///
/// Invariant: `update_approved` implies `has_update_request`. The pending fields
/// are meaningful only while `has_update_request` is set and are cleared otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub owner: Identity,
    pub favorite_number: u8,
    pub favorite_name: String,
    pub favorite_description: String,
    pub has_update_request: bool,
    pub update_approved: bool,
    pub pending_number: u8,
    pub pending_name: String,
    pub pending_description: String,
}

impl Record for Favorite {
    const KIND: RecordKind = RecordKind::Favorite;
}

impl Favorite {
    /// A freshly committed favorite with nothing pending.
    pub fn new(owner: Identity, values: FavoriteValues) -> Self {
        Self {
            owner,
            favorite_number: values.favorite_number,
            favorite_name: values.favorite_name,
            favorite_description: values.favorite_description,
            has_update_request: false,
            update_approved: false,
            pending_number: 0,
            pending_name: String::new(),
            pending_description: String::new(),
        }
    }

    pub fn current(&self) -> FavoriteValues {
        FavoriteValues::new(
            self.favorite_number,
            self.favorite_name.clone(),
            self.favorite_description.clone(),
        )
    }

    /// The staged values, if a request is open.
    pub fn pending(&self) -> Option<FavoriteValues> {
        self.has_update_request.then(|| {
            FavoriteValues::new(
                self.pending_number,
                self.pending_name.clone(),
                self.pending_description.clone(),
            )
        })
    }

    /// Stage `values`, replacing any earlier request and dropping its approval.
    pub(crate) fn stage(&mut self, values: FavoriteValues) {
        self.pending_number = values.favorite_number;
        self.pending_name = values.favorite_name;
        self.pending_description = values.favorite_description;
        self.has_update_request = true;
        self.update_approved = false;
    }

    /// Commit the staged values and return to the no-request state.
    pub(crate) fn apply_pending(&mut self) {
        self.favorite_number = self.pending_number;
        self.favorite_name = std::mem::take(&mut self.pending_name);
        self.favorite_description = std::mem::take(&mut self.pending_description);
        self.pending_number = 0;
        self.has_update_request = false;
        self.update_approved = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_then_apply() {
        let owner = Identity::new([1; 32]);
        let mut fav = Favorite::new(owner, FavoriteValues::new(1, "A", "a"));
        assert_eq!(fav.pending(), None);

        fav.stage(FavoriteValues::new(2, "B", "b"));
        assert!(fav.has_update_request);
        assert!(!fav.update_approved);
        assert_eq!(fav.pending(), Some(FavoriteValues::new(2, "B", "b")));
        assert_eq!(fav.current(), FavoriteValues::new(1, "A", "a"));

        fav.update_approved = true;
        fav.apply_pending();
        assert_eq!(fav, Favorite::new(owner, FavoriteValues::new(2, "B", "b")));
    }

    #[test]
    fn restaging_drops_approval() {
        let mut fav = Favorite::new(Identity::ZERO, FavoriteValues::new(1, "A", "a"));
        fav.stage(FavoriteValues::new(2, "B", "b"));
        fav.update_approved = true;
        fav.stage(FavoriteValues::new(3, "C", "c"));
        assert!(!fav.update_approved);
        assert_eq!(fav.pending_number, 3);
    }

    #[test]
    fn validate_limits() {
        assert!(FavoriteValues::new(1, "x".repeat(32), "y".repeat(100))
            .validate()
            .is_ok());
        assert!(matches!(
            FavoriteValues::new(1, "x".repeat(33), "").validate(),
            Err(FavoriteError::FieldTooLong {
                field: "favorite_name",
                ..
            })
        ));
        assert!(matches!(
            FavoriteValues::new(1, "", "y".repeat(101)).validate(),
            Err(FavoriteError::FieldTooLong {
                field: "favorite_description",
                ..
            })
        ));
    }
}
