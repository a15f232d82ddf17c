//! Profile/settings store.

use crate::model::profile::Profile;
use crate::repo::kv_repo::{decode_or_default, encode, KvStore, RepoResult, PROFILE_KEY};
use log::info;

/// Singleton profile persisted under the `u` key.
pub struct ProfileStore<S: KvStore> {
    store: S,
}

impl<S: KvStore> ProfileStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the stored profile, or the default (entitlement 14) when the
    /// profile was never saved or cannot be decoded.
    pub fn get(&self) -> RepoResult<Profile> {
        let raw = self.store.get_value(PROFILE_KEY)?;
        Ok(decode_or_default(PROFILE_KEY, raw))
    }

    pub fn set(&self, profile: Profile) -> RepoResult<()> {
        let value = encode(PROFILE_KEY, &profile)?;
        self.store.put_value(PROFILE_KEY, value.as_str())?;
        info!(
            "event=profile_set module=profile status=ok entitlement={}",
            profile.entitlement
        );
        Ok(())
    }

    /// Stores the entitlement typed by the user; unparsable text stores `0`.
    pub fn set_entitlement_from_input(&self, text: &str) -> RepoResult<Profile> {
        let profile = Profile::from_input(text);
        self.set(profile)?;
        Ok(profile)
    }
}
