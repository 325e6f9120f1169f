//! In-memory [`ProfileStore`] for tests.
//!
//! Writes made by [`ProfileStore::create_profile_with_seed`] are staged on a
//! copy of the state and swapped in only when every step succeeds, so a
//! failure injected with [`MemoryProfileStore::fail_at`] leaves nothing
//! behind. The state lock is held for the whole call, which serializes
//! concurrent provisioning the way row locks on `zenith.profile` do.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use tokio::sync::Mutex;

use zenith_core::{
    ColorTokenId, DesignSystemId, FileId, FlowId, FolderId, TypographyTokenId, UserId,
};

use super::{ProfileStore, RepositoryError};
use crate::models::{
    ColorToken, DesignSystem, DesignSystemWithTokens, File, Flow, Folder, NewProfile, Profile,
    ProfileWorkspace, TypographyToken,
};
use crate::seed::{SeedStep, WorkspaceSeed};

/// Every record held by the store.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshot {
    pub profiles: BTreeMap<UserId, Profile>,
    pub design_systems: Vec<DesignSystem>,
    pub color_tokens: Vec<ColorToken>,
    pub typography_tokens: Vec<TypographyToken>,
    pub flows: Vec<Flow>,
    pub folders: Vec<Folder>,
    pub files: Vec<File>,
    next_id: i32,
}

impl MemorySnapshot {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    /// Records owned by `profile_id`, as `(design_systems, flows, folders, files)`.
    #[must_use]
    pub fn owned_counts(&self, profile_id: &UserId) -> (usize, usize, usize, usize) {
        (
            self.design_systems
                .iter()
                .filter(|d| &d.profile_id == profile_id)
                .count(),
            self.flows.iter().filter(|f| &f.profile_id == profile_id).count(),
            self.folders.iter().filter(|f| &f.profile_id == profile_id).count(),
            self.files.iter().filter(|f| &f.profile_id == profile_id).count(),
        )
    }
}

/// A [`ProfileStore`] backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    state: Mutex<MemorySnapshot>,
    failure: Mutex<Option<SeedStep>>,
    queries: AtomicUsize,
}

impl MemoryProfileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next provisioning calls fail at `step` (or stop failing with `None`).
    pub async fn fail_at(&self, step: Option<SeedStep>) {
        *self.failure.lock().await = step;
    }

    /// Number of store calls made so far.
    #[must_use]
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Copy of the current contents.
    pub async fn snapshot(&self) -> MemorySnapshot {
        self.state.lock().await.clone()
    }

    /// Add a folder outside of provisioning.
    pub async fn insert_folder(
        &self,
        profile_id: &UserId,
        name: &str,
        path: &str,
        is_favorite: bool,
    ) -> Folder {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let folder = Folder {
            id: FolderId::new(state.next_id()),
            profile_id: profile_id.clone(),
            name: name.to_owned(),
            path: path.to_owned(),
            is_favorite,
            created_at: now,
            updated_at: now,
        };
        state.folders.push(folder.clone());
        folder
    }

    fn record_query(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }
}

fn injected(step: SeedStep, failure: Option<SeedStep>) -> Result<(), RepositoryError> {
    if failure == Some(step) {
        return Err(RepositoryError::Database(sqlx::Error::Protocol(format!(
            "injected failure at {}",
            step.as_str()
        ))));
    }
    Ok(())
}

impl ProfileStore for MemoryProfileStore {
    async fn find_profile(&self, id: &UserId) -> Result<Option<Profile>, RepositoryError> {
        self.record_query();
        Ok(self.state.lock().await.profiles.get(id).cloned())
    }

    async fn find_profile_workspace(
        &self,
        id: &UserId,
    ) -> Result<Option<ProfileWorkspace>, RepositoryError> {
        self.record_query();
        let state = self.state.lock().await;
        let Some(profile) = state.profiles.get(id).cloned() else {
            return Ok(None);
        };

        let folders = state
            .folders
            .iter()
            .filter(|f| &f.profile_id == id && f.is_favorite)
            .cloned()
            .collect();

        let design_systems = state
            .design_systems
            .iter()
            .filter(|d| &d.profile_id == id)
            .map(|d| DesignSystemWithTokens {
                design_system: d.clone(),
                color_tokens: state
                    .color_tokens
                    .iter()
                    .filter(|t| t.design_system_id == d.id)
                    .cloned()
                    .collect(),
                typography_tokens: state
                    .typography_tokens
                    .iter()
                    .filter(|t| t.design_system_id == d.id)
                    .cloned()
                    .collect(),
            })
            .collect();

        Ok(Some(ProfileWorkspace {
            profile,
            folders,
            design_systems,
        }))
    }

    async fn create_profile_with_seed(
        &self,
        new_profile: &NewProfile,
        seed: &WorkspaceSeed,
    ) -> Result<Profile, RepositoryError> {
        self.record_query();
        let failure = *self.failure.lock().await;
        let mut state = self.state.lock().await;
        let mut staged = state.clone();
        let now = Utc::now();
        let user_id = &new_profile.id;

        injected(SeedStep::Profile, failure)?;
        if staged.profiles.contains_key(user_id) {
            return Err(RepositoryError::Conflict("profile already exists".to_owned()));
        }
        let profile = Profile {
            id: user_id.clone(),
            name: new_profile.name.clone(),
            image_url: new_profile.image_url.clone(),
            email: new_profile.email.clone(),
            created_at: now,
            updated_at: now,
        };
        staged.profiles.insert(user_id.clone(), profile.clone());

        injected(SeedStep::DesignSystem, failure)?;
        let design_system_id = DesignSystemId::new(staged.next_id());
        staged.design_systems.push(DesignSystem {
            id: design_system_id,
            profile_id: user_id.clone(),
            name: seed.design_system_name.to_owned(),
            created_at: now,
            updated_at: now,
        });

        injected(SeedStep::ColorTokens, failure)?;
        for token in seed.color_tokens {
            let invalid =
                |e: zenith_core::ColorError| RepositoryError::DataCorruption(e.to_string());
            let color = ColorToken {
                id: ColorTokenId::new(staged.next_id()),
                design_system_id,
                name: token.name.to_owned(),
                value: token.color().map_err(invalid)?,
                opacity: token.opacity().map_err(invalid)?,
            };
            staged.color_tokens.push(color);
        }

        injected(SeedStep::TypographyTokens, failure)?;
        for token in seed.typography_tokens {
            let typography = TypographyToken {
                id: TypographyTokenId::new(staged.next_id()),
                design_system_id,
                name: token.name.to_owned(),
                font_family: token.font_family.to_owned(),
            };
            staged.typography_tokens.push(typography);
        }

        injected(SeedStep::Flow, failure)?;
        let flow = Flow {
            id: FlowId::new(staged.next_id()),
            profile_id: user_id.clone(),
            design_system_id,
            name: seed.flow.name.to_owned(),
            description: Some(seed.flow.description.to_owned()),
            created_at: now,
            updated_at: now,
        };
        staged.flows.push(flow);

        injected(SeedStep::RootFolder, failure)?;
        let folder_id = FolderId::new(staged.next_id());
        staged.folders.push(Folder {
            id: folder_id,
            profile_id: user_id.clone(),
            name: seed.root_folder.name.to_owned(),
            path: seed.root_folder.path.to_owned(),
            is_favorite: seed.root_folder.is_favorite,
            created_at: now,
            updated_at: now,
        });

        injected(SeedStep::WelcomeFile, failure)?;
        let file = File {
            id: FileId::new(staged.next_id()),
            folder_id,
            profile_id: user_id.clone(),
            name: seed.welcome_file.name.to_owned(),
            path: seed.welcome_file.path.to_owned(),
            mime_type: seed.welcome_file.mime_type.to_owned(),
            size: seed.welcome_file.size,
            created_at: now,
            updated_at: now,
        };
        staged.files.push(file);

        *state = staged;
        Ok(profile)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use zenith_core::Email;

    use super::*;
    use crate::seed::ZENITH;

    fn new_profile(id: &str) -> NewProfile {
        NewProfile {
            id: UserId::parse(id).unwrap(),
            name: "Grace Hopper".to_owned(),
            image_url: "https://x/g.png".to_owned(),
            email: Email::parse("grace@x.com").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_profile_is_conflict() {
        let store = MemoryProfileStore::new();
        store
            .create_profile_with_seed(&new_profile("user_1"), &ZENITH)
            .await
            .unwrap();

        let err = store
            .create_profile_with_seed(&new_profile("user_1"), &ZENITH)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.profiles.len(), 1);
        assert_eq!(snapshot.color_tokens.len(), 10);
    }

    #[tokio::test]
    async fn test_every_step_rolls_back() {
        for step in SeedStep::ALL {
            let store = MemoryProfileStore::new();
            store.fail_at(Some(step)).await;

            let result = store
                .create_profile_with_seed(&new_profile("user_1"), &ZENITH)
                .await;
            assert!(result.is_err(), "step {}", step.as_str());

            let snapshot = store.snapshot().await;
            assert!(snapshot.profiles.is_empty(), "step {}", step.as_str());
            assert_eq!(
                snapshot.owned_counts(&UserId::parse("user_1").unwrap()),
                (0, 0, 0, 0)
            );
            assert!(snapshot.color_tokens.is_empty());
            assert!(snapshot.typography_tokens.is_empty());
        }
    }

    #[tokio::test]
    async fn test_counts_queries() {
        let store = MemoryProfileStore::new();
        let id = UserId::parse("user_1").unwrap();
        assert_eq!(store.queries(), 0);
        store.find_profile(&id).await.unwrap();
        store.find_profile_workspace(&id).await.unwrap();
        assert_eq!(store.queries(), 2);
    }
}
