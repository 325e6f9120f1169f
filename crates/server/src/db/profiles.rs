//! Profile repository for `PostgreSQL`.
//!
//! Queries are built at runtime with `sqlx::query_as` and decoded through
//! `FromRow` row types, which are then converted into domain models.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use zenith_core::{
    ColorTokenId, DesignSystemId, Email, FolderId, HexColor, Opacity, TypographyTokenId, UserId,
};

use super::{ProfileStore, RepositoryError, conflict_on_unique};
use crate::models::{
    ColorToken, DesignSystem, DesignSystemWithTokens, Folder, NewProfile, Profile,
    ProfileWorkspace, TypographyToken,
};
use crate::seed::{SeedStep, WorkspaceSeed};

const PROFILE_COLUMNS: &str = "id, name, image_url, email, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: UserId,
    name: String,
    image_url: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = RepositoryError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            image_url: row.image_url,
            email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct FolderRow {
    id: FolderId,
    profile_id: UserId,
    name: String,
    path: String,
    is_favorite: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FolderRow> for Folder {
    fn from(row: FolderRow) -> Self {
        Self {
            id: row.id,
            profile_id: row.profile_id,
            name: row.name,
            path: row.path,
            is_favorite: row.is_favorite,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DesignSystemRow {
    id: DesignSystemId,
    profile_id: UserId,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct ColorTokenRow {
    id: ColorTokenId,
    design_system_id: DesignSystemId,
    name: String,
    value: String,
    opacity: i16,
}

impl TryFrom<ColorTokenRow> for ColorToken {
    type Error = RepositoryError;

    fn try_from(row: ColorTokenRow) -> Result<Self, Self::Error> {
        let value = HexColor::parse(&row.value).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid color token {}: {e}", row.id))
        })?;
        let opacity = Opacity::try_from(i64::from(row.opacity)).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid color token {}: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            design_system_id: row.design_system_id,
            name: row.name,
            value,
            opacity,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TypographyTokenRow {
    id: TypographyTokenId,
    design_system_id: DesignSystemId,
    name: String,
    font_family: String,
}

/// Repository for profile database operations.
pub struct ProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    async fn favorite_folders(&self, id: &UserId) -> Result<Vec<Folder>, RepositoryError> {
        let rows = sqlx::query_as::<_, FolderRow>(
            r"
            SELECT id, profile_id, name, path, is_favorite, created_at, updated_at
            FROM zenith.folder
            WHERE profile_id = $1 AND is_favorite
            ORDER BY id ASC
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Folder::from).collect())
    }

    async fn design_systems(
        &self,
        id: &UserId,
    ) -> Result<Vec<DesignSystemWithTokens>, RepositoryError> {
        let systems = sqlx::query_as::<_, DesignSystemRow>(
            r"
            SELECT id, profile_id, name, created_at, updated_at
            FROM zenith.design_system
            WHERE profile_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        if systems.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = systems.iter().map(|s| s.id.as_i32()).collect();

        let color_rows = sqlx::query_as::<_, ColorTokenRow>(
            r"
            SELECT id, design_system_id, name, value, opacity
            FROM zenith.color_token
            WHERE design_system_id = ANY($1)
            ORDER BY id ASC
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let typography_rows = sqlx::query_as::<_, TypographyTokenRow>(
            r"
            SELECT id, design_system_id, name, font_family
            FROM zenith.typography_token
            WHERE design_system_id = ANY($1)
            ORDER BY id ASC
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut colors_by_system: HashMap<DesignSystemId, Vec<ColorToken>> = HashMap::new();
        for row in color_rows {
            let token = ColorToken::try_from(row)?;
            colors_by_system
                .entry(token.design_system_id)
                .or_default()
                .push(token);
        }

        let mut typography_by_system: HashMap<DesignSystemId, Vec<TypographyToken>> =
            HashMap::new();
        for row in typography_rows {
            typography_by_system
                .entry(row.design_system_id)
                .or_default()
                .push(TypographyToken {
                    id: row.id,
                    design_system_id: row.design_system_id,
                    name: row.name,
                    font_family: row.font_family,
                });
        }

        let hydrated = systems
            .into_iter()
            .map(|row| DesignSystemWithTokens {
                color_tokens: colors_by_system.remove(&row.id).unwrap_or_default(),
                typography_tokens: typography_by_system.remove(&row.id).unwrap_or_default(),
                design_system: DesignSystem {
                    id: row.id,
                    profile_id: row.profile_id,
                    name: row.name,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                },
            })
            .collect();

        Ok(hydrated)
    }
}

impl ProfileStore for ProfileRepository<'_> {
    async fn find_profile(&self, id: &UserId) -> Result<Option<Profile>, RepositoryError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM zenith.profile WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Profile::try_from).transpose()
    }

    async fn find_profile_workspace(
        &self,
        id: &UserId,
    ) -> Result<Option<ProfileWorkspace>, RepositoryError> {
        let Some(profile) = self.find_profile(id).await? else {
            return Ok(None);
        };

        let folders = self.favorite_folders(id).await?;
        let design_systems = self.design_systems(id).await?;

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
        // Validate literals before opening the transaction.
        let colors = seed
            .color_tokens
            .iter()
            .map(|t| Ok((t.name, t.color()?, t.opacity()?)))
            .collect::<Result<Vec<_>, zenith_core::ColorError>>()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid seed token: {e}")))?;

        let mut tx = self.pool.begin().await?;
        let user_id = &new_profile.id;

        tracing::debug!(%user_id, step = SeedStep::Profile.as_str(), "provisioning");
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r"
            INSERT INTO zenith.profile (id, name, image_url, email)
            VALUES ($1, $2, $3, $4)
            RETURNING {PROFILE_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(&new_profile.name)
        .bind(&new_profile.image_url)
        .bind(&new_profile.email)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "profile"))?;
        let profile = Profile::try_from(row)?;

        tracing::debug!(%user_id, step = SeedStep::DesignSystem.as_str(), "provisioning");
        let design_system_id: DesignSystemId = sqlx::query_scalar(
            r"
            INSERT INTO zenith.design_system (profile_id, name)
            VALUES ($1, $2)
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(seed.design_system_name)
        .fetch_one(&mut *tx)
        .await?;

        if !colors.is_empty() {
            tracing::debug!(%user_id, step = SeedStep::ColorTokens.as_str(), "provisioning");
            let mut builder = QueryBuilder::<Postgres>::new(
                "INSERT INTO zenith.color_token (design_system_id, name, value, opacity) ",
            );
            builder.push_values(colors, |mut b, (name, value, opacity)| {
                b.push_bind(design_system_id)
                    .push_bind(name)
                    .push_bind(value)
                    .push_bind(opacity);
            });
            builder.build().execute(&mut *tx).await?;
        }

        if !seed.typography_tokens.is_empty() {
            tracing::debug!(%user_id, step = SeedStep::TypographyTokens.as_str(), "provisioning");
            let mut builder = QueryBuilder::<Postgres>::new(
                "INSERT INTO zenith.typography_token (design_system_id, name, font_family) ",
            );
            builder.push_values(seed.typography_tokens, |mut b, token| {
                b.push_bind(design_system_id)
                    .push_bind(token.name)
                    .push_bind(token.font_family);
            });
            builder.build().execute(&mut *tx).await?;
        }

        tracing::debug!(%user_id, step = SeedStep::Flow.as_str(), "provisioning");
        sqlx::query(
            r"
            INSERT INTO zenith.flow (profile_id, design_system_id, name, description)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(user_id)
        .bind(design_system_id)
        .bind(seed.flow.name)
        .bind(seed.flow.description)
        .execute(&mut *tx)
        .await?;

        tracing::debug!(%user_id, step = SeedStep::RootFolder.as_str(), "provisioning");
        let folder_id: FolderId = sqlx::query_scalar(
            r"
            INSERT INTO zenith.folder (profile_id, name, path, is_favorite)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(seed.root_folder.name)
        .bind(seed.root_folder.path)
        .bind(seed.root_folder.is_favorite)
        .fetch_one(&mut *tx)
        .await?;

        tracing::debug!(%user_id, step = SeedStep::WelcomeFile.as_str(), "provisioning");
        sqlx::query(
            r"
            INSERT INTO zenith.file (folder_id, profile_id, name, path, mime_type, size)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(folder_id)
        .bind(user_id)
        .bind(seed.welcome_file.name)
        .bind(seed.welcome_file.path)
        .bind(seed.welcome_file.mime_type)
        .bind(seed.welcome_file.size)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(profile)
    }
}
