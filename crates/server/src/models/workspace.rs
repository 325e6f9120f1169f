//! Workspace records owned by a profile.

use chrono::{DateTime, Utc};
use serde::Serialize;

use zenith_core::{
    ColorTokenId, DesignSystemId, FileId, FlowId, FolderId, HexColor, Opacity, TypographyTokenId,
    UserId,
};

/// A folder in a profile's file tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Folder {
    pub id: FolderId,
    pub profile_id: UserId,
    pub name: String,
    /// Absolute path, e.g. `/Desktop`.
    pub path: String,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A file stored in a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct File {
    pub id: FileId,
    pub folder_id: FolderId,
    pub profile_id: UserId,
    pub name: String,
    /// Absolute path including the file name.
    pub path: String,
    pub mime_type: String,
    /// Size in bytes.
    pub size: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A named set of design tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesignSystem {
    pub id: DesignSystemId,
    pub profile_id: UserId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorToken {
    pub id: ColorTokenId,
    pub design_system_id: DesignSystemId,
    pub name: String,
    pub value: HexColor,
    pub opacity: Opacity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypographyToken {
    pub id: TypographyTokenId,
    pub design_system_id: DesignSystemId,
    pub name: String,
    pub font_family: String,
}

/// A design system together with its tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesignSystemWithTokens {
    #[serde(flatten)]
    pub design_system: DesignSystem,
    pub color_tokens: Vec<ColorToken>,
    pub typography_tokens: Vec<TypographyToken>,
}

/// A workflow canvas bound to one design system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flow {
    pub id: FlowId,
    pub profile_id: UserId,
    pub design_system_id: DesignSystemId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
