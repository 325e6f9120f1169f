//! Default workspace created alongside a new profile.
//!
//! Every profile starts with the "Zenith" design system, a flow bound to it,
//! a favorite `/Desktop` folder, and a welcome file inside that folder. The
//! literal values here are a compatibility contract with existing clients
//! and must not drift.

use zenith_core::{HexColor, Opacity};

/// One step of the provisioning transaction, in execution order.
///
/// Used for structured logging and by the in-memory store's fault injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedStep {
    Profile,
    DesignSystem,
    ColorTokens,
    TypographyTokens,
    Flow,
    RootFolder,
    WelcomeFile,
}

impl SeedStep {
    /// All steps in the order they run.
    pub const ALL: [Self; 7] = [
        Self::Profile,
        Self::DesignSystem,
        Self::ColorTokens,
        Self::TypographyTokens,
        Self::Flow,
        Self::RootFolder,
        Self::WelcomeFile,
    ];

    /// Stable name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::DesignSystem => "design_system",
            Self::ColorTokens => "color_tokens",
            Self::TypographyTokens => "typography_tokens",
            Self::Flow => "flow",
            Self::RootFolder => "root_folder",
            Self::WelcomeFile => "welcome_file",
        }
    }
}

/// A color token to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTokenSeed {
    pub name: &'static str,
    /// `#RRGGBB`, upper case.
    pub value: &'static str,
    /// Percent, 0-100.
    pub opacity: u8,
}

impl ColorTokenSeed {
    /// The token value as a validated color.
    ///
    /// # Errors
    ///
    /// Returns [`zenith_core::ColorError`] if the literal is malformed.
    pub fn color(&self) -> Result<HexColor, zenith_core::ColorError> {
        HexColor::parse(self.value)
    }

    /// The token opacity as a validated percentage.
    ///
    /// # Errors
    ///
    /// Returns [`zenith_core::ColorError`] if the literal is above 100.
    pub fn opacity(&self) -> Result<Opacity, zenith_core::ColorError> {
        Opacity::try_from(i64::from(self.opacity))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypographyTokenSeed {
    pub name: &'static str,
    pub font_family: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowSeed {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderSeed {
    pub name: &'static str,
    pub path: &'static str,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSeed {
    pub name: &'static str,
    pub path: &'static str,
    pub mime_type: &'static str,
    pub size: i64,
}

/// Everything created for a new profile besides the profile row itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkspaceSeed {
    pub design_system_name: &'static str,
    pub color_tokens: &'static [ColorTokenSeed],
    pub typography_tokens: &'static [TypographyTokenSeed],
    /// Bound to the seeded design system.
    pub flow: FlowSeed,
    pub root_folder: FolderSeed,
    /// Placed inside `root_folder`.
    pub welcome_file: FileSeed,
}

const ZENITH_COLOR_TOKENS: [ColorTokenSeed; 10] = [
    ColorTokenSeed { name: "Underlying BG", value: "#292929", opacity: 81 },
    ColorTokenSeed { name: "Overlaying BG", value: "#010203", opacity: 69 },
    ColorTokenSeed { name: "Brd", value: "#292929", opacity: 81 },
    ColorTokenSeed { name: "Black", value: "#000000", opacity: 100 },
    ColorTokenSeed { name: "Glass", value: "#000000", opacity: 30 },
    ColorTokenSeed { name: "White", value: "#CCCCCC", opacity: 69 },
    ColorTokenSeed { name: "Lilac Accent", value: "#7B6CBD", opacity: 100 },
    ColorTokenSeed { name: "Teal Accent", value: "#003431", opacity: 100 },
    ColorTokenSeed { name: "Text Primary (Hd)", value: "#ABC4C3", opacity: 100 },
    ColorTokenSeed { name: "Text Secondary (Bd)", value: "#748393", opacity: 100 },
];

const ZENITH_TYPOGRAPHY_TOKENS: [TypographyTokenSeed; 2] = [
    TypographyTokenSeed { name: "Text Primary", font_family: "Arial" },
    TypographyTokenSeed { name: "Text Secondary", font_family: "Inter" },
];

/// The default "Zenith" workspace.
pub const ZENITH: WorkspaceSeed = WorkspaceSeed {
    design_system_name: "Zenith",
    color_tokens: &ZENITH_COLOR_TOKENS,
    typography_tokens: &ZENITH_TYPOGRAPHY_TOKENS,
    flow: FlowSeed {
        name: "Zenith",
        description: "Default Zenith flow",
    },
    root_folder: FolderSeed {
        name: "Desktop",
        path: "/Desktop",
        is_favorite: true,
    },
    welcome_file: FileSeed {
        name: "Welcome.txt",
        path: "/Desktop/Welcome.txt",
        mime_type: "text/plain",
        size: 23,
    },
};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_zenith_color_literals_are_valid() {
        for token in ZENITH.color_tokens {
            let color = token.color().unwrap();
            // Stored verbatim, so the literal must already be normalized.
            assert_eq!(color.as_str(), token.value, "{}", token.name);
            assert!(token.opacity().is_ok(), "{}", token.name);
        }
    }

    #[test]
    fn test_zenith_counts() {
        assert_eq!(ZENITH.color_tokens.len(), 10);
        assert_eq!(ZENITH.typography_tokens.len(), 2);
    }

    #[test]
    fn test_zenith_token_names_are_unique() {
        let mut names: Vec<_> = ZENITH.color_tokens.iter().map(|t| t.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ZENITH.color_tokens.len());
    }

    #[test]
    fn test_welcome_file_lives_in_root_folder() {
        let folder = ZENITH.root_folder;
        let file = ZENITH.welcome_file;
        assert_eq!(file.path, format!("{}/{}", folder.path, file.name));
        assert!(folder.is_favorite);
    }

    #[test]
    fn test_steps_start_with_profile() {
        assert_eq!(SeedStep::ALL[0], SeedStep::Profile);
        assert_eq!(SeedStep::ALL[6].as_str(), "welcome_file");
    }
}
