/*!
 * Curated Profiles
 * Vetted builtin policies for well-known applications
 *
 * A curated profile is authoritative: when one exists for an application,
 * whatever the bundle declares about itself is ignored.
 */

use super::types::{PermissionModel, TrustLevel};

/// One builtin profile, names stored lowercase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CuratedProfile {
    pub name: &'static str,
    pub level: u8,
    pub files: &'static [&'static str],
    pub devices: &'static [&'static str],
    pub sockets: &'static [&'static str],
    pub share: &'static [&'static str],
}

impl CuratedProfile {
    /// Build the permission model for this profile
    #[must_use]
    pub fn to_model(&self) -> PermissionModel {
        PermissionModel::new(TrustLevel::new(self.level).unwrap_or(TrustLevel::INVALID))
            .with_files(self.files.iter().copied())
            .with_devices(self.devices.iter().copied())
            .with_sockets(self.sockets.iter().copied())
            .with_share(self.share.iter().copied())
    }
}

// Sorted by name
const BUILTIN_PROFILES: &[CuratedProfile] = &[
    CuratedProfile {
        name: "blender",
        level: 2,
        files: &["xdg-documents:rw", "xdg-pictures:rw", "xdg-videos:rw"],
        devices: &["dri"],
        sockets: &["x11", "pulseaudio"],
        share: &[],
    },
    CuratedProfile {
        name: "firefox",
        level: 2,
        files: &["xdg-download:rw"],
        devices: &["dri"],
        sockets: &["x11", "pulseaudio"],
        share: &["network"],
    },
    CuratedProfile {
        name: "gimp",
        level: 2,
        files: &["xdg-pictures:rw", "xdg-documents:rw", "xdg-desktop:rw"],
        devices: &["dri"],
        sockets: &["x11"],
        share: &[],
    },
    CuratedProfile {
        name: "inkscape",
        level: 2,
        files: &["xdg-documents:rw", "xdg-pictures:rw"],
        devices: &["dri"],
        sockets: &["x11"],
        share: &[],
    },
    CuratedProfile {
        name: "krita",
        level: 2,
        files: &["xdg-pictures:rw", "xdg-documents:rw"],
        devices: &["dri"],
        sockets: &["x11"],
        share: &[],
    },
    CuratedProfile {
        name: "libreoffice",
        level: 2,
        files: &["xdg-documents:rw", "xdg-desktop:rw", "xdg-templates:ro"],
        devices: &[],
        sockets: &["x11"],
        share: &[],
    },
    CuratedProfile {
        name: "obs-studio",
        level: 1,
        files: &["xdg-videos:rw"],
        devices: &["dri", "video0"],
        sockets: &["x11", "pulseaudio"],
        share: &["network"],
    },
    CuratedProfile {
        name: "vlc",
        level: 2,
        files: &["xdg-music:ro", "xdg-videos:ro"],
        devices: &["dri"],
        sockets: &["x11", "pulseaudio"],
        share: &[],
    },
];

/// Case-insensitive lookup over a static profile table
#[derive(Debug, Clone, Copy)]
pub struct ProfileRegistry {
    profiles: &'static [CuratedProfile],
}

impl ProfileRegistry {
    /// Registry over the builtin profiles
    #[must_use]
    pub const fn builtin() -> Self {
        Self {
            profiles: BUILTIN_PROFILES,
        }
    }

    /// Registry over a caller-supplied table (lowercase names)
    #[must_use]
    pub const fn with_profiles(profiles: &'static [CuratedProfile]) -> Self {
        Self { profiles }
    }

    /// Find the profile for an application name, ignoring case
    pub fn lookup(&self, app_name: &str) -> Option<&'static CuratedProfile> {
        let wanted = app_name.trim().to_lowercase();
        self.profiles.iter().find(|p| p.name == wanted)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.profiles.iter().map(|p| p.name)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
