/*!
 * XDG Path Virtualization
 * Maps symbolic directory tokens to real host paths and anonymized sandbox paths
 *
 * The real table follows the user's own XDG configuration; the synthetic
 * table always uses the default layout under the synthetic home, so a
 * customized host layout never leaks into the sandbox.
 */

use crate::permissions::types::{AccessMode, FileGrant};
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// Well-known user directories, in fixed table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum XdgDir {
    Home,
    Desktop,
    Download,
    Documents,
    Music,
    Pictures,
    Videos,
    Templates,
    PublicShare,
    Config,
    Cache,
    Data,
}

impl XdgDir {
    pub const ALL: [XdgDir; 12] = [
        XdgDir::Home,
        XdgDir::Desktop,
        XdgDir::Download,
        XdgDir::Documents,
        XdgDir::Music,
        XdgDir::Pictures,
        XdgDir::Videos,
        XdgDir::Templates,
        XdgDir::PublicShare,
        XdgDir::Config,
        XdgDir::Cache,
        XdgDir::Data,
    ];

    /// Symbolic token used in file grants
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            XdgDir::Home => "xdg-home",
            XdgDir::Desktop => "xdg-desktop",
            XdgDir::Download => "xdg-download",
            XdgDir::Documents => "xdg-documents",
            XdgDir::Music => "xdg-music",
            XdgDir::Pictures => "xdg-pictures",
            XdgDir::Videos => "xdg-videos",
            XdgDir::Templates => "xdg-templates",
            XdgDir::PublicShare => "xdg-publicshare",
            XdgDir::Config => "xdg-config",
            XdgDir::Cache => "xdg-cache",
            XdgDir::Data => "xdg-data",
        }
    }

    /// Default location relative to a home directory
    #[must_use]
    pub fn default_relative(self) -> &'static str {
        match self {
            XdgDir::Home => "",
            XdgDir::Desktop => "Desktop",
            XdgDir::Download => "Downloads",
            XdgDir::Documents => "Documents",
            XdgDir::Music => "Music",
            XdgDir::Pictures => "Pictures",
            XdgDir::Videos => "Videos",
            XdgDir::Templates => "Templates",
            XdgDir::PublicShare => "Public",
            XdgDir::Config => ".config",
            XdgDir::Cache => ".cache",
            XdgDir::Data => ".local/share",
        }
    }

    /// Environment variable advertising this directory, `HOME` excluded
    #[must_use]
    pub fn env_var(self) -> Option<&'static str> {
        match self {
            XdgDir::Home => None,
            XdgDir::Desktop => Some("XDG_DESKTOP_DIR"),
            XdgDir::Download => Some("XDG_DOWNLOAD_DIR"),
            XdgDir::Documents => Some("XDG_DOCUMENTS_DIR"),
            XdgDir::Music => Some("XDG_MUSIC_DIR"),
            XdgDir::Pictures => Some("XDG_PICTURES_DIR"),
            XdgDir::Videos => Some("XDG_VIDEOS_DIR"),
            XdgDir::Templates => Some("XDG_TEMPLATES_DIR"),
            XdgDir::PublicShare => Some("XDG_PUBLICSHARE_DIR"),
            XdgDir::Config => Some("XDG_CONFIG_HOME"),
            XdgDir::Cache => Some("XDG_CACHE_HOME"),
            XdgDir::Data => Some("XDG_DATA_HOME"),
        }
    }

    /// Match a known token at the start of `target`.
    ///
    /// The token must be followed by end of string or `/`, so `xdg-data`
    /// never swallows `xdg-database`.
    pub fn match_prefix(target: &str) -> Option<(XdgDir, &str)> {
        Self::ALL.into_iter().find_map(|dir| {
            let rest = target.strip_prefix(dir.token())?;
            (rest.is_empty() || rest.starts_with('/')).then_some((dir, rest))
        })
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// One directory per [`XdgDir`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XdgDirs {
    dirs: [PathBuf; 12],
}

impl XdgDirs {
    /// Default layout under `home`
    pub fn from_home(home: &Path) -> Self {
        let dirs = XdgDir::ALL.map(|dir| match dir.default_relative() {
            "" => home.to_path_buf(),
            rel => home.join(rel),
        });
        Self { dirs }
    }

    /// The current user's real layout, honouring `user-dirs.dirs` and the
    /// `XDG_*_HOME` variables
    pub fn capture() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| {
            warn!("home directory unknown, using /");
            PathBuf::from("/")
        });
        let mut xdg = Self::from_home(&home);
        for dir in XdgDir::ALL {
            let found = match dir {
                XdgDir::Home => None,
                XdgDir::Desktop => dirs::desktop_dir(),
                XdgDir::Download => dirs::download_dir(),
                XdgDir::Documents => dirs::document_dir(),
                XdgDir::Music => dirs::audio_dir(),
                XdgDir::Pictures => dirs::picture_dir(),
                XdgDir::Videos => dirs::video_dir(),
                XdgDir::Templates => dirs::template_dir(),
                XdgDir::PublicShare => dirs::public_dir(),
                XdgDir::Config => dirs::config_dir(),
                XdgDir::Cache => dirs::cache_dir(),
                XdgDir::Data => dirs::data_dir(),
            };
            if let Some(path) = found {
                xdg = xdg.with(dir, path);
            }
        }
        xdg
    }

    /// Override one directory
    #[must_use]
    pub fn with(mut self, dir: XdgDir, path: impl Into<PathBuf>) -> Self {
        self.dirs[dir.index()] = path.into();
        self
    }

    pub fn get(&self, dir: XdgDir) -> &Path {
        &self.dirs[dir.index()]
    }

    pub fn home(&self) -> &Path {
        self.get(XdgDir::Home)
    }
}

/// A file grant target, classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathToken<'a> {
    /// `xdg-<dir>` plus an optional subpath starting with `/`
    Symbolic {
        dir: XdgDir,
        subpath: &'a str,
        mode: AccessMode,
    },
    /// Any other path, taken as written
    Literal { path: &'a str, mode: AccessMode },
}

impl<'a> PathToken<'a> {
    pub fn classify(grant: &'a FileGrant) -> Self {
        let mode = grant.mode();
        match XdgDir::match_prefix(grant.target()) {
            Some((dir, subpath)) => PathToken::Symbolic { dir, subpath, mode },
            None => PathToken::Literal {
                path: grant.target(),
                mode,
            },
        }
    }

    pub fn mode(&self) -> AccessMode {
        match self {
            PathToken::Symbolic { mode, .. } | PathToken::Literal { mode, .. } => *mode,
        }
    }
}

/// Resolved bind for one file grant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VirtualPath {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub mode: AccessMode,
}

/// Resolves file grants against a real and a synthetic directory table
#[derive(Debug, Clone)]
pub struct PathVirtualizer<'a> {
    real: &'a XdgDirs,
    synthetic: XdgDirs,
}

impl<'a> PathVirtualizer<'a> {
    pub fn new(real: &'a XdgDirs, synthetic_home: &Path) -> Self {
        Self {
            real,
            synthetic: XdgDirs::from_home(synthetic_home),
        }
    }

    /// Resolve one grant into its host source and sandbox destination
    pub fn resolve(&self, grant: &FileGrant) -> VirtualPath {
        match PathToken::classify(grant) {
            PathToken::Symbolic { dir, subpath, mode } => {
                let source = append_raw(self.real.get(dir), subpath);
                let dest = if has_parent_dir(Path::new(subpath)) {
                    warn!(
                        grant = %grant,
                        "parent components in file grant, normalizing destination"
                    );
                    self.climb(&source, &append_raw(self.synthetic.get(dir), subpath))
                } else {
                    append_raw(self.synthetic.get(dir), subpath)
                };
                VirtualPath { source, dest, mode }
            }
            PathToken::Literal { path, mode } => VirtualPath {
                source: PathBuf::from(path),
                dest: self.anonymize(path),
                mode,
            },
        }
    }

    /// Resolve all grants, keeping grant order
    pub fn resolve_all(&self, grants: &[FileGrant]) -> Vec<VirtualPath> {
        grants.iter().map(|grant| self.resolve(grant)).collect()
    }

    /// Rewrite a literal path under the real home to the synthetic home
    fn anonymize(&self, path: &str) -> PathBuf {
        let literal = Path::new(path);
        if !literal.is_absolute() {
            warn!(path, "relative file grant passed through unchanged");
            return literal.to_path_buf();
        }

        if has_parent_dir(literal) {
            warn!(path, "parent components in file grant, normalizing destination");
            return self.rehome(&path_clean::clean(literal));
        }
        self.rehome(literal)
    }

    /// Destination for a symbolic grant whose subpath climbs. Stays in the
    /// synthetic tree when the normalized path does, otherwise follows where
    /// the source really lands.
    fn climb(&self, source: &Path, synthetic: &Path) -> PathBuf {
        let dest = path_clean::clean(synthetic);
        if dest.starts_with(self.synthetic.home()) {
            dest
        } else {
            self.rehome(&path_clean::clean(source))
        }
    }

    /// Swap the real home prefix of an absolute path for the synthetic home
    fn rehome(&self, path: &Path) -> PathBuf {
        let real_home = self.real.home();
        if real_home == Path::new("/") {
            return path.to_path_buf();
        }
        match path.strip_prefix(real_home) {
            Ok(rest) if rest.as_os_str().is_empty() => self.synthetic.home().to_path_buf(),
            Ok(rest) => self.synthetic.home().join(rest),
            Err(_) => path.to_path_buf(),
        }
    }
}

fn has_parent_dir(path: &Path) -> bool {
    path.components().any(|c| matches!(c, Component::ParentDir))
}

/// `base` followed by `suffix` byte for byte, without `Path::join` semantics
fn append_raw(base: &Path, suffix: &str) -> PathBuf {
    let mut raw = OsString::from(base.as_os_str());
    raw.push(suffix);
    PathBuf::from(raw)
}
