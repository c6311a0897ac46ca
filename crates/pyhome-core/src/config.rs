use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Environment variable that overrides the discovered home.
pub const HOME_ENV: &str = "PYTHONHOME";

/// Directory beside the executable that holds a co-located runtime.
pub const COLOCATED_DIR: &str = "python";

/// Marker written for the full embedded distribution.
pub const MARKER: &str = ".embedded_python.home";

/// Marker written for the core-only distribution.
pub const CORE_MARKER: &str = ".embedded_python-core.home";

/// How marker file contents are turned into a home path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarkerContents {
    /// Use the contents byte-for-byte.
    #[default]
    Verbatim,
    /// Strip trailing whitespace, including line endings.
    TrimEnd,
}

impl MarkerContents {
    pub fn apply(self, contents: String) -> String {
        match self {
            MarkerContents::Verbatim => contents,
            MarkerContents::TrimEnd => {
                let len = contents.trim_end().len();
                let mut contents = contents;
                contents.truncate(len);
                contents
            }
        }
    }
}

/// Discovery strategies and their order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Explicit home that wins over every discovered candidate.
    pub home_override: Option<PathBuf>,
    /// Directories relative to the executable's directory, checked in order.
    pub colocated: Vec<PathBuf>,
    /// Marker file names, checked in order.
    pub markers: Vec<String>,
    pub marker_contents: MarkerContents,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            home_override: None,
            colocated: vec![PathBuf::from(COLOCATED_DIR)],
            markers: vec![MARKER.to_string(), CORE_MARKER.to_string()],
            marker_contents: MarkerContents::Verbatim,
        }
    }
}

impl ResolverConfig {
    /// Default strategies plus the `PYTHONHOME` override when it is set.
    pub fn from_env() -> Self {
        Self::default().with_env_override(env::var_os(HOME_ENV))
    }

    /// Applies an override value as read from the environment; empty values are ignored.
    pub fn with_env_override(mut self, value: Option<OsString>) -> Self {
        if let Some(value) = value
            && !value.is_empty()
        {
            self.home_override = Some(PathBuf::from(value));
        }
        self
    }

    pub fn with_colocated(mut self, dirs: Vec<PathBuf>) -> Self {
        if !dirs.is_empty() {
            self.colocated = dirs;
        }
        self
    }

    pub fn with_marker_contents(mut self, policy: MarkerContents) -> Self {
        self.marker_contents = policy;
        self
    }

    /// Co-located candidate directories for a given executable directory.
    pub fn colocated_candidates<'a>(&'a self, bin: &'a Path) -> impl Iterator<Item = PathBuf> + 'a {
        self.colocated.iter().map(move |dir| bin.join(dir))
    }

    /// Marker file candidates for a given executable directory.
    pub fn marker_candidates<'a>(&'a self, bin: &'a Path) -> impl Iterator<Item = PathBuf> + 'a {
        self.markers.iter().map(move |name| bin.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::{CORE_MARKER, MARKER, MarkerContents, ResolverConfig};
    use std::{ffi::OsString, path::PathBuf};

    #[test]
    fn default_is_isolated() {
        let config = ResolverConfig::default();
        assert_eq!(config.home_override, None);
        assert_eq!(config.colocated, vec![PathBuf::from("python")]);
        assert_eq!(config.markers, vec![MARKER.to_string(), CORE_MARKER.to_string()]);
    }

    #[test]
    fn empty_env_override_is_ignored() {
        let config = ResolverConfig::default().with_env_override(Some(OsString::new()));
        assert_eq!(config.home_override, None);

        let config = ResolverConfig::default().with_env_override(Some(OsString::from("/opt/py")));
        assert_eq!(config.home_override, Some(PathBuf::from("/opt/py")));
    }

    #[test]
    fn trim_end_strips_line_endings_only_at_end() {
        assert_eq!(
            MarkerContents::TrimEnd.apply("/opt/my rt \r\n".to_string()),
            "/opt/my rt"
        );
        assert_eq!(
            MarkerContents::Verbatim.apply("/opt/rt\n".to_string()),
            "/opt/rt\n"
        );
    }

    #[test]
    fn empty_colocated_list_keeps_default() {
        let config = ResolverConfig::default().with_colocated(Vec::new());
        assert_eq!(config.colocated, vec![PathBuf::from("python")]);
    }
}
