/// Application configuration and resource lookup
///
/// All static files (model artifact, logo, optional config file) are
/// resolved relative to a single resource root, so the app behaves the
/// same whether launched from a source checkout or from a packaged bundle.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the optional configuration file at the resource root
pub const CONFIG_FILE_NAME: &str = "digit-classifier.json";

/// User-tunable settings
///
/// Every field has a default, so a partial JSON file is valid.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Model artifact, relative to the resource root
    pub model_path: PathBuf,
    /// Logo shown on the loading screen, relative to the resource root
    pub logo_path: PathBuf,
    pub window_width: f32,
    pub window_height: f32,
    /// Delay before the model load starts, so the loading screen renders first
    pub load_delay_ms: u64,
    /// Edge length of the square preview image
    pub display_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models").join("mnist_transfer_model.onnx"),
            logo_path: PathBuf::from("assets").join("LOGO.png"),
            window_width: 600.0,
            window_height: 500.0,
            load_delay_ms: 1000,
            display_size: 280,
        }
    }
}

impl AppConfig {
    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load `digit-classifier.json` from the resource root.
    ///
    /// A missing file yields the defaults. A malformed one is reported and
    /// ignored rather than keeping the app from starting.
    pub fn load_or_default(root: &ResourceRoot) -> Self {
        let path = root.join(CONFIG_FILE_NAME);
        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(_) => {
                log::debug!("No config at {}, using defaults", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(config) => {
                log::info!("⚙️  Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("⚠️  Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Base directory that static resources are resolved against
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRoot {
    base: PathBuf,
}

impl ResourceRoot {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Resolve the root for the running process.
    ///
    /// Inside a macOS application bundle this is `Contents/Resources`;
    /// otherwise it is the current working directory.
    pub fn resolve() -> Self {
        let exe = std::env::current_exe().ok();
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let root = Self::resolve_from(exe.as_deref(), cwd);
        log::info!("📁 Resource root: {}", root.base.display());
        root
    }

    /// Pure half of [`ResourceRoot::resolve`]
    pub fn resolve_from(exe: Option<&Path>, cwd: PathBuf) -> Self {
        match exe.and_then(bundle_resources_dir) {
            Some(resources) => Self::new(resources),
            None => Self::new(cwd),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Resolve a path relative to the root (absolute paths pass through)
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.base.join(relative)
    }
}

/// `<App>.app/Contents/MacOS/<exe>` → `<App>.app/Contents/Resources`
fn bundle_resources_dir(exe: &Path) -> Option<PathBuf> {
    let macos_dir = exe.parent()?;
    if macos_dir.file_name()? != "MacOS" {
        return None;
    }
    let contents_dir = macos_dir.parent()?;
    if contents_dir.file_name()? != "Contents" {
        return None;
    }
    let resources = contents_dir.join("Resources");
    resources.is_dir().then_some(resources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("digit-classifier-config-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_falls_back_to_cwd() {
        let cwd = PathBuf::from("/work/checkout");
        let root = ResourceRoot::resolve_from(Some(Path::new("/usr/local/bin/digit-classifier")), cwd.clone());
        assert_eq!(root.base(), cwd.as_path());

        let root = ResourceRoot::resolve_from(None, cwd.clone());
        assert_eq!(root.base(), cwd.as_path());
    }

    #[test]
    fn test_resolves_bundle_resources() {
        let dir = scratch_dir("bundle");
        let contents = dir.join("Digits.app").join("Contents");
        fs::create_dir_all(contents.join("MacOS")).unwrap();
        fs::create_dir_all(contents.join("Resources")).unwrap();

        let exe = contents.join("MacOS").join("digit-classifier");
        let root = ResourceRoot::resolve_from(Some(&exe), PathBuf::from("/elsewhere"));
        assert_eq!(root.base(), contents.join("Resources").as_path());
        assert_eq!(
            root.join("models/m.onnx"),
            contents.join("Resources").join("models/m.onnx")
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_bundle_without_resources_uses_cwd() {
        let dir = scratch_dir("no-resources");
        let macos = dir.join("Digits.app").join("Contents").join("MacOS");
        fs::create_dir_all(&macos).unwrap();

        let root = ResourceRoot::resolve_from(Some(&macos.join("exe")), dir.clone());
        assert_eq!(root.base(), dir.as_path());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = AppConfig::from_json(r#"{ "load_delay_ms": 0 }"#).unwrap();
        assert_eq!(config.load_delay_ms, 0);
        assert_eq!(config.model_path, AppConfig::default().model_path);
        assert_eq!(config.display_size, 280);
    }

    #[test]
    fn test_malformed_config_falls_back() {
        let dir = scratch_dir("malformed");
        fs::write(dir.join(CONFIG_FILE_NAME), "{ not json").unwrap();

        let config = AppConfig::load_or_default(&ResourceRoot::new(&dir));
        assert_eq!(config, AppConfig::default());

        fs::remove_dir_all(&dir).unwrap();
    }
}
