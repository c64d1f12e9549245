use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteChatError};

/// Default directory name for sitechat settings.
const SITECHAT_DIR: &str = ".sitechat";
/// Config filename.
const CONFIG_FILE: &str = "config.toml";
/// Environment variable that overrides `model.api_key`.
pub const API_KEY_ENV: &str = "HF_API_KEY";

/// Configuration resolved from the working directory.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory relative paths are resolved against.
    pub project_root: PathBuf,
    /// Path to the `.sitechat/` directory.
    pub sitechat_dir: PathBuf,
    /// Path to the config file.
    pub config_path: PathBuf,
    /// User settings loaded from config.toml.
    pub settings: UserSettings,
}

/// User-configurable settings from .sitechat/config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub fetch: FetchSettings,
    pub cache: CacheSettings,
    pub extract: ExtractSettings,
    pub retrieval: RetrievalSettings,
    pub model: ModelSettings,
}

/// HTTP fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Follow product-looking links when the page itself has no products.
    pub follow_product_links: bool,
    pub max_followed_links: usize,
    /// Pause between followed-link fetches.
    pub follow_delay_ms: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0".into(),
            timeout_secs: 20,
            follow_product_links: true,
            max_followed_links: 6,
            follow_delay_ms: 600,
        }
    }
}

/// Cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Cache directory, relative to the project root unless absolute.
    pub dir: String,
    /// Longest context (in characters) written to disk.
    pub max_context_chars: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: "cached_contexts".into(),
            max_context_chars: 3000,
        }
    }
}

/// HTML extraction thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractSettings {
    /// Shortest heading/paragraph text kept in the context.
    pub min_text_chars: usize,
    pub max_text_blocks: usize,
    pub description_chars: usize,
    /// Number of div/section blocks scanned when no product-like block exists.
    pub fallback_block_limit: usize,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            min_text_chars: 30,
            max_text_blocks: 400,
            description_chars: 300,
            fallback_block_limit: 80,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub chunk_chars: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { chunk_chars: 900 }
    }
}

/// Remote inference endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub endpoint: String,
    /// Bearer token. `HF_API_KEY` takes precedence when set.
    pub api_key: Option<String>,
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api-inference.huggingface.co/models/google/flan-t5-small".into(),
            api_key: None,
            max_new_tokens: 200,
            temperature: 0.2,
            timeout_secs: 60,
        }
    }
}

impl ModelSettings {
    /// The API key to use: `HF_API_KEY` if set and non-empty, else the configured one.
    #[must_use]
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }
}

impl Config {
    /// Create config for a given project root.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let sitechat_dir = project_root.join(SITECHAT_DIR);
        let config_path = sitechat_dir.join(CONFIG_FILE);

        let settings = Self::load_settings(&config_path).unwrap_or_default();

        Self {
            project_root,
            sitechat_dir,
            config_path,
            settings,
        }
    }

    /// Create config from the current working directory.
    pub fn from_cwd() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| SiteChatError::Config(format!("cannot get cwd: {e}")))?;
        Ok(Self::new(cwd))
    }

    fn load_settings(config_path: &Path) -> Option<UserSettings> {
        if !config_path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(config_path).ok()?;
        match toml::from_str(&content) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!(path = %config_path.display(), "ignoring invalid config: {e}");
                None
            }
        }
    }

    /// Save current settings to config.toml.
    pub fn save_settings(&self) -> Result<()> {
        std::fs::create_dir_all(&self.sitechat_dir)?;
        let content = toml::to_string_pretty(&self.settings)
            .map_err(|e| SiteChatError::Config(format!("failed to serialize settings: {e}")))?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Absolute path of the cache directory.
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        let dir = Path::new(&self.settings.cache.dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.project_root.join(dir)
        }
    }

    /// Ensure the cache directory exists.
    pub fn ensure_cache_dir(&self) -> Result<PathBuf> {
        let dir = self.cache_dir();
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
