use markdown_cards_engine::excerpt::DEFAULT_EXCERPT_LENGTH;
use markdown_cards_engine::loader::DEFAULT_MAX_IMAGES;
use markdown_cards_engine::{EmbedFallback, EmbedOptions, FirstLinePolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub notes_path: PathBuf,
    #[serde(default)]
    pub cards: CardSettings,
}

/// How card previews are sourced. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardSettings {
    pub max_images_per_card: usize,
    /// Characters kept in a text excerpt.
    pub excerpt_length: usize,
    /// Frontmatter property holding card images.
    pub image_property: String,
    /// Frontmatter property holding card text.
    pub text_property: String,
    pub embed_fallback: EmbedFallback,
    pub include_youtube: bool,
    pub include_cardlink: bool,
    pub omit_first_line: FirstLinePolicy,
    pub fallback_to_content: bool,
}

impl Default for CardSettings {
    fn default() -> Self {
        Self {
            max_images_per_card: DEFAULT_MAX_IMAGES,
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
            image_property: "cover".to_string(),
            text_property: "description".to_string(),
            embed_fallback: EmbedFallback::default(),
            include_youtube: true,
            include_cardlink: true,
            omit_first_line: FirstLinePolicy::default(),
            fallback_to_content: true,
        }
    }
}

impl CardSettings {
    pub fn embed_options(&self) -> EmbedOptions {
        EmbedOptions {
            include_youtube: self.include_youtube,
            include_cardlink: self.include_cardlink,
        }
    }

    /// The image limit handed to the loader; at least one.
    pub fn max_images(&self) -> usize {
        self.max_images_per_card.max(1)
    }
}

impl Config {
    pub fn new(notes_path: PathBuf) -> Self {
        Self {
            notes_path,
            cards: CardSettings::default(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded config path
        config.notes_path = Self::expand_path(&config.notes_path).unwrap_or(config.notes_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/markdown-cards");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        shellexpand::full(&path_str)
            .ok()
            .map(|expanded| PathBuf::from(expanded.as_ref()))
    }
}
