use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use zenboard_ai::config::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use zenboard_ai::AiConfig;
use zenboard_store::StoreConfig;

#[derive(Debug, Parser)]
#[command(name = "zenboard", about = "Kanban board with an AI assistant")]
pub struct BoardConfig {
    /// Directory holding the board document and the log file
    #[arg(long, env = "ZENBOARD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Gemini API key. Falls back to API_KEY when unset.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model used for both AI actions
    #[arg(long, env = "ZENBOARD_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the generateContent API
    #[arg(long, env = "ZENBOARD_GEMINI_URL", default_value = DEFAULT_BASE_URL)]
    pub api_base_url: String,

    /// Request timeout for AI calls (seconds)
    #[arg(long, env = "ZENBOARD_AI_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Log file path (default: <data-dir>/zenboard.log)
    #[arg(long, env = "ZENBOARD_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Delete the stored board and start from the starter tasks
    #[arg(long)]
    pub reset: bool,
}

impl BoardConfig {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            local_data_dir: self.data_dir.clone(),
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.store_config().data_dir()
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir().join("zenboard.log"))
    }

    pub fn ai_config(&self) -> AiConfig {
        let api_key = self
            .api_key
            .clone()
            .or_else(|| std::env::var("API_KEY").ok())
            .filter(|k| !k.is_empty());
        AiConfig {
            api_key,
            model: self.model.clone(),
            base_url: self.api_base_url.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }
}
