use serde::Deserialize;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{find_config_file, read_config};

mod error;
pub use error::{ConfigError, ConfigResult};
use tokio::sync::OnceCell;

#[derive(Debug, Deserialize)]
pub struct Config {
    app: App,
    media: Media,
    mail: Mail,
}

#[derive(Debug, Deserialize)]
pub struct App {
    database_uri: String,
}

#[derive(Debug, Deserialize)]
pub struct Media {
    base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct Mail {
    from: String,
}

impl Config {
    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                let read_cfg = |use_local| -> ConfigResult<Self> {
                    let contents = read_config(use_local)?;
                    let config: Self = toml::from_str(&contents)?;
                    Ok(config)
                };

                match read_cfg(use_local) {
                    Ok(c) => c,
                    Err(e) => {
                        if !matches!(e, error::ConfigError::ConfigNotFound) {
                            crate::error::log_error(&e);
                        }
                        tracing::error!("Config not found.");
                        std::process::exit(1);
                    }
                }
            })
            .await
    }

    #[inline]
    pub fn app(&self) -> &App {
        &self.app
    }

    #[inline]
    pub fn media(&self) -> &Media {
        &self.media
    }

    #[inline]
    pub fn mail(&self) -> &Mail {
        &self.mail
    }
}

impl App {
    #[inline]
    pub fn database_uri(&self) -> &str {
        &self.database_uri
    }
}

impl Media {
    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Mail {
    #[inline]
    pub fn from(&self) -> &str {
        &self.from
    }
}
