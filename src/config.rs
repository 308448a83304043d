use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub templates: TemplatesConfig,
    pub concurrency: ConcurrencyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size_mb: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesConfig {
    /// Directory holding .frx template files
    pub dir: PathBuf,
    /// Template used when a request names none
    pub default_template: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConcurrencyConfig {
    /// Bounds concurrent render calls; excess requests wait on the permit
    pub max_render_requests: usize,
}

impl Config {
    /// Load configuration: built-in defaults, then `config/default.toml` if
    /// present, then `FRX_PDF`-prefixed environment variables on top
    /// (`FRX_PDF_SERVER__PORT=9090`).
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.max_request_size_mb", 10)?
            .set_default("templates.dir", "templates")?
            .set_default("templates.default_template", "simple-template")?
            .set_default("concurrency.max_render_requests", 8)?;

        if std::path::Path::new("config/default.toml").exists() {
            builder = builder.add_source(config::File::with_name("config/default"));
        }

        builder = builder.add_source(config::Environment::with_prefix("FRX_PDF").separator("__"));

        builder.build()?.try_deserialize()
    }

    /// Filesystem path for a named template.
    pub fn template_path(&self, name: &str) -> PathBuf {
        self.templates.dir.join(format!("{}.frx", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_path_appends_the_frx_extension() {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                max_request_size_mb: 10,
            },
            templates: TemplatesConfig {
                dir: PathBuf::from("/srv/templates"),
                default_template: "simple-template".to_string(),
            },
            concurrency: ConcurrencyConfig {
                max_render_requests: 4,
            },
        };
        assert_eq!(
            config.template_path("invoice"),
            PathBuf::from("/srv/templates/invoice.frx")
        );
    }
}
