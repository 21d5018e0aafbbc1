use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub places: PlacesConfig,
    pub opencti: OpenCtiConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

/// Location of the static place-name / postal-code reference table
#[derive(Debug, Clone)]
pub struct PlacesConfig {
    pub csv_path: PathBuf,
}

/// Connection settings for the OpenCTI repository
#[derive(Clone)]
pub struct OpenCtiConfig {
    /// Base URL of the OpenCTI platform (without `/graphql`)
    pub url: String,
    /// API token sent as a bearer credential
    pub token: String,
    /// Optional connector id forwarded to the bundle import mutation
    pub connector_id: Option<String>,
    /// Upper bound for a single outbound request
    pub timeout: Duration,
}

// Keep the token out of logs.
impl std::fmt::Debug for OpenCtiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenCtiConfig")
            .field("url", &self.url)
            .field("token", &"***")
            .field("connector_id", &self.connector_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Config {
            app: AppConfig::from_env()?,
            places: PlacesConfig::from_env(),
            opencti: OpenCtiConfig::from_env()?,
            swagger: SwaggerConfig::from_env(),
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins = parse_origins(
            &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl PlacesConfig {
    const DEFAULT_CSV_PATH: &'static str = "./019HexaSmal.csv";

    pub fn from_env() -> Self {
        let csv_path = env::var("PLACES_CSV_PATH")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_CSV_PATH.to_string());

        Self {
            csv_path: PathBuf::from(csv_path),
        }
    }
}

impl OpenCtiConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("OPENCTI_URL")
            .map_err(|_| "OPENCTI_URL environment variable is required".to_string())?
            .trim_end_matches('/')
            .to_string();

        let token = env::var("OPENCTI_TOKEN")
            .map_err(|_| "OPENCTI_TOKEN environment variable is required".to_string())?;

        let connector_id = env::var("OPENCTI_CONNECTOR_ID")
            .ok()
            .filter(|s| !s.is_empty());

        let timeout_secs = env::var("OPENCTI_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "OPENCTI_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            token,
            connector_id,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn graphql_endpoint(&self) -> String {
        format!("{}/graphql", self.url)
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Self {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "STIX Incident Intake API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Create STIX incidents located at a French commune and push them to OpenCTI"
                .to_string()
        });

        Self {
            username,
            password,
            title,
            version,
            description,
        }
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
