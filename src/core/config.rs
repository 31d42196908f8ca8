use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub store: StoreConfig,
    pub geocoder: GeocoderConfig,
    pub cache: CacheConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

/// Which implementation backs the `parking_spots` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackendKind {
    /// Supabase / PostgREST over HTTPS
    Postgrest,
    /// Direct Postgres connection through sqlx
    Postgres,
    /// Process-local table, for development only
    Memory,
}

impl FromStr for StoreBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supabase" | "postgrest" => Ok(Self::Postgrest),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!(
                "SPOT_STORE_BACKEND must be one of supabase, postgres, memory (got '{}')",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub enum StoreConfig {
    Postgrest(PostgrestConfig),
    Postgres(DatabaseConfig),
    Memory,
}

/// Hosted table credentials (Supabase project URL and API key)
#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    pub url: String,
    pub api_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    /// Client identifier sent as User-Agent, required by the Nominatim usage policy
    pub user_agent: String,
    /// Appended to every query to bias results towards one city
    pub city_qualifier: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub spots_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            store: StoreConfig::from_env()?,
            geocoder: GeocoderConfig::from_env()?,
            cache: CacheConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

fn parse_secs(name: &str, default: u64) -> Result<u64, String> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u64>()
        .map_err(|_| format!("{} must be a valid number", name))
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

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

impl StoreConfig {
    pub fn from_env() -> Result<Self, String> {
        let kind = env::var("SPOT_STORE_BACKEND")
            .unwrap_or_else(|_| "supabase".to_string())
            .parse::<StoreBackendKind>()?;

        match kind {
            StoreBackendKind::Postgrest => Ok(Self::Postgrest(PostgrestConfig::from_env()?)),
            StoreBackendKind::Postgres => Ok(Self::Postgres(DatabaseConfig::from_env()?)),
            StoreBackendKind::Memory => Ok(Self::Memory),
        }
    }

    pub fn kind(&self) -> StoreBackendKind {
        match self {
            Self::Postgrest(_) => StoreBackendKind::Postgrest,
            Self::Postgres(_) => StoreBackendKind::Postgres,
            Self::Memory => StoreBackendKind::Memory,
        }
    }
}

impl PostgrestConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 10;

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("SUPABASE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "SUPABASE_URL environment variable is required".to_string())?;

        let api_key = env::var("SUPABASE_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "SUPABASE_KEY environment variable is required".to_string())?;

        let timeout_secs = parse_secs("STORE_TIMEOUT_SECS", Self::DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            api_key,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl DatabaseConfig {
    // Default values for database connection pool (conservative defaults for small-medium apps)
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs =
            parse_secs("STORE_TIMEOUT_SECS", Self::DEFAULT_ACQUIRE_TIMEOUT_SECS)?;
        let idle_timeout_secs = parse_secs("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?;
        let max_lifetime_secs = parse_secs("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl GeocoderConfig {
    const DEFAULT_BASE_URL: &'static str = "https://nominatim.openstreetmap.org";
    const DEFAULT_USER_AGENT: &'static str = "ParkPal/0.1 (parking-spot-finder)";
    const DEFAULT_CITY_QUALIFIER: &'static str = "Bangalore";
    const DEFAULT_TIMEOUT_SECS: u64 = 10;

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("NOMINATIM_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let user_agent = env::var("GEOCODER_USER_AGENT")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_USER_AGENT.to_string());

        let city_qualifier = env::var("GEOCODER_CITY_QUALIFIER")
            .unwrap_or_else(|_| Self::DEFAULT_CITY_QUALIFIER.to_string());

        let timeout_secs = parse_secs("GEOCODER_TIMEOUT_SECS", Self::DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            base_url,
            user_agent,
            city_qualifier,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            user_agent: Self::DEFAULT_USER_AGENT.to_string(),
            city_qualifier: Self::DEFAULT_CITY_QUALIFIER.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl CacheConfig {
    const DEFAULT_SPOTS_TTL_SECS: u64 = 10;

    pub fn from_env() -> Result<Self, String> {
        let ttl_secs = parse_secs("SPOT_CACHE_TTL_SECS", Self::DEFAULT_SPOTS_TTL_SECS)?;

        Ok(Self {
            spots_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            spots_ttl: Duration::from_secs(Self::DEFAULT_SPOTS_TTL_SECS),
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "ParkPal API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "List, search and book parking spots in Bangalore".to_string());

        Ok(Self {
            title,
            version,
            description,
        })
    }
}
