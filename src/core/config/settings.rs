use super::parsing::{
    env_optional, env_or_default, parse_bool, parse_cors_origins, parse_environment,
    parse_positive_i64, parse_string_list, parse_u32, parse_u64,
};
use super::types::{
    AdminSettings, ApiSettings, ConfigError, CorsSettings, DatabaseSettings, ImportSettings, ListingSettings,
    RuntimeSettings, ServerHost, ServerPort, ServerSettings, Settings, TelemetrySettings,
};

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let host = env_or_default("SCHOOL_HOST", "0.0.0.0");
        let port = env_or_default("SCHOOL_PORT", "8000");

        let environment =
            parse_environment(env_optional("SCHOOL_ENV").or_else(|| env_optional("ENVIRONMENT")));
        let strict_config =
            env_optional("SCHOOL_STRICT_CONFIG").map(|value| parse_bool(&value)).unwrap_or(false)
                || environment.is_production();

        let project_name = env_or_default("PROJECT_NAME", "School Records API");
        let version = env_or_default("VERSION", env!("CARGO_PKG_VERSION"));
        let api_v1_str = env_or_default("API_V1_STR", "/api/v1");

        let cors_origins = parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS"))?;

        let database_url = env_optional("DATABASE_URL");
        let max_connections = parse_u32(
            "DATABASE_MAX_CONNECTIONS",
            env_or_default("DATABASE_MAX_CONNECTIONS", "10"),
        )?;

        let max_upload_size_mb =
            parse_u64("MAX_IMPORT_SIZE_MB", env_or_default("MAX_IMPORT_SIZE_MB", "5"))?;
        let allowed_extensions = parse_string_list(env_optional("IMPORT_EXTENSIONS"), &["csv"]);

        let student_page_size =
            parse_positive_i64("STUDENT_PAGE_SIZE", env_or_default("STUDENT_PAGE_SIZE", "10"))?;
        let attendance_page_size = parse_positive_i64(
            "ATTENDANCE_PAGE_SIZE",
            env_or_default("ATTENDANCE_PAGE_SIZE", "20"),
        )?;

        let staff_username = env_optional("BOOTSTRAP_STAFF_USERNAME");
        let staff_full_name = env_or_default("BOOTSTRAP_STAFF_FULL_NAME", "School Administrator");

        let log_level = env_or_default("SCHOOL_LOG_LEVEL", "info");
        let json = env_optional("SCHOOL_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);
        let prometheus_enabled =
            env_optional("PROMETHEUS_ENABLED").map(|value| parse_bool(&value)).unwrap_or(false);

        let settings = Self {
            server: ServerSettings {
                host: ServerHost::parse(host)?,
                port: ServerPort::parse(port)?,
            },
            runtime: RuntimeSettings { environment, strict_config },
            api: ApiSettings { project_name, version, api_v1_str },
            cors: CorsSettings { origins: cors_origins },
            database: DatabaseSettings { database_url, max_connections },
            import: ImportSettings { max_upload_size_mb, allowed_extensions },
            listing: ListingSettings { student_page_size, attendance_page_size },
            admin: AdminSettings { staff_username, staff_full_name },
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled },
        };

        settings.validate()?;

        Ok(settings)
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host.0, self.server.port.0)
    }

    pub(crate) fn server_host(&self) -> &str {
        &self.server.host.0
    }

    pub(crate) fn server_port(&self) -> u16 {
        self.server.port.0
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn import(&self) -> &ImportSettings {
        &self.import
    }

    pub(crate) fn listing(&self) -> &ListingSettings {
        &self.listing
    }

    pub(crate) fn admin(&self) -> &AdminSettings {
        &self.admin
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "DATABASE_MAX_CONNECTIONS",
                value: String::from("0"),
            });
        }

        if self.import.allowed_extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "IMPORT_EXTENSIONS",
                value: String::from("<empty>"),
            });
        }

        if self.import.max_upload_size_mb == 0 {
            return Err(ConfigError::InvalidValue {
                field: "MAX_IMPORT_SIZE_MB",
                value: String::from("0"),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if self.database.database_url.is_none() {
            return Err(ConfigError::MissingSetting("DATABASE_URL"));
        }

        Ok(())
    }
}
