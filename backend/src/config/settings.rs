#[derive(Debug, Clone)]
pub struct LeagueSettings {
    pub win_points: u32,
    pub admin_secret: String,
}

impl Default for LeagueSettings {
    fn default() -> Self {
        Self {
            win_points: 3,
            admin_secret: "danisgreat".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub database_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: "padel_league.db".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub league: LeagueSettings,
    pub storage: StorageSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            league: LeagueSettings::default(),
            storage: StorageSettings::default(),
        }
    }

    /// Defaults overridden by `DATABASE_PATH` and `LEAGUE_ADMIN_SECRET`.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Some(path) = read_env("DATABASE_PATH") {
            config.storage.database_path = path;
        }
        if let Some(secret) = read_env("LEAGUE_ADMIN_SECRET") {
            config.league.admin_secret = secret;
        }
        config
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
