use std::collections::BTreeMap;

/// Environment lookup that prefers values from an explicit dotenv snapshot
/// and falls back to the process environment. Blank values count as unset.
#[derive(Debug, Clone, Default)]
pub struct Env {
    pub dotenv: BTreeMap<String, String>,
}

impl Env {
    pub fn parse_dotenv(contents: &str) -> Self {
        Self {
            dotenv: parse_dotenv(contents),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.dotenv.get(key) {
            return Some(value.clone());
        }
        std::env::var(key)
            .ok()
            .filter(|value| !value.trim().is_empty())
    }
}

pub fn parse_dotenv(contents: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::<String, String>::new();

    for raw_line in contents.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line).trim();
        let Some((raw_key, raw_value)) = line.split_once('=') else {
            continue;
        };
        let key = raw_key.trim();
        if key.is_empty() {
            continue;
        }

        let mut value = raw_value.trim().to_string();
        if let Some(stripped) = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        {
            value = stripped.to_string();
        }
        if value.trim().is_empty() {
            continue;
        }
        out.insert(key.to_string(), value);
    }

    out
}

/// Capability flags for the fallback chain, decided at construction time.
/// A missing credential silently disables the corresponding adapter; the
/// key-free fallback needs no entry here and can never be disabled. Base
/// URLs are overridable so tests can point adapters at a local server.
#[derive(Debug, Clone, Default)]
pub struct AcquireConfig {
    pub together_api_key: Option<String>,
    pub bfl_api_key: Option<String>,
    pub unsplash_access_key: Option<String>,
    pub together_base_url: Option<String>,
    pub bfl_base_url: Option<String>,
    pub pollinations_base_url: Option<String>,
    pub unsplash_base_url: Option<String>,
}

impl AcquireConfig {
    pub fn from_env(env: &Env) -> Self {
        Self {
            together_api_key: non_blank(env.get("TOGETHER_AI_API_KEY")),
            bfl_api_key: non_blank(env.get("FLUX_API_KEY")),
            unsplash_access_key: non_blank(env.get("UNSPLASH_ACCESS_KEY")),
            ..Self::default()
        }
    }

    pub fn with_together_api_key(mut self, key: impl Into<String>) -> Self {
        self.together_api_key = non_blank(Some(key.into()));
        self
    }

    pub fn with_bfl_api_key(mut self, key: impl Into<String>) -> Self {
        self.bfl_api_key = non_blank(Some(key.into()));
        self
    }

    pub fn with_unsplash_access_key(mut self, key: impl Into<String>) -> Self {
        self.unsplash_access_key = non_blank(Some(key.into()));
        self
    }

    pub fn with_together_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.together_base_url = Some(base_url.into());
        self
    }

    pub fn with_bfl_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.bfl_base_url = Some(base_url.into());
        self
    }

    pub fn with_pollinations_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.pollinations_base_url = Some(base_url.into());
        self
    }

    pub fn with_unsplash_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.unsplash_base_url = Some(base_url.into());
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
