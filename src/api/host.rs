use indexmap::IndexMap;

/// Console origin to backend base URL. An origin without an entry talks to
/// itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMap {
    entries: IndexMap<String, String>,
}

impl Default for HostMap {
    fn default() -> Self {
        let entries = [
            ("http://localhost:5173", "http://dev-palace.aide-cloud.cn"),
            ("http://127.0.0.1:5173", "http://localhost:8000"),
            ("http://192.168.10.68:5173", "http://192.168.10.2:8000"),
            ("http://localhost:5174", "http://192.168.10.2:8000"),
        ]
        .into_iter()
        .map(|(origin, backend)| (origin.to_string(), backend.to_string()))
        .collect();
        Self { entries }
    }
}

impl HostMap {
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Adds or replaces entries, e.g. from the config file.
    pub fn with_overrides(mut self, overrides: &IndexMap<String, String>) -> Self {
        for (origin, backend) in overrides {
            self.entries
                .insert(normalize(origin).to_string(), backend.clone());
        }
        self
    }

    pub fn resolve(&self, origin: &str) -> String {
        let origin = normalize(origin);
        self.entries
            .get(origin)
            .cloned()
            .unwrap_or_else(|| origin.to_string())
    }
}

fn normalize(origin: &str) -> &str {
    origin.trim().trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_origins_map_to_their_backend() {
        let hosts = HostMap::default();
        assert_eq!(hosts.resolve("http://localhost:5173"), "http://dev-palace.aide-cloud.cn");
        assert_eq!(hosts.resolve("http://127.0.0.1:5173/"), "http://localhost:8000");
    }

    #[test]
    fn unknown_origin_maps_to_itself() {
        let hosts = HostMap::default();
        assert_eq!(hosts.resolve("https://moon.example.com"), "https://moon.example.com");
    }

    #[test]
    fn overrides_win() {
        let mut overrides = IndexMap::new();
        overrides.insert("http://localhost:5173/".to_string(), "http://127.0.0.1:9000".to_string());
        let hosts = HostMap::default().with_overrides(&overrides);
        assert_eq!(hosts.resolve("http://localhost:5173"), "http://127.0.0.1:9000");
    }
}
