use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Access code of a fresh installation
pub const DEFAULT_ACCESS_CODE: &str = "1234";

pub const DEFAULT_DAHIRA_NAME: &str = "Dahira";

/// Sections offered before any administrator edits the list
pub const DEFAULT_SECTIONS: [&str; 8] = [
    "Médina",
    "Plateau",
    "Grand Dakar",
    "Parcelles Assainies",
    "Pikine",
    "Guédiawaye",
    "Rufisque",
    "Keur Massar",
];

/// Persisted application settings
///
/// Missing fields in a stored document fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub dahira_name: String,
    pub sections: Vec<String>,
    /// SHA-256 of the access code, lowercase hex
    pub access_code_hash: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            dahira_name: DEFAULT_DAHIRA_NAME.to_string(),
            sections: DEFAULT_SECTIONS.iter().map(|s| s.to_string()).collect(),
            access_code_hash: hash_access_code(DEFAULT_ACCESS_CODE),
        }
    }
}

/// Hash an access code for storage
pub fn hash_access_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_access_code() {
        let hash = hash_access_code("1234");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_access_code("1234"));
        assert_ne!(hash, hash_access_code("4321"));
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let settings: AppSettings =
            serde_json::from_str(r#"{"dahira_name":"Dahira Nourou Darayni"}"#).unwrap();

        assert_eq!(settings.dahira_name, "Dahira Nourou Darayni");
        assert_eq!(settings.sections.len(), DEFAULT_SECTIONS.len());
        assert_eq!(settings.access_code_hash, hash_access_code(DEFAULT_ACCESS_CODE));
    }
}
