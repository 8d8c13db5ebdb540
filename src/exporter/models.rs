use serde::{Deserialize, Serialize};
use std::fmt;

/// Database connection settings published as a governance secret.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DbConfig {
    #[serde(rename = "dbEndpoint")]
    pub endpoint: String,
    #[serde(rename = "dbUser")]
    pub user: String,
    #[serde(rename = "dbName")]
    pub name: String,
    #[serde(rename = "dbPassword")]
    pub password: WrappedSecretConfig,
}

/// Descriptor of the wrapped password; only the unwrap service can open it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WrappedSecretConfig {
    pub client_id: String,
    pub tenant_id: String,
    pub kid: String,
    pub akv_endpoint: String,
    pub kek: KekConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KekConfig {
    pub kid: String,
    pub akv_endpoint: String,
    pub maa_endpoint: String,
}

/// Body of `POST /secrets/unwrap`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnwrapSecretRequest<'a> {
    pub client_id: &'a str,
    pub tenant_id: &'a str,
    pub kid: &'a str,
    pub akv_endpoint: &'a str,
    pub kek: &'a KekConfig,
}

impl<'a> From<&'a WrappedSecretConfig> for UnwrapSecretRequest<'a> {
    fn from(w: &'a WrappedSecretConfig) -> Self {
        Self {
            client_id: &w.client_id,
            tenant_id: &w.tenant_id,
            kid: &w.kid,
            akv_endpoint: &w.akv_endpoint,
            kek: &w.kek,
        }
    }
}

/// `{"value": "<base64>"}` envelope returned by both secret services.
#[derive(Debug, Deserialize)]
pub struct SecretValue {
    pub value: String,
}

/// One exported row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: i64,
    pub first_name: String,
}

impl fmt::Display for UserRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id: {} firstName: {}", self.id, self.first_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_config() -> serde_json::Value {
        json!({
            "dbEndpoint": "10.0.0.4",
            "dbUser": "reader",
            "dbName": "customers",
            "dbPassword": {
                "clientId": "client",
                "tenantId": "tenant",
                "kid": "wrapped-password",
                "akvEndpoint": "https://vault.example.net",
                "kek": {
                    "kid": "kek-key",
                    "akvEndpoint": "https://mhsm.example.net",
                    "maaEndpoint": "https://maa.example.net"
                }
            }
        })
    }

    #[test]
    fn db_config_reads_wire_names() {
        let cfg: DbConfig = serde_json::from_value(sample_config()).unwrap();
        assert_eq!(cfg.endpoint, "10.0.0.4");
        assert_eq!(cfg.user, "reader");
        assert_eq!(cfg.name, "customers");
        assert_eq!(cfg.password.kek.maa_endpoint, "https://maa.example.net");
    }

    #[test]
    fn incomplete_db_config_is_rejected() {
        let mut value = sample_config();
        value.as_object_mut().unwrap().remove("dbName");
        assert!(serde_json::from_value::<DbConfig>(value).is_err());
    }

    #[test]
    fn unwrap_request_mirrors_the_descriptor() {
        let cfg: DbConfig = serde_json::from_value(sample_config()).unwrap();
        let body = serde_json::to_value(UnwrapSecretRequest::from(&cfg.password)).unwrap();
        assert_eq!(body, sample_config()["dbPassword"]);
    }

    #[test]
    fn row_line_format() {
        let row = UserRow {
            id: 7,
            first_name: "Ada".to_string(),
        };
        assert_eq!(row.to_string(), "id: 7 firstName: Ada");
    }
}
