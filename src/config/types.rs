use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::store::StoreConfig;

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: bind address, store backend, JWT settings, etc.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    pub bind_address: String,
    pub store: StoreConfig,
    pub jwt: JwtConfig,
    /// bcrypt work factor applied to every stored password.
    #[serde(default = "default_password_cost")]
    pub password_cost: u32,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for issuing and verifying session tokens.
///
/// The secret is a deployment input: set it in config.yaml or via the
/// TODOTRON_JWT__SECRET environment variable, never in code.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds. Defaults to 7 days.
    #[serde(default = "default_token_exp")]
    pub exp: i64,
    #[serde(default = "default_issuer")]
    pub iss: String,
}

fn default_password_cost() -> u32 {
    12
}

fn default_token_exp() -> i64 {
    7 * 24 * 60 * 60
}

fn default_issuer() -> String {
    "todotron".to_string()
}

/// Load config from "config.yaml" in the current directory, with overrides
/// from TODOTRON_-prefixed environment variables ("__" separates nesting,
/// e.g. TODOTRON_JWT__SECRET, TODOTRON_BIND_ADDRESS).
pub fn load_config() -> ConfigV1 {
    let figment = Figment::new()
        .merge(Yaml::file("./config.yaml"))
        .merge(Env::prefixed("TODOTRON_").split("__"));

    let config = match figment.extract::<Config>() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };
    match config {
        Config::ConfigV1(c) => c,
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema).unwrap());
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    const TEST_CONFIG: &str = r#"
version: "1.0.0"
bind_address: "0.0.0.0:4000"
store:
  type: memory
jwt:
  secret: "test-secret"
logging:
  level: "debug"
  format: "console"
"#;

    /// Defaults apply when the optional fields are omitted.
    #[test]
    fn test_defaults_from_minimal_yaml() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", TEST_CONFIG)?;
            let config = load_config();
            assert_eq!(config.bind_address, "0.0.0.0:4000");
            assert_eq!(config.jwt.exp, 7 * 24 * 60 * 60);
            assert_eq!(config.jwt.iss, "todotron");
            assert_eq!(config.password_cost, 12);
            Ok(())
        });
    }

    /// Environment variables override file values.
    #[test]
    fn test_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", TEST_CONFIG)?;
            jail.set_env("TODOTRON_JWT__SECRET", "from-env");
            jail.set_env("TODOTRON_JWT__EXP", "3600");
            let config = load_config();
            assert_eq!(config.jwt.secret, "from-env");
            assert_eq!(config.jwt.exp, 3600);
            Ok(())
        });
    }
}
