use deadpool_postgres::{Config, Pool, PoolConfig, Runtime};
use std::fs::File;
use std::io::BufReader;
use tokio_postgres::NoTls;
use tracing::info;

/// Connection pool type alias
pub type DbPool = Pool;

/// Create a connection pool from configuration, plaintext or rustls
/// depending on `tls_enabled`.
pub fn create_pool(config: &config::DatabaseConfig) -> anyhow::Result<Pool> {
    let mut cfg = Config::new();
    cfg.host = config.host.clone();
    cfg.port = Some(config.port);
    cfg.dbname = Some(config.database.clone());
    cfg.user = Some(config.username.clone());
    cfg.password = Some(config.password.clone());
    cfg.pool = Some(PoolConfig::new(config.max_connections as usize));

    if config.tls_enabled {
        create_pool_with_rustls(cfg, config.tls_ca_cert_path.as_deref())
    } else {
        info!("Connecting to Postgres without TLS");
        cfg.create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| anyhow::anyhow!("Failed to create pool: {}", e))
    }
}

/// Create pool using rustls with either custom certificate or platform verifier
pub fn create_pool_with_rustls(cfg: Config, cert_path: Option<&str>) -> anyhow::Result<Pool> {
    use tokio_postgres_rustls::MakeRustlsConnect;

    // Install the default crypto provider (ring) if not already installed
    let _ = rustls::crypto::ring::default_provider().install_default();

    let client_config = if let Some(cert_path) = cert_path {
        info!(
            "Using rustls with custom CA certificate from: {}",
            cert_path
        );

        let cert_file = File::open(cert_path)
            .map_err(|e| anyhow::anyhow!("Failed to open certificate file {}: {}", cert_path, e))?;
        let mut reader = BufReader::new(cert_file);

        let certs = rustls_pemfile::certs(&mut reader)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Failed to parse certificate: {}", e))?;

        if certs.is_empty() {
            return Err(anyhow::anyhow!("No certificates found in {}", cert_path));
        }

        let mut root_store = rustls::RootCertStore::empty();
        for cert in certs {
            root_store
                .add(cert)
                .map_err(|e| anyhow::anyhow!("Failed to add certificate to root store: {}", e))?;
        }

        rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth()
    } else {
        // OS-native verification, includes revocation checking via OCSP/CRLs
        info!("Using rustls with platform verifier (OS certificate store)");

        use rustls_platform_verifier::ConfigVerifierExt;
        rustls::ClientConfig::with_platform_verifier()
    };

    let tls = MakeRustlsConnect::new(client_config);

    cfg.create_pool(Some(Runtime::Tokio1), tls)
        .map_err(|e| anyhow::anyhow!("Failed to create TLS pool: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config(tls_enabled: bool) -> config::DatabaseConfig {
        config::DatabaseConfig {
            host: Some("localhost".to_string()),
            port: 5432,
            database: "family_screen".to_string(),
            username: "postgres".to_string(),
            password: "postgres".to_string(),
            max_connections: 5,
            tls_enabled,
            tls_ca_cert_path: None,
        }
    }

    #[test]
    fn test_plaintext_pool_creation() {
        // Pool creation is lazy; no server needed.
        let pool = create_pool(&local_config(false));
        assert!(pool.is_ok());
    }

    #[test]
    fn test_tls_pool_creation_with_platform_verifier() {
        let pool = create_pool(&local_config(true));
        assert!(pool.is_ok());
    }

    #[test]
    fn test_missing_cert_file_is_an_error() {
        let mut config = local_config(true);
        config.tls_ca_cert_path = Some("/nonexistent/ca.pem".to_string());
        assert!(create_pool(&config).is_err());
    }
}
