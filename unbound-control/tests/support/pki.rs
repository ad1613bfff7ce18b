//! Throwaway certificate authority for TLS tests
//!
//! Mirrors what `unbound-control-setup` produces: one CA that signs both the
//! server certificate and the client certificate. A second, unrelated CA is
//! written alongside for verification failure tests.
#![allow(dead_code)] // Not every test binary uses every file

use std::{path::PathBuf, sync::Arc};

use rcgen::{
    BasicConstraints, Certificate, CertificateParams, DnType, ExtendedKeyUsagePurpose, IsCa,
    KeyPair,
};
use tempfile::TempDir;
use tokio_rustls::rustls::{
    RootCertStore, ServerConfig,
    crypto::aws_lc_rs,
    pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer},
    server::WebPkiClientVerifier,
};
use unbound_control::TlsConfig;

/// Name in the server certificate's subject alternative names
pub const SERVER_NAME: &str = "localhost";

pub struct Pki {
    dir: TempDir,
    ca_der: Vec<u8>,
    server_der: Vec<u8>,
    server_key_der: Vec<u8>,
}

impl Pki {
    pub fn generate() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let (ca, ca_key) = certificate_authority("Unbound test CA");
        let (server, server_key) =
            leaf(&ca, &ca_key, SERVER_NAME, ExtendedKeyUsagePurpose::ServerAuth);
        let (client, client_key) = leaf(
            &ca,
            &ca_key,
            "unbound-control",
            ExtendedKeyUsagePurpose::ClientAuth,
        );
        let (other_ca, _) = certificate_authority("Unrelated CA");

        let write = |name: &str, contents: String| {
            std::fs::write(dir.path().join(name), contents).expect("Failed to write PEM file");
        };
        write("unbound_server.pem", ca.pem());
        write("unbound_control.pem", client.pem());
        write("unbound_control.key", client_key.serialize_pem());
        write("other_ca.pem", other_ca.pem());

        Self {
            ca_der: ca.der().to_vec(),
            server_der: server.der().to_vec(),
            server_key_der: server_key.serialize_der(),
            dir,
        }
    }

    /// Client credentials without server verification
    pub fn client_tls(&self) -> TlsConfig {
        TlsConfig::new(
            self.dir.path().join("unbound_control.pem"),
            self.dir.path().join("unbound_control.key"),
        )
    }

    /// The CA that signed the server certificate
    pub fn ca(&self) -> PathBuf {
        self.dir.path().join("unbound_server.pem")
    }

    /// A CA that signed nothing in use
    pub fn other_ca(&self) -> PathBuf {
        self.dir.path().join("other_ca.pem")
    }

    /// Server side configuration demanding a client certificate from our CA
    pub fn server_config(&self) -> Arc<ServerConfig> {
        let provider = Arc::new(aws_lc_rs::default_provider());

        let mut roots = RootCertStore::empty();
        roots
            .add(CertificateDer::from(self.ca_der.clone()))
            .expect("Failed to add CA");

        let verifier =
            WebPkiClientVerifier::builder_with_provider(Arc::new(roots), Arc::clone(&provider))
                .build()
                .expect("Failed to build client verifier");

        let config = ServerConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .expect("Failed to select protocol versions")
            .with_client_cert_verifier(verifier)
            .with_single_cert(
                vec![CertificateDer::from(self.server_der.clone())],
                PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(self.server_key_der.clone())),
            )
            .expect("Failed to build server config");

        Arc::new(config)
    }
}

fn certificate_authority(name: &str) -> (Certificate, KeyPair) {
    let mut params = CertificateParams::default();
    params.distinguished_name.push(DnType::CommonName, name);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);

    let key = KeyPair::generate().expect("Failed to generate CA key");
    let cert = params.self_signed(&key).expect("Failed to self-sign CA");
    (cert, key)
}

fn leaf(
    ca: &Certificate,
    ca_key: &KeyPair,
    name: &str,
    usage: ExtendedKeyUsagePurpose,
) -> (Certificate, KeyPair) {
    let mut params = CertificateParams::new(vec![name.to_string()]).expect("Invalid subject name");
    params.distinguished_name.push(DnType::CommonName, name);
    params.extended_key_usages = vec![usage];

    let key = KeyPair::generate().expect("Failed to generate key");
    let cert = params
        .signed_by(&key, ca, ca_key)
        .expect("Failed to sign certificate");
    (cert, key)
}
