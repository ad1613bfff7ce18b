//! TLS client configuration for the TCP control transport.

use std::{fs::File, io::BufReader, path::Path, sync::Arc};

use tokio_rustls::rustls::{
    ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme,
    client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier},
    crypto::{CryptoProvider, aws_lc_rs, verify_tls12_signature, verify_tls13_signature},
    pki_types::{CertificateDer, PrivateKeyDer, ServerName, UnixTime},
};
use tracing::warn;

use crate::{ControlError, Result, config::TlsConfig};

/// Build the rustls client configuration for `tls`.
///
/// The client certificate is always presented. The server is verified only
/// when a CA bundle is configured.
pub(crate) fn client_config(tls: &TlsConfig) -> Result<ClientConfig> {
    let provider = Arc::new(aws_lc_rs::default_provider());
    let certs = load_certs(&tls.cert)?;
    let key = load_key(&tls.key)?;

    let builder = ClientConfig::builder_with_provider(Arc::clone(&provider))
        .with_safe_default_protocol_versions()
        .map_err(|e| ControlError::Connection(format!("TLS configuration error: {e}")))?;

    let builder = if let Some(ca) = &tls.ca {
        builder.with_root_certificates(root_store(ca)?)
    } else {
        warn!("No CA configured for the control connection, server certificate is not verified");
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(NoVerifier(provider)))
    };

    builder
        .with_client_auth_cert(certs, key)
        .map_err(|e| ControlError::Connection(format!("Invalid client certificate: {e}")))
}

/// Name used for SNI and for verifying the server certificate
pub(crate) fn server_name(tls: &TlsConfig, host: &str) -> Result<ServerName<'static>> {
    let name = tls.server_name.as_deref().unwrap_or(host);
    ServerName::try_from(name.to_string())
        .map_err(|e| ControlError::Connection(format!("Invalid server name {name}: {e}")))
}

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let file = File::open(path).map_err(|e| {
        ControlError::Connection(format!("Unable to open {}: {e}", path.display()))
    })?;

    let certs = rustls_pemfile::certs(&mut BufReader::new(file))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| {
            ControlError::Connection(format!("Unable to read {}: {e}", path.display()))
        })?;

    if certs.is_empty() {
        return Err(ControlError::Connection(format!(
            "No certificates found in {}",
            path.display()
        )));
    }

    Ok(certs)
}

fn load_key(path: &Path) -> Result<PrivateKeyDer<'static>> {
    let file = File::open(path).map_err(|e| {
        ControlError::Connection(format!("Unable to open {}: {e}", path.display()))
    })?;
    let mut reader = BufReader::new(file);

    loop {
        match rustls_pemfile::read_one(&mut reader).map_err(|e| {
            ControlError::Connection(format!("Unable to read {}: {e}", path.display()))
        })? {
            Some(rustls_pemfile::Item::Pkcs1Key(key)) => return Ok(PrivateKeyDer::Pkcs1(key)),
            Some(rustls_pemfile::Item::Pkcs8Key(key)) => return Ok(PrivateKeyDer::Pkcs8(key)),
            Some(rustls_pemfile::Item::Sec1Key(key)) => return Ok(PrivateKeyDer::Sec1(key)),
            Some(_) => {}
            None => {
                return Err(ControlError::Connection(format!(
                    "No private key found in {} (expected PKCS1, PKCS8, or SEC1)",
                    path.display()
                )));
            }
        }
    }
}

fn root_store(ca: &Path) -> Result<RootCertStore> {
    let mut roots = RootCertStore::empty();
    for cert in load_certs(ca)? {
        roots.add(cert).map_err(|e| {
            ControlError::Connection(format!("Invalid CA certificate in {}: {e}", ca.display()))
        })?;
    }
    Ok(roots)
}

/// Accepts any server certificate, but still checks handshake signatures.
#[derive(Debug)]
struct NoVerifier(Arc<CryptoProvider>);

impl ServerCertVerifier for NoVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, tokio_rustls::rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, tokio_rustls::rustls::Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.0.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, tokio_rustls::rustls::Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.0.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0
            .signature_verification_algorithms
            .supported_schemes()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_certificate_is_connection_error() {
        let tls = TlsConfig::new("/nonexistent/client.pem", "/nonexistent/client.key");
        let err = client_config(&tls).unwrap_err();
        assert!(matches!(err, ControlError::Connection(ref msg) if msg.contains("client.pem")));
    }

    #[test]
    fn test_server_name_defaults_to_host() {
        let tls = TlsConfig::new("client.pem", "client.key");
        let name = server_name(&tls, "localhost").unwrap();
        assert!(matches!(name, ServerName::DnsName(ref dns) if dns.as_ref() == "localhost"));

        let name = server_name(&tls.with_server_name("unbound"), "127.0.0.1").unwrap();
        assert!(matches!(name, ServerName::DnsName(ref dns) if dns.as_ref() == "unbound"));
    }

    #[test]
    fn test_server_name_accepts_ip_address() {
        let tls = TlsConfig::new("client.pem", "client.key");
        let name = server_name(&tls, "127.0.0.1").unwrap();
        assert!(matches!(name, ServerName::IpAddress(_)));
    }
}
