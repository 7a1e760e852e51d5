//! Client factory for creating generation clients from configuration.

use crate::{ClientOptions, HttpGenerationClient, MockGenerationClient};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;
use wecreate_abstraction::{GenerationClient, GenerationError};

/// Which backend a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    /// The generation service over HTTP.
    Http,
    /// Offline deterministic responses.
    Mock,
}

impl FromStr for ClientKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" | "remote" => Ok(Self::Http),
            "mock" | "offline" => Ok(Self::Mock),
            _ => Err(()),
        }
    }
}

/// Factory for creating generation clients.
pub struct ClientFactory;

impl ClientFactory {
    /// Creates a client of the given kind.
    ///
    /// # Errors
    /// Returns a `GenerationError` if the HTTP client cannot be built.
    pub fn create(
        kind: ClientKind,
        options: ClientOptions,
    ) -> Result<Arc<dyn GenerationClient>, GenerationError> {
        debug!(kind = ?kind, base_url = %options.base_url, "Creating generation client");

        match kind {
            ClientKind::Http => Ok(Arc::new(HttpGenerationClient::new(options)?)),
            ClientKind::Mock => Ok(Arc::new(MockGenerationClient::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_kind_from_str() {
        assert_eq!(ClientKind::from_str("HTTP"), Ok(ClientKind::Http));
        assert_eq!(ClientKind::from_str("offline"), Ok(ClientKind::Mock));
        assert!(ClientKind::from_str("grpc").is_err());
    }

    #[test]
    fn test_factory_creates_clients() {
        let mock = ClientFactory::create(ClientKind::Mock, ClientOptions::default()).unwrap();
        assert_eq!(mock.endpoint(), "mock");

        let http = ClientFactory::create(ClientKind::Http, ClientOptions::new("http://svc.test/"))
            .unwrap();
        assert_eq!(http.endpoint(), "http://svc.test");
    }
}
