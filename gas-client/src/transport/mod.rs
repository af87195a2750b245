pub mod gas_http_client;

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use shared::TransportError;

pub use gas_http_client::GasHttpClient;

/// Flat, ordered key/value pairs sent as a form body or query string.
pub type WireFields = Vec<(String, String)>;

/// The network exchange with the remote endpoint.
///
/// Implementations do not retry and apply no policy of their own; callers
/// decide whether a failure is contained or surfaced.
pub trait Transport: Send + Sync {
    fn post_form(
        &self,
        fields: &[(String, String)],
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    fn get_json<R>(
        &self,
        query: &[(String, String)],
    ) -> impl Future<Output = Result<R, TransportError>> + Send
    where
        R: DeserializeOwned + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn post_form(
        &self,
        fields: &[(String, String)],
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        (**self).post_form(fields)
    }

    fn get_json<R>(
        &self,
        query: &[(String, String)],
    ) -> impl Future<Output = Result<R, TransportError>> + Send
    where
        R: DeserializeOwned + Send,
    {
        (**self).get_json(query)
    }
}
