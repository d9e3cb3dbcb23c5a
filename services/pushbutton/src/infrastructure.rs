// Infrastructure layer modules
pub mod api_client;
pub mod clock;
pub mod config;
pub mod logging;
pub mod parameter_store;

// Re-exports
pub use api_client::{
    finish_response, ApiClientError, ApiEnvelope, L2lApiClient, OperationsApi, DEFAULT_LIMIT,
};
pub use clock::{format_api_datetime, Clock, SystemClock};
pub use config::{ButtonConfig, ButtonConfigError, DispatchSettings, L2lApiConfig};
pub use logging::init_logging;
pub use parameter_store::{AwsParameterStore, ParameterStore, ParameterStoreError};
