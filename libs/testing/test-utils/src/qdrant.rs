//! Qdrant test infrastructure
//!
//! Provides a `TestQdrant` helper that runs a throwaway Qdrant container.

use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage};

const QDRANT_IMAGE: &str = "qdrant/qdrant";
const QDRANT_TAG: &str = "v1.15.1";
const QDRANT_GRPC_PORT: u16 = 6334;

/// Test Qdrant wrapper that ensures proper cleanup
///
/// The container is stopped and removed when this struct is dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestQdrant;
///
/// # async fn example() {
/// let qdrant = TestQdrant::new().await;
/// println!("gRPC endpoint: {}", qdrant.url());
/// # }
/// ```
pub struct TestQdrant {
    #[allow(dead_code)]
    container: ContainerAsync<GenericImage>,
    url: String,
}

impl TestQdrant {
    /// Start a new Qdrant container and wait for its gRPC listener.
    pub async fn new() -> Self {
        let container = GenericImage::new(QDRANT_IMAGE, QDRANT_TAG)
            .with_exposed_port(QDRANT_GRPC_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout("gRPC listening"))
            .start()
            .await
            .expect("Failed to start Qdrant container");

        let host_port = container
            .get_host_port_ipv4(QDRANT_GRPC_PORT)
            .await
            .expect("Failed to get Qdrant gRPC port");

        let url = format!("http://127.0.0.1:{}", host_port);
        tracing::info!(port = host_port, "Test Qdrant ready ({}:{})", QDRANT_IMAGE, QDRANT_TAG);

        Self { container, url }
    }

    /// gRPC URL to hand to a Qdrant client.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for TestQdrant {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test Qdrant container");
    }
}
