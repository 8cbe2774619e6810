//! Pods API - Entry Point
//!
//! Minimal entry point that delegates to [`pods_api::run`].

#[tokio::main]
async fn main() -> eyre::Result<()> {
    pods_api::run().await
}
