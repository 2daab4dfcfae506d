use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes a prepared request. Implemented by the real client, by the auth
/// wrappers that decorate it, and by in-memory doubles in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
