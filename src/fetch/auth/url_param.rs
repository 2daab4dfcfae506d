use crate::fetch::client::HttpClient;
use async_trait::async_trait;

/// An [`HttpClient`] wrapper that appends an API key as a URL query parameter.
///
/// The Census data API expects its key as `key=<value>`; see [`UrlParam::census`].
pub struct UrlParam<C> {
    pub inner: C,
    pub param_name: String,
    pub key: String,
}

impl<C> UrlParam<C> {
    /// Wraps `inner` so every request carries `key=<key>`.
    pub fn census(inner: C, key: String) -> Self {
        Self {
            inner,
            param_name: "key".to_string(),
            key,
        }
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for UrlParam<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.url_mut()
            .query_pairs_mut()
            .append_pair(&self.param_name, &self.key);
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::ScriptedClient;

    #[tokio::test]
    async fn test_appends_key_after_existing_params() {
        let wrapped = UrlParam::census(ScriptedClient::new(vec![(200, "[]")]), "secret".into());
        let url = reqwest::Url::parse("https://api.example.test/data?get=A").unwrap();
        let req = reqwest::Request::new(reqwest::Method::GET, url);

        wrapped.execute(req).await.unwrap();

        let seen = wrapped.inner.requests.lock().unwrap();
        assert_eq!(seen[0].query(), Some("get=A&key=secret"));
    }
}
