use serde::Deserialize;
use tracing::{debug, warn};

use super::ids::IdMinter;
use crate::error::FetchError;
use crate::state::data::CardItem;

/// One entry of `GET /v1/images/search`
#[derive(Debug, Deserialize)]
struct SearchHit {
    id: String,
    url: String,
}

/// TheCatAPI search endpoint: returns a JSON list of random images
#[derive(Debug, Clone)]
pub struct CatApi {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl CatApi {
    pub fn new(client: reqwest::Client, endpoint: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Fetch up to `count` cards with distinct ids.
    ///
    /// Duplicate hits are dropped and the shortfall re-requested, at most
    /// `count` times. An empty upstream answer ends the fetch early.
    pub async fn fetch(&self, count: usize) -> Result<Vec<CardItem>, FetchError> {
        let mut minter = IdMinter::new(count);
        let mut cards = Vec::with_capacity(count);

        while cards.len() < count {
            let wanted = count - cards.len();
            let hits = self.search(wanted).await?;
            if hits.is_empty() {
                debug!("TheCatAPI returned no more images");
                break;
            }

            for hit in hits {
                if cards.len() == count {
                    break;
                }
                if hit.url.is_empty() || !minter.claim(&hit.id) {
                    debug!("Skipping duplicate or unusable hit {}", hit.id);
                    continue;
                }
                cards.push(CardItem::new(hit.id, hit.url));
            }

            if cards.len() < count && !minter.spend_attempt() {
                warn!(
                    "Gave up after repeated duplicates: {} of {} cats",
                    cards.len(),
                    count
                );
                break;
            }
        }

        Ok(cards)
    }

    async fn search(&self, limit: usize) -> Result<Vec<SearchHit>, FetchError> {
        let url = format!("{}/v1/images/search", self.endpoint);
        let mut request = self
            .client
            .get(&url)
            .query(&[("limit", limit.to_string())]);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?.error_for_status()?;
        // Decode failures surface as `FetchError::Malformed`
        Ok(response.json::<Vec<SearchHit>>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn hit(id: &str) -> serde_json::Value {
        json!({ "id": id, "url": format!("https://cdn.test/{id}.jpg"), "width": 640, "height": 480 })
    }

    fn source(server: &MockServer) -> CatApi {
        CatApi::new(reqwest::Client::new(), &server.uri(), None)
    }

    #[tokio::test]
    async fn test_fetch_maps_hits_to_cards() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/images/search"))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([hit("a1"), hit("b2")])))
            .mount(&server)
            .await;

        let cards = source(&server).fetch(2).await.unwrap();
        assert_eq!(
            cards,
            vec![
                CardItem::new("a1", "https://cdn.test/a1.jpg"),
                CardItem::new("b2", "https://cdn.test/b2.jpg"),
            ]
        );
    }

    #[tokio::test]
    async fn test_duplicates_are_re_requested() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("limit", "3"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([hit("a"), hit("a"), hit("b")])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([hit("b"), hit("c")])))
            .mount(&server)
            .await;

        let cards = source(&server).fetch(3).await.unwrap();
        let ids: Vec<_> = cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_endless_duplicates_are_bounded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([hit("same")])))
            .expect(3)
            .mount(&server)
            .await;

        let cards = source(&server).fetch(2).await.unwrap();
        assert_eq!(cards.len(), 1);
    }

    #[tokio::test]
    async fn test_oversized_answer_is_truncated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([hit("a"), hit("b"), hit("c"), hit("d")])),
            )
            .mount(&server)
            .await;

        assert_eq!(source(&server).fetch(2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_answer_is_empty_deck() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        assert!(source(&server).fetch(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = source(&server).fetch(3).await.unwrap_err();
        assert_eq!(err, FetchError::Status { status: 503 });
    }

    #[tokio::test]
    async fn test_wrong_shape_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "a" })))
            .mount(&server)
            .await;

        let err = source(&server).fetch(1).await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_garbage_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let err = source(&server).fetch(3).await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_api_key_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("x-api-key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([hit("k")])))
            .expect(1)
            .mount(&server)
            .await;

        let source = CatApi::new(reqwest::Client::new(), &server.uri(), Some("secret".into()));
        assert_eq!(source.fetch(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let source = CatApi::new(reqwest::Client::new(), "http://127.0.0.1:9", None);
        let err = source.fetch(1).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)), "{err:?}");
    }
}
