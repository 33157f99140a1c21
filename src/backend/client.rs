use crate::backend::{decode_reply, Endpoint, Payload, QueryService, Service};
use crate::config::BackendConfig;
use crate::model::{BackendReply, QueryError, StockList};

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct HttpQueryService {
    client: Client,
    finance_url: String,
    shopping_url: String,
    recommend_path: String,
}

impl HttpQueryService {
    pub fn new(config: &BackendConfig) -> Result<Self, QueryError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            finance_url: config.finance_url.trim_end_matches('/').to_string(),
            shopping_url: config.shopping_url.trim_end_matches('/').to_string(),
            recommend_path: config.recommend_path.clone(),
        })
    }

    fn build_url(&self, endpoint: Endpoint) -> String {
        match endpoint.service() {
            Service::Shopping => join_url(&self.shopping_url, &self.recommend_path),
            Service::Finance => {
                join_url(&self.finance_url, endpoint.finance_path().unwrap_or_default())
            }
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base, path.trim_start_matches('/'))
}

#[async_trait::async_trait]
impl QueryService for HttpQueryService {
    async fn query(&self, endpoint: Endpoint, payload: &Payload) -> Result<BackendReply, QueryError> {
        let url = self.build_url(endpoint);
        info!("POST {}", url);
        debug!("Payload: {:?}", payload);

        let response = self.client.post(&url).json(payload).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!("Backend responded [{}] for {}", status, url);
        }

        decode_reply(status.as_u16(), &body)
    }

    async fn stock_list(&self) -> Result<StockList, QueryError> {
        let url = self.build_url(Endpoint::StockList);
        info!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "unknown".into());
            warn!("Backend responded [{}] for {}", status, url);
            return Err(QueryError::Api {
                status: status.as_u16(),
                message: message.trim().to_string(),
            });
        }

        response
            .json::<StockList>()
            .await
            .map_err(|e| QueryError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> HttpQueryService {
        HttpQueryService::new(&BackendConfig {
            finance_url: "http://finance.local:5000/".into(),
            shopping_url: "http://shop.local".into(),
            recommend_path: "api/recommendations".into(),
            ..BackendConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn finance_urls_use_fixed_paths() {
        assert_eq!(
            service().build_url(Endpoint::AnalystRecommendations),
            "http://finance.local:5000/api/get_analyst_recommendations"
        );
        assert_eq!(
            service().build_url(Endpoint::StockList),
            "http://finance.local:5000/api/get_stock_list"
        );
    }

    #[test]
    fn recommendations_go_to_the_shopping_backend() {
        assert_eq!(
            service().build_url(Endpoint::Recommendations),
            "http://shop.local/api/recommendations"
        );
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        let service = HttpQueryService::new(&BackendConfig {
            finance_url: "http://127.0.0.1:9".into(),
            request_timeout_secs: Some(2),
            ..BackendConfig::default()
        })
        .unwrap();
        let result = service
            .query(Endpoint::StockPrice, &Payload::Ticker("AAPL".into()))
            .await;
        assert!(matches!(result, Err(QueryError::Network(_))));
    }
}
