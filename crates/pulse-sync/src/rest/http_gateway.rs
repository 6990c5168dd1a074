//! HTTP implementation of the reaction gateway
//!
//! The authoritative path for every mutation. The bearer token is read from
//! the store on each request, never cached, so a refreshed token is used
//! immediately.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use pulse_common::{RestConfig, TokenStore};
use pulse_core::{
    Comment, CommentReactions, DomainError, EntityId, GatewayResult, PostLikeState, ReactionGateway,
};

/// Reaction gateway over the blog REST API
pub struct HttpReactionGateway {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl HttpReactionGateway {
    /// Build a gateway from the REST configuration
    pub fn new(config: &RestConfig, tokens: Arc<dyn TokenStore>) -> GatewayResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| DomainError::Gateway(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> GatewayResult<reqwest::Response> {
        let request = match self.tokens.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        request
            .send()
            .await
            .map_err(|e| DomainError::Gateway(e.to_string()))
    }
}

/// Map a non-success response to the domain taxonomy
async fn ensure_success(
    response: reqwest::Response,
    not_found: impl FnOnce() -> DomainError,
) -> GatewayResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = read_error_message(response).await;
    Err(match status.as_u16() {
        401 => DomainError::Unauthenticated,
        403 => DomainError::PermissionDenied(message),
        404 => not_found(),
        400 | 409 | 422 => DomainError::Rejected(message),
        _ => DomainError::Gateway(format!("{status}: {message}")),
    })
}

async fn read_error_message(response: reqwest::Response) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(alias = "error")]
        message: Option<String>,
    }

    let status = response.status();
    response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}

async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> GatewayResult<T> {
    response
        .json()
        .await
        .map_err(|e| DomainError::Gateway(e.to_string()))
}

#[async_trait]
impl ReactionGateway for HttpReactionGateway {
    async fn like_comment(&self, comment_id: &EntityId) -> GatewayResult<CommentReactions> {
        let response = self
            .send(self.http.post(self.url(&format!("/comments/{comment_id}/like"))))
            .await?;
        let response =
            ensure_success(response, || DomainError::CommentNotFound(comment_id.clone())).await?;
        read_json(response).await
    }

    async fn dislike_comment(&self, comment_id: &EntityId) -> GatewayResult<CommentReactions> {
        let response = self
            .send(self.http.post(self.url(&format!("/comments/{comment_id}/dislike"))))
            .await?;
        let response =
            ensure_success(response, || DomainError::CommentNotFound(comment_id.clone())).await?;
        read_json(response).await
    }

    async fn like_post(&self, post_id: &EntityId) -> GatewayResult<PostLikeState> {
        let response = self
            .send(self.http.post(self.url(&format!("/posts/{post_id}/like"))))
            .await?;
        let response =
            ensure_success(response, || DomainError::PostNotFound(post_id.clone())).await?;
        read_json(response).await
    }

    async fn report_comment(&self, comment_id: &EntityId, reason: &str) -> GatewayResult<()> {
        let response = self
            .send(
                self.http
                    .post(self.url(&format!("/comments/{comment_id}/report")))
                    .json(&json!({ "reason": reason })),
            )
            .await?;
        ensure_success(response, || DomainError::CommentNotFound(comment_id.clone())).await?;
        Ok(())
    }

    async fn fetch_replies(&self, comment_id: &EntityId) -> GatewayResult<Vec<Comment>> {
        #[derive(Deserialize)]
        struct RepliesBody {
            #[serde(default)]
            replies: Vec<Comment>,
        }

        let response = self
            .send(self.http.get(self.url(&format!("/comments/{comment_id}/replies"))))
            .await?;
        let response =
            ensure_success(response, || DomainError::CommentNotFound(comment_id.clone())).await?;
        let body: RepliesBody = read_json(response).await?;
        Ok(body.replies)
    }
}

impl std::fmt::Debug for HttpReactionGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpReactionGateway")
            .field("base_url", &self.base_url)
            .finish()
    }
}
