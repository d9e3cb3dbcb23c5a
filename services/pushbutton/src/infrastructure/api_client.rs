// Leading2Lean APIクライアント
//
// すべてのリクエストに`auth`、`site`、`limit`を付与し、
// `{success, data}`形式のレスポンスエンベロープを正規化する。

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, instrument};

use super::config::L2lApiConfig;

/// リクエストタイムアウト（秒）
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// 接続タイムアウト（秒）
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// 取得件数のデフォルト
pub const DEFAULT_LIMIT: u32 = 1;

/// APIクライアントのエラー型
///
/// # エラー種別
/// - `ClientBuild`: HTTPクライアントの構築失敗
/// - `NetworkError`: ネットワーク接続エラー
/// - `HttpError`: 2xx以外のステータス
/// - `InvalidEnvelope`: レスポンスがエンベロープ形式のJSONでない
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiClientError {
    #[error("HTTPクライアントの構築に失敗: {0}")]
    ClientBuild(String),

    #[error("ネットワークエラー: {0}")]
    NetworkError(String),

    #[error("HTTPエラー: status={status}, message={message}")]
    HttpError { status: u16, message: String },

    #[error("レスポンス形式エラー: {0}")]
    InvalidEnvelope(String),
}

/// APIのレスポンスエンベロープ
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Value,
}

/// エンベロープを正規化する
///
/// - `success`が偽、または`data`が空（null、空配列、空オブジェクト、空文字、0、false）なら`None`
/// - `limit`が1で`data`が配列なら先頭要素
/// - それ以外は`data`そのもの
pub fn finish_response(envelope: ApiEnvelope, limit: u32) -> Option<Value> {
    if !envelope.success || !is_truthy(&envelope.data) {
        return None;
    }

    match envelope.data {
        Value::Array(items) if limit == 1 => items.into_iter().next(),
        data => Some(data),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_none_or(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// 送信するリクエスト
///
/// 固定の`auth`、`site`、`limit`にリソースごとのペイロードを平坦化して並べる。
/// GETではクエリ文字列、POSTではフォームボディになる。
#[derive(Debug, Serialize)]
struct ApiRequest<'a, P> {
    auth: &'a str,
    site: &'a str,
    limit: u32,
    #[serde(flatten)]
    payload: &'a P,
}

/// 運用APIの呼び出しトレイト
///
/// 実際のHTTP実装とテスト用モックを差し替えるための抽象化。
/// 戻り値は正規化済みのデータで、業務的な失敗や空の結果は`Ok(None)`になる。
#[async_trait]
pub trait OperationsApi: Send + Sync {
    /// GETリクエスト（ペイロードはクエリ文字列）
    async fn get<P>(
        &self,
        path: &str,
        payload: &P,
        limit: u32,
    ) -> Result<Option<Value>, ApiClientError>
    where
        P: Serialize + Sync;

    /// POSTリクエスト（ペイロードはフォームボディ）
    async fn post<P>(
        &self,
        path: &str,
        payload: &P,
        limit: u32,
    ) -> Result<Option<Value>, ApiClientError>
    where
        P: Serialize + Sync;
}

/// reqwestを使用したLeading2Lean APIクライアント
#[derive(Clone)]
pub struct L2lApiClient {
    client: Client,
    config: L2lApiConfig,
}

impl std::fmt::Debug for L2lApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("L2lApiClient")
            .field("base_url", &self.config.base_url())
            .finish_non_exhaustive()
    }
}

impl L2lApiClient {
    /// 設定からクライアントを作成
    pub fn new(config: L2lApiConfig) -> Result<Self, ApiClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiClientError::ClientBuild(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn request<'a, P>(&'a self, payload: &'a P, limit: u32) -> ApiRequest<'a, P> {
        ApiRequest {
            auth: self.config.auth_token(),
            site: self.config.site_id(),
            limit,
            payload,
        }
    }

    async fn finish(
        &self,
        path: &str,
        response: reqwest::Response,
        limit: u32,
    ) -> Result<Option<Value>, ApiClientError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(path = path, error = %e, "レスポンスの読み取りに失敗");
            ApiClientError::NetworkError(e.to_string())
        })?;

        if !status.is_success() {
            error!(path = path, status = %status, body = %body, "APIエラーレスポンス");
            return Err(ApiClientError::HttpError {
                status: status.as_u16(),
                message: body,
            });
        }

        let envelope: ApiEnvelope = serde_json::from_str(&body).map_err(|e| {
            error!(path = path, error = %e, "レスポンスのパースに失敗");
            ApiClientError::InvalidEnvelope(e.to_string())
        })?;

        if !envelope.success {
            debug!(path = path, data = %envelope.data, "APIが失敗を返却");
        }

        Ok(finish_response(envelope, limit))
    }
}

fn network_error(path: &str, e: reqwest::Error) -> ApiClientError {
    error!(path = path, error = %e, "APIリクエスト失敗");
    ApiClientError::NetworkError(e.to_string())
}

#[async_trait]
impl OperationsApi for L2lApiClient {
    #[instrument(skip(self, payload), fields(method = "GET"))]
    async fn get<P>(
        &self,
        path: &str,
        payload: &P,
        limit: u32,
    ) -> Result<Option<Value>, ApiClientError>
    where
        P: Serialize + Sync,
    {
        let url = self.config.endpoint_url(path);
        debug!(url = %url, "APIを呼び出し");

        let response = self
            .client
            .get(&url)
            .query(&self.request(payload, limit))
            .send()
            .await
            .map_err(|e| network_error(path, e))?;

        self.finish(path, response, limit).await
    }

    #[instrument(skip(self, payload), fields(method = "POST"))]
    async fn post<P>(
        &self,
        path: &str,
        payload: &P,
        limit: u32,
    ) -> Result<Option<Value>, ApiClientError>
    where
        P: Serialize + Sync,
    {
        let url = self.config.endpoint_url(path);
        debug!(url = %url, "APIを呼び出し");

        let response = self
            .client
            .post(&url)
            .form(&self.request(payload, limit))
            .send()
            .await
            .map_err(|e| network_error(path, e))?;

        self.finish(path, response, limit).await
    }
}
