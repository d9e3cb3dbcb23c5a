//! SSM Parameter Store操作モジュール
//!
//! Leading2Lean APIトークンをSecureStringパラメータから取得する。

use async_trait::async_trait;
use aws_sdk_ssm::Client as SsmClient;
use thiserror::Error;
use tracing::{debug, error};

/// パラメータ取得のエラー型
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParameterStoreError {
    /// AWS SDK エラー
    #[error("AWS SSM APIエラー: {0}")]
    AwsSdkError(String),
    /// パラメータに値が無い
    #[error("パラメータに値がありません: {0}")]
    EmptyParameter(String),
}

/// パラメータストア操作トレイト（テスト用の抽象化）
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// 復号済みのパラメータ値を取得する
    async fn get_secure_string(&self, name: &str) -> Result<String, ParameterStoreError>;
}

/// 実際のAWS SSM SDKを使用した実装
pub struct AwsParameterStore {
    client: SsmClient,
}

impl AwsParameterStore {
    pub fn new(client: SsmClient) -> Self {
        Self { client }
    }

    /// AWS設定からデフォルトのクライアントを作成
    pub async fn from_config() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(SsmClient::new(&config))
    }
}

#[async_trait]
impl ParameterStore for AwsParameterStore {
    async fn get_secure_string(&self, name: &str) -> Result<String, ParameterStoreError> {
        debug!(parameter = name, "SSMパラメータを取得");

        let output = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|e| {
                error!(parameter = name, error = %e, "SSMパラメータ取得失敗");
                ParameterStoreError::AwsSdkError(e.to_string())
            })?;

        output
            .parameter()
            .and_then(|p| p.value())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ParameterStoreError::EmptyParameter(name.to_string()))
    }
}
