/// ライン・オーダー・製品の参照
///
/// 実績記録の前に必要な読み取り系のAPI呼び出しをまとめる。
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::action_handler::ActionHandlerError;
use crate::domain::{
    CurrentOrderQuery, LineInfo, LineQuery, MachineInfo, MachineQuery, NextOrderQuery, Order,
    Product, ProductQuery,
};
use crate::infrastructure::{OperationsApi, DEFAULT_LIMIT};

const MACHINES_PATH: &str = "machines/";
const CURRENT_ORDER_PATH: &str = "buildsequence/get_current_order_on_line/";
const BUILD_SEQUENCE_PATH: &str = "buildsequence/";
const LINES_PATH: &str = "lines/";
const PRODUCT_COMPONENTS_PATH: &str = "productcomponents/";

/// 次オーダーとして扱うステータスコードの範囲
const NEXT_ORDER_STATUS_MIN: u8 = 2;
const NEXT_ORDER_STATUS_MAX: u8 = 6;

/// スケジュール開始日の降順
const NEXT_ORDER_SORT: &str = "-schedule_start_date";

/// 参照系API呼び出し
pub struct ProductionLookup<'a, A>
where
    A: OperationsApi,
{
    api: &'a A,
}

impl<'a, A> ProductionLookup<'a, A>
where
    A: OperationsApi,
{
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// 設備コードから設備情報を取得（存在しなければエラー）
    pub async fn machine_info(
        &self,
        machine_code: &str,
    ) -> Result<MachineInfo, ActionHandlerError> {
        let query = MachineQuery {
            code: machine_code.to_string(),
        };
        self.get_one(MACHINES_PATH, &query)
            .await?
            .ok_or_else(|| ActionHandlerError::RecordNotFound {
                resource: "machine",
                key: machine_code.to_string(),
            })
    }

    /// ライン上で実行中のオーダー
    pub async fn current_order(
        &self,
        line_code: &str,
    ) -> Result<Option<Order>, ActionHandlerError> {
        let query = CurrentOrderQuery {
            linecode: line_code.to_string(),
        };
        self.get_one(CURRENT_ORDER_PATH, &query).await
    }

    /// ラインコードからライン情報を取得
    pub async fn line_info(
        &self,
        line_code: &str,
    ) -> Result<Option<LineInfo>, ActionHandlerError> {
        let query = LineQuery {
            code: line_code.to_string(),
        };
        self.get_one(LINES_PATH, &query).await
    }

    /// ラインの次オーダー
    ///
    /// ステータス2〜6のオーダーをスケジュール開始日の降順で並べた先頭を返す。
    pub async fn next_order(&self, line_code: &str) -> Result<Option<Order>, ActionHandlerError> {
        let Some(line) = self.line_info(line_code).await? else {
            debug!(line_code = line_code, "ラインが見つからない");
            return Ok(None);
        };

        let query = NextOrderQuery {
            line: line.id,
            order_by: NEXT_ORDER_SORT.to_string(),
            status_gte: NEXT_ORDER_STATUS_MIN,
            status_lte: NEXT_ORDER_STATUS_MAX,
        };
        self.get_one(BUILD_SEQUENCE_PATH, &query).await
    }

    /// 実行中のオーダーを優先し、無ければ次オーダーを返す
    pub async fn order_for_line(
        &self,
        line_code: &str,
    ) -> Result<Option<Order>, ActionHandlerError> {
        if let Some(order) = self.current_order(line_code).await? {
            return Ok(Some(order));
        }

        info!(line_code = line_code, "実行中のオーダーが無いため次オーダーを検索");
        self.next_order(line_code).await
    }

    /// 製品IDから製品情報を取得（存在しなければエラー）
    pub async fn product_info(&self, order: &Order) -> Result<Product, ActionHandlerError> {
        let query = ProductQuery {
            id: order.product.clone(),
        };
        self.get_one(PRODUCT_COMPONENTS_PATH, &query)
            .await?
            .ok_or_else(|| ActionHandlerError::RecordNotFound {
                resource: "product",
                key: order.product.to_string(),
            })
    }

    async fn get_one<T, Q>(
        &self,
        path: &'static str,
        query: &Q,
    ) -> Result<Option<T>, ActionHandlerError>
    where
        T: DeserializeOwned,
        Q: Serialize + Sync,
    {
        self.api
            .get(path, query, DEFAULT_LIMIT)
            .await?
            .map(|value| decode(path, value))
            .transpose()
    }
}

fn decode<T: DeserializeOwned>(path: &'static str, value: Value) -> Result<T, ActionHandlerError> {
    serde_json::from_value(value).map_err(|e| ActionHandlerError::InvalidRecord {
        path,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordId;
    use crate::infrastructure::api_client::tests::MockOperationsApi;
    use crate::infrastructure::ApiClientError;
    use serde_json::json;

    #[tokio::test]
    async fn test_machine_info() {
        let api = MockOperationsApi::new();
        api.respond_get(MACHINES_PATH, json!({ "code": "GreenMachine", "linecode": "Line-A" }));

        let machine = ProductionLookup::new(&api).machine_info("GreenMachine").await.unwrap();

        assert_eq!(machine.linecode, "Line-A");
        let calls = api.calls();
        assert_eq!(calls[0].payload, json!({ "code": "GreenMachine" }));
        assert_eq!(calls[0].limit, 1);
    }

    #[tokio::test]
    async fn test_machine_info_not_found() {
        let api = MockOperationsApi::new();

        let result = ProductionLookup::new(&api).machine_info("Ghost").await;

        assert!(matches!(
            result,
            Err(ActionHandlerError::RecordNotFound { resource: "machine", .. })
        ));
    }

    #[tokio::test]
    async fn test_machine_info_without_linecode_is_invalid() {
        let api = MockOperationsApi::new();
        api.respond_get(MACHINES_PATH, json!({ "code": "GreenMachine" }));

        let result = ProductionLookup::new(&api).machine_info("GreenMachine").await;

        assert!(matches!(
            result,
            Err(ActionHandlerError::InvalidRecord { path: MACHINES_PATH, .. })
        ));
    }

    #[tokio::test]
    async fn test_order_prefers_current_order() {
        let api = MockOperationsApi::new();
        api.respond_get(CURRENT_ORDER_PATH, json!({ "product": 11 }));
        api.respond_get(LINES_PATH, json!({ "id": 3 }));
        api.respond_get(BUILD_SEQUENCE_PATH, json!({ "product": 22 }));

        let order = ProductionLookup::new(&api).order_for_line("Line-A").await.unwrap();

        assert_eq!(order.unwrap().product, RecordId::Number(11));
        // 次オーダーの検索は行わない
        assert_eq!(api.calls().len(), 1);
        assert_eq!(api.calls()[0].payload, json!({ "linecode": "Line-A" }));
    }

    #[tokio::test]
    async fn test_order_falls_back_to_next_order() {
        let api = MockOperationsApi::new();
        api.respond_get(LINES_PATH, json!({ "id": 3 }));
        api.respond_get(BUILD_SEQUENCE_PATH, json!({ "product": 22 }));

        let order = ProductionLookup::new(&api).order_for_line("Line-A").await.unwrap();

        assert_eq!(order.unwrap().product, RecordId::Number(22));

        let calls = api.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].path, LINES_PATH);
        assert_eq!(calls[1].payload, json!({ "code": "Line-A" }));

        let search = &calls[2];
        assert_eq!(search.path, BUILD_SEQUENCE_PATH);
        assert_eq!(
            search.payload,
            json!({
                "line": 3,
                "order_by": "-schedule_start_date",
                "status__gte": 2,
                "status__lte": 6
            })
        );
        assert_eq!(search.limit, 1);
    }

    #[tokio::test]
    async fn test_no_line_means_no_order() {
        let api = MockOperationsApi::new();

        let order = ProductionLookup::new(&api).order_for_line("Line-A").await.unwrap();

        assert_eq!(order, None);
        // 現在オーダー、ラインの2回のみ
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_product_info() {
        let api = MockOperationsApi::new();
        api.respond_get(PRODUCT_COMPONENTS_PATH, json!({ "id": 22, "code": "WIDGET-22" }));
        let order = Order {
            product: RecordId::Number(22),
        };

        let product = ProductionLookup::new(&api).product_info(&order).await.unwrap();

        assert_eq!(product.code, "WIDGET-22");
        assert_eq!(api.calls()[0].payload, json!({ "id": 22 }));
    }

    #[tokio::test]
    async fn test_api_error_propagates() {
        let api = MockOperationsApi::new();
        api.fail_get(
            CURRENT_ORDER_PATH,
            ApiClientError::NetworkError("connection reset".to_string()),
        );

        let result = ProductionLookup::new(&api).order_for_line("Line-A").await;

        assert!(matches!(result, Err(ActionHandlerError::Api(_))));
    }
}
