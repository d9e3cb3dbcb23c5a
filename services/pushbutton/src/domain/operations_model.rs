/// Leading2Lean APIのリソースモデルとリクエストパラメータ
///
/// 読み取り系のモデルは処理に必要なフィールドだけを持ち、
/// それ以外のフィールドは無視する。
use std::fmt;

use serde::{Deserialize, Serialize};

/// APIのレコードID
///
/// 数値と文字列のどちらでも返ってくるため両方を受け付ける。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// 設備（machines/）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MachineInfo {
    /// 設備が属するラインのコード
    pub linecode: String,
}

/// ライン（lines/）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LineInfo {
    pub id: RecordId,
}

/// 製造オーダー（buildsequence/）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Order {
    /// 製品ID
    pub product: RecordId,
}

/// 製品（productcomponents/）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Product {
    pub code: String,
}

/// 設備の検索条件（machines/）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineQuery {
    pub code: String,
}

/// ラインで実行中のオーダーの検索条件（buildsequence/get_current_order_on_line/）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentOrderQuery {
    pub linecode: String,
}

/// ラインの検索条件（lines/）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineQuery {
    pub code: String,
}

/// 次オーダーの検索条件（buildsequence/）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextOrderQuery {
    pub line: RecordId,
    pub order_by: String,
    #[serde(rename = "status__gte")]
    pub status_gte: u8,
    #[serde(rename = "status__lte")]
    pub status_lte: u8,
}

/// 製品の検索条件（productcomponents/）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductQuery {
    pub id: RecordId,
}

/// ライン実績の記録（pitchdetails/record_details/）
///
/// `actual`と`scrap`はどちらか一方だけを送る。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PitchDetailRecord {
    pub linecode: String,
    pub start: String,
    pub end: String,
    pub productcode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrap: Option<u32>,
}

/// ディスパッチの発行（dispatches/open/）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchRequest {
    pub dispatchtypecode: String,
    pub description: String,
    pub machinecode: String,
    pub tradecode: String,
    pub user: String,
}

/// 設備サイクルカウントの加算（machines/increment_cycle_count/）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleCountIncrement {
    pub code: String,
    pub cyclecount: u32,
    /// 1の場合、設備の最終更新日時を更新しない
    pub skip_lastupdated: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id_accepts_number_and_string() {
        let order: Order = serde_json::from_value(json!({ "product": 17 })).unwrap();
        assert_eq!(order.product, RecordId::Number(17));
        assert_eq!(order.product.to_string(), "17");

        let order: Order = serde_json::from_value(json!({ "product": "P-17" })).unwrap();
        assert_eq!(order.product, RecordId::Text("P-17".to_string()));
        assert_eq!(order.product.to_string(), "P-17");
    }

    #[test]
    fn test_machine_info_ignores_extra_fields() {
        let machine: MachineInfo = serde_json::from_value(json!({
            "id": 3,
            "code": "GreenMachine",
            "linecode": "Line-A",
            "active": true
        }))
        .unwrap();
        assert_eq!(machine.linecode, "Line-A");
    }

    #[test]
    fn test_pitch_detail_record_with_actual() {
        let record = PitchDetailRecord {
            linecode: "Line-A".to_string(),
            start: "2026-10-19 08:00:00".to_string(),
            end: "2026-10-19 08:00:00".to_string(),
            productcode: "WIDGET".to_string(),
            actual: Some(1),
            scrap: None,
        };

        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(
            json,
            json!({
                "linecode": "Line-A",
                "start": "2026-10-19 08:00:00",
                "end": "2026-10-19 08:00:00",
                "productcode": "WIDGET",
                "actual": 1
            })
        );
    }

    #[test]
    fn test_pitch_detail_record_with_scrap_omits_actual() {
        let record = PitchDetailRecord {
            linecode: "Line-A".to_string(),
            start: "2026-10-19 08:00:00".to_string(),
            end: "2026-10-19 08:00:00".to_string(),
            productcode: "WIDGET".to_string(),
            actual: None,
            scrap: Some(1),
        };

        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["scrap"], 1);
        assert!(json.get("actual").is_none());
    }

    #[test]
    fn test_next_order_query_field_names() {
        let query = NextOrderQuery {
            line: RecordId::Number(3),
            order_by: "-schedule_start_date".to_string(),
            status_gte: 2,
            status_lte: 6,
        };

        let json = serde_json::to_value(&query).unwrap();

        assert_eq!(
            json,
            json!({
                "line": 3,
                "order_by": "-schedule_start_date",
                "status__gte": 2,
                "status__lte": 6
            })
        );
    }

    #[test]
    fn test_cycle_count_payload() {
        let json = serde_json::to_value(CycleCountIncrement {
            code: "GreenMachine".to_string(),
            cyclecount: 1,
            skip_lastupdated: 1,
        })
        .unwrap();

        assert_eq!(
            json,
            json!({ "code": "GreenMachine", "cyclecount": 1, "skip_lastupdated": 1 })
        );
    }
}
