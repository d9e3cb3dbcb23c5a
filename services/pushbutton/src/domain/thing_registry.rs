/// ボタンのシリアル番号とLeading2Leanの設備コードの対応表
use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

/// 対応表の操作エラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ThingLookupError {
    /// 対応表に存在しないシリアル番号
    #[error("Unknown serial number: {0}")]
    UnknownSerialNumber(String),

    /// 対応表の定義文字列が不正
    #[error("Invalid button mapping entry: {0}")]
    InvalidEntry(String),
}

/// ボタンに紐づくデータ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThingData {
    /// Leading2Lean上の設備コード
    pub machine_code: String,
}

/// シリアル番号 -> 設備コードの静的な対応表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThingRegistry {
    machines: HashMap<String, String>,
}

impl ThingRegistry {
    /// (シリアル番号, 設備コード)の組から対応表を作成
    pub fn new<I, S, M>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, M)>,
        S: Into<String>,
        M: Into<String>,
    {
        Self {
            machines: entries
                .into_iter()
                .map(|(serial, machine)| (serial.into(), machine.into()))
                .collect(),
        }
    }

    /// `SERIAL=MachineCode,SERIAL=MachineCode`形式の文字列から対応表を作成
    ///
    /// 空の要素は無視する。`=`を含まない要素や、
    /// シリアル番号・設備コードのどちらかが空の要素はエラー。
    pub fn parse(definition: &str) -> Result<Self, ThingLookupError> {
        let mut machines = HashMap::new();

        for entry in definition.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (serial, machine) = entry
                .split_once('=')
                .map(|(s, m)| (s.trim(), m.trim()))
                .filter(|(s, m)| !s.is_empty() && !m.is_empty())
                .ok_or_else(|| ThingLookupError::InvalidEntry(entry.to_string()))?;

            machines.insert(serial.to_string(), machine.to_string());
        }

        Ok(Self { machines })
    }

    /// シリアル番号からボタンのデータを取得
    pub fn lookup(&self, serial_number: &str) -> Result<ThingData, ThingLookupError> {
        self.machines
            .get(serial_number)
            .map(|machine_code| ThingData {
                machine_code: machine_code.clone(),
            })
            .ok_or_else(|| ThingLookupError::UnknownSerialNumber(serial_number.to_string()))
    }

    /// 登録されているボタン数
    pub fn len(&self) -> usize {
        self.machines.len()
    }

    /// 対応表が空かどうか
    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }
}

impl Default for ThingRegistry {
    /// デモ用の4台のボタン
    fn default() -> Self {
        Self::new([
            ("BUTTON-01-SERIAL", "GreenMachine"),
            ("BUTTON-02-SERIAL", "BlueMachine"),
            ("BUTTON-03-SERIAL", "YellowMachine"),
            ("BUTTON-04-SERIAL", "OrangeMachine"),
        ])
    }
}
