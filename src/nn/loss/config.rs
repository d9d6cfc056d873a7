use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::LossError;

/// 损失层的可序列化配置（按`type`字段区分），在配置时选定一种损失层
///
/// ```ignore
/// {"type": "InfogainLogistic", "source": "infogain.npy"}
/// {"type": "Accuracy", "data_dump": "pred.txt", "label_dump": "label.txt"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LossConfig {
    MultinomialLogistic,
    InfogainLogistic {
        /// 信息增益矩阵的来源，交由`MatrixLoader`解读
        source: String,
    },
    Euclidean,
    Accuracy {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data_dump: Option<PathBuf>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label_dump: Option<PathBuf>,
    },
    L2Hinge,
    MultiLabelLogistic,
    PerPositionLogistic,
}

impl LossConfig {
    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, LossError> {
        serde_json::to_string_pretty(self).map_err(|e| LossError::InvalidConfig(e.to_string()))
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, LossError> {
        serde_json::from_str(json).map_err(|e| LossError::InvalidConfig(e.to_string()))
    }
}
