use std::fmt::{self, Display};

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    // 数字比较用
    #[error("{value_name}须{operator}{threshold}")]
    ValueMustSatisfyComparison {
        value_name: String,
        operator: ComparisonOperator,
        threshold: usize,
    },
    #[error("数据长度{len}与形状{shape:?}的元素数不一致")]
    ShapeDataMismatch { shape: Vec<usize>, len: usize },
    #[error("批次张量须为1~4阶（num, channels, height, width），实际形状为{0:?}")]
    BatchRank(Vec<usize>),
    #[error("批次张量各维度须大于0")]
    EmptyBatch,

    #[error("张量读写失败：{0}")]
    Io(String),
    #[error("张量（反）序列化失败：{0}")]
    Serialization(String),
}

/// 比较运算符，用于拼接错误信息
#[derive(Debug, PartialEq, Eq)]
pub enum ComparisonOperator {
    GreaterOrEqual,
}
impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator_name = match self {
            ComparisonOperator::GreaterOrEqual => "≥",
        };
        write!(f, "{}", operator_name)
    }
}
