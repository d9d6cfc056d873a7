use thiserror::Error;

use crate::errors::TensorError;

/// 损失层配置阶段的错误类型。
/// 这些错误均意味着编程或配置有误，调用方应当中止搭建，而非重试。
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LossError {
    #[error("{layer}：预测与标签的样本数（num）须一致，预测为{prediction}，标签为{label}")]
    BatchSizeMismatch {
        layer: &'static str,
        prediction: usize,
        label: usize,
    },
    #[error("{layer}：标签形状须满足{expected}，实际形状为{got:?}")]
    LabelShape {
        layer: &'static str,
        expected: String,
        got: Vec<usize>,
    },
    #[error("{layer}：预测形状须满足{expected}，实际形状为{got:?}")]
    PredictionShape {
        layer: &'static str,
        expected: String,
        got: Vec<usize>,
    },
    #[error("信息增益矩阵须为边长{expected_side}的方阵，实际形状为{got:?}")]
    InfogainMatrixShape { expected_side: usize, got: Vec<usize> },
    #[error("无法从`{origin}`加载信息增益矩阵：{reason}")]
    MatrixLoad { origin: String, reason: String },
    #[error("数据转储与标签转储文件须同时指定或同时不指定")]
    DumpSinkPair,
    #[error("写入调试转储失败：{0}")]
    Dump(String),
    #[error("损失层配置无效：{0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Tensor(#[from] TensorError),
}

/// 仅在写入调试转储时会发生I/O错误
impl From<std::io::Error> for LossError {
    fn from(e: std::io::Error) -> Self {
        LossError::Dump(e.to_string())
    }
}
