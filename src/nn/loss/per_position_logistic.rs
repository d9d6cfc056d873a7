use super::multi_label_logistic::is_positive;
use super::{LossError, TraitLoss, clamp_prob, sigmoid};
use crate::tensor::{BatchShape, Tensor};
use tracing::debug;

/// 逐位置（VOC风格）逻辑损失
///
/// 标签是`N × dim`的网格，每个(样本, 位置)对一个0/1标签；
/// 预测则按`(i * dim + j) * dim + j`寻址，即每个(样本, 位置)对应的`dim × dim`子块中只读写对角元素。
/// 每个对角元素的计算与多标签逻辑损失相同（sigmoid、截断、交叉熵），但：
/// - 梯度除以`N * dim`；
/// - 损失只除以`N`。
///
/// 两者归一化方式不一致，这里保持原样。
///
/// ## 输入
/// - prediction: (N * dim, dim, ...)，共`N * dim * dim`个元素
/// - label: (N, dim, 1, 1)
///
/// 反向时会先把整个梯度缓冲区清零，因此子块中的非对角元素恒为0。
#[derive(Debug, Clone)]
pub struct PerPositionLogisticLoss {
    num: usize,
    dim: usize,
}

impl PerPositionLogisticLoss {
    pub const NAME: &'static str = "PerPositionLogisticLoss";

    /// 预测的样本数须等于标签的`num * channels`
    pub fn new(prediction_shape: &[usize], label_shape: &[usize]) -> Result<Self, LossError> {
        let prediction = BatchShape::from_shape(prediction_shape)?;
        let label = BatchShape::from_shape(label_shape)?;
        if prediction.num != label.num * label.channels {
            return Err(LossError::BatchSizeMismatch {
                layer: Self::NAME,
                prediction: prediction.num,
                label: label.num * label.channels,
            });
        }
        if label.height != 1 || label.width != 1 {
            return Err(LossError::LabelShape {
                layer: Self::NAME,
                expected: "(num, dim, 1, 1)".to_string(),
                got: label.to_vec(),
            });
        }
        let (num, dim) = (label.num, label.channels);
        if prediction.count() != num * dim * dim {
            return Err(LossError::PredictionShape {
                layer: Self::NAME,
                expected: format!("共{}个元素（num * dim * dim）", num * dim * dim),
                got: prediction.to_vec(),
            });
        }
        Ok(Self { num, dim })
    }
}

impl TraitLoss for PerPositionLogisticLoss {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn backward(
        &mut self,
        prediction: &Tensor,
        label: &Tensor,
        grad: &mut Tensor,
        propagate_down: bool,
    ) -> f32 {
        let (num, dim) = (self.num, self.dim);
        debug_assert_eq!(prediction.size(), num * dim * dim);
        debug_assert_eq!(label.size(), num * dim);
        let data = prediction.as_slice();
        let labels = label.as_slice();

        let mut diff = if propagate_down {
            let diff = grad.as_slice_mut();
            diff.fill(0.);
            Some(diff)
        } else {
            None
        };

        let mut loss = 0.;
        for i in 0..num {
            for j in 0..dim {
                let k = (i * dim + j) * dim + j;
                let positive = is_positive(labels[i * dim + j]);
                let indicator = if positive { 1. } else { 0. };
                let prob = clamp_prob(sigmoid(data[k]));
                if let Some(diff) = diff.as_deref_mut() {
                    diff[k] = (prob - indicator) / num as f32 / dim as f32;
                }
                loss -= if positive {
                    prob.ln()
                } else {
                    clamp_prob(1. - prob).ln()
                };
            }
        }
        let loss = loss / num as f32;
        debug!(layer = Self::NAME, loss, "反向计算完成");
        loss
    }
}
