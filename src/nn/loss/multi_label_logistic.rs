use super::{LossError, TraitLoss, batch_pair, clamp_prob, sigmoid};
use crate::tensor::Tensor;
use tracing::trace;

/// 多标签逻辑（Multi-Label Logistic）损失
///
/// 每个样本的每个类别都有独立的0/1指示标签（而非单个类别索引）。逐元素：
/// - `prob = clamp(sigmoid(score))`
/// - 梯度：`(prob - indicator) / N`
/// - 损失：indicator为1时`-ln(clamp(prob))`，否则`-ln(clamp(1 - prob))`，合计后`/ N`
///
/// NOTE: 只除以`N`而非`N * dim`，因此损失会随每个样本的类别数增长，这与多项逻辑损失不同。
///
/// ## 输入
/// - prediction: (N, dim) 原始分数（logit）
/// - label: (N, dim, 1, 1) 指示标签，仅值为1视作正类
#[derive(Debug, Clone)]
pub struct MultiLabelLogisticLoss {
    num: usize,
    dim: usize,
}

impl MultiLabelLogisticLoss {
    pub const NAME: &'static str = "MultiLabelLogisticLoss";

    pub fn new(prediction_shape: &[usize], label_shape: &[usize]) -> Result<Self, LossError> {
        let (prediction, label) = batch_pair(Self::NAME, prediction_shape, label_shape)?;
        let dim = prediction.dim();
        if label.height != 1 || label.width != 1 || label.channels != dim {
            return Err(LossError::LabelShape {
                layer: Self::NAME,
                expected: format!("(num, {dim}, 1, 1)"),
                got: label.to_vec(),
            });
        }
        Ok(Self {
            num: prediction.num,
            dim,
        })
    }
}

/// 标签值为1才视作正类
#[inline]
pub(crate) fn is_positive(label: f32) -> bool {
    label as i64 == 1
}

impl TraitLoss for MultiLabelLogisticLoss {
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
        debug_assert_eq!(prediction.size(), self.num * self.dim);
        debug_assert_eq!(label.size(), self.num * self.dim);
        let num = self.num as f32;
        let data = prediction.as_slice();
        let labels = label.as_slice();

        let mut diff = if propagate_down {
            Some(grad.as_slice_mut())
        } else {
            None
        };

        let mut loss = 0.;
        for (k, (&score, &label)) in data.iter().zip(labels).enumerate() {
            let positive = is_positive(label);
            let indicator = if positive { 1. } else { 0. };
            let prob = clamp_prob(sigmoid(score));
            if let Some(diff) = diff.as_deref_mut() {
                diff[k] = (prob - indicator) / num;
            }
            loss -= if positive {
                clamp_prob(prob).ln()
            } else {
                clamp_prob(1. - prob).ln()
            };
        }
        let loss = loss / num;
        trace!(layer = Self::NAME, loss, "反向计算完成");
        loss
    }
}
