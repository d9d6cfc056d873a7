use super::{LossError, TraitLoss, batch_pair, check_class_index_label, clamp_prob, class_index};
use crate::tensor::Tensor;
use tracing::trace;

/// 多项逻辑（Multinomial-Logistic）损失
///
/// 每个样本给出`dim`个类别上的概率分布，标签为单个类别索引。
///
/// ## 公式
/// - 损失：`L = -Σ_i ln(clamp(p[i, label_i])) / N`
/// - 梯度：仅真实类别处非零，为`-1 / (N * clamp(p[i, label_i]))`，其余元素为0
///
/// ## 输入
/// - prediction: (N, dim) 概率
/// - label: (N, 1, 1, 1) 类别索引
#[derive(Debug, Clone)]
pub struct MultinomialLogisticLoss {
    num: usize,
    dim: usize,
}

impl MultinomialLogisticLoss {
    pub const NAME: &'static str = "MultinomialLogisticLoss";

    pub fn new(prediction_shape: &[usize], label_shape: &[usize]) -> Result<Self, LossError> {
        let (prediction, label) = batch_pair(Self::NAME, prediction_shape, label_shape)?;
        check_class_index_label(Self::NAME, &label)?;
        Ok(Self {
            num: prediction.num,
            dim: prediction.dim(),
        })
    }
}

impl TraitLoss for MultinomialLogisticLoss {
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
        debug_assert_eq!(label.size(), self.num);
        let (num, dim) = (self.num, self.dim);
        let data = prediction.as_slice();
        let labels = label.as_slice();

        let mut diff = if propagate_down {
            Some(grad.as_slice_mut())
        } else {
            None
        };
        if let Some(diff) = diff.as_deref_mut() {
            diff.fill(0.);
        }

        let mut loss = 0.;
        for i in 0..num {
            let target = class_index(labels[i]);
            debug_assert!(target < dim, "类别索引{target}越界（dim={dim}）");
            let prob = clamp_prob(data[i * dim + target]);
            loss -= prob.ln();
            if let Some(diff) = diff.as_deref_mut() {
                diff[i * dim + target] = -1. / prob / num as f32;
            }
        }
        let loss = loss / num as f32;
        trace!(layer = Self::NAME, loss, "反向计算完成");
        loss
    }
}
