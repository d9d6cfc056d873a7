use super::{LossError, TraitLoss, batch_pair};
use crate::tensor::Tensor;
use tracing::trace;

/// 欧氏（L2回归）损失
///
/// ## 公式
/// - 损失：`L = Σ (prediction - label)^2 / (2N)`
/// - 梯度：`∂L/∂prediction = (prediction - label) / N`
///
/// ## 输入
/// - prediction: (N, C, H, W)
/// - label: 与prediction的(N, C, H, W)逐维一致
#[derive(Debug, Clone)]
pub struct EuclideanLoss {
    num: usize,
    /// 差值暂存区，配置时按预测形状分配一次，每个批次原地覆写
    difference: Tensor,
}

impl EuclideanLoss {
    pub const NAME: &'static str = "EuclideanLoss";

    pub fn new(prediction_shape: &[usize], label_shape: &[usize]) -> Result<Self, LossError> {
        let (prediction, label) = batch_pair(Self::NAME, prediction_shape, label_shape)?;
        if prediction != label {
            return Err(LossError::LabelShape {
                layer: Self::NAME,
                expected: format!("与预测一致的{:?}", prediction.to_vec()),
                got: label.to_vec(),
            });
        }
        Ok(Self {
            num: prediction.num,
            difference: Tensor::zeros(prediction_shape),
        })
    }

    /// 最近一次反向计算得到的`prediction - label`
    pub fn difference(&self) -> &Tensor {
        &self.difference
    }
}

impl TraitLoss for EuclideanLoss {
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
        debug_assert_eq!(prediction.size(), self.difference.size());
        debug_assert_eq!(label.size(), self.difference.size());
        let num = self.num as f32;

        for ((d, &p), &l) in self
            .difference
            .as_slice_mut()
            .iter_mut()
            .zip(prediction.as_slice())
            .zip(label.as_slice())
        {
            *d = p - l;
        }
        let loss = self.difference.dot_sum(&self.difference) / num / 2.;

        if propagate_down {
            for (g, &d) in grad.as_slice_mut().iter_mut().zip(self.difference.as_slice()) {
                *g = d / num;
            }
        }
        trace!(layer = Self::NAME, loss, "反向计算完成");
        loss
    }
}
