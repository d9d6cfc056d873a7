use super::matrix::square_side;
use super::{LossError, TraitLoss, batch_pair, check_class_index_label, clamp_prob, class_index};
use crate::tensor::Tensor;
use tracing::trace;

/// 信息增益加权的逻辑（Information-Gain Logistic）损失
///
/// 多项逻辑损失的推广：真实类别为`t`的样本，每个类别`j`都以权重`H[t][j]`计入损失，
/// 从而对语义上相距较远的类别之间的误判施以更重的惩罚。`H`取单位矩阵时即退化为多项逻辑损失。
///
/// ## 公式
/// - 损失：`L = -Σ_i Σ_j H[t_i][j] * ln(clamp(p[i, j])) / N`
/// - 梯度：`∂L/∂p[i, j] = -H[t_i][j] / clamp(p[i, j]) / N`
///
/// 权重矩阵`H`在配置时加载一次，须为`dim × dim`的方阵（或形如`[1, 1, dim, dim]`）。
#[derive(Debug, Clone)]
pub struct InfogainLogisticLoss {
    num: usize,
    dim: usize,
    infogain: Tensor,
}

impl InfogainLogisticLoss {
    pub const NAME: &'static str = "InfogainLogisticLoss";

    pub fn new(
        prediction_shape: &[usize],
        label_shape: &[usize],
        infogain: Tensor,
    ) -> Result<Self, LossError> {
        let (prediction, label) = batch_pair(Self::NAME, prediction_shape, label_shape)?;
        check_class_index_label(Self::NAME, &label)?;
        let dim = prediction.dim();
        if square_side(&infogain) != Some(dim) {
            return Err(LossError::InfogainMatrixShape {
                expected_side: dim,
                got: infogain.shape().to_vec(),
            });
        }
        Ok(Self {
            num: prediction.num,
            dim,
            infogain,
        })
    }

    pub fn infogain(&self) -> &Tensor {
        &self.infogain
    }
}

impl TraitLoss for InfogainLogisticLoss {
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
        let infogain = self.infogain.as_slice();

        // 每个元素都会被写到，无需预先清零
        let mut diff = if propagate_down {
            Some(grad.as_slice_mut())
        } else {
            None
        };

        let mut loss = 0.;
        for i in 0..num {
            let target = class_index(labels[i]);
            debug_assert!(target < dim, "类别索引{target}越界（dim={dim}）");
            let weights = &infogain[target * dim..(target + 1) * dim];
            for (j, &weight) in weights.iter().enumerate() {
                let prob = clamp_prob(data[i * dim + j]);
                loss -= weight * prob.ln();
                if let Some(diff) = diff.as_deref_mut() {
                    diff[i * dim + j] = -weight / prob / num as f32;
                }
            }
        }
        let loss = loss / num as f32;
        trace!(layer = Self::NAME, loss, "反向计算完成");
        loss
    }
}
