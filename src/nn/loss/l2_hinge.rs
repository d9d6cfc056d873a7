use super::{LossError, TraitLoss, batch_pair, check_class_index_label, class_index};
use crate::tensor::Tensor;
use tracing::trace;

/// L2-margin铰链（Hinge）损失（多分类）
///
/// ## 前向
/// 将预测分数复制进margin缓冲区，把真实类别处取反，再逐元素做`max(0, 1 + x)`：
/// 真实类别被"压低"后，其余类别与它区分不足的部分都会留下正的margin。
///
/// ## 反向
/// 从margin缓冲区出发，重新对真实类别处取反，整体乘以`C / N`作为梯度，
/// 损失为缩放后各元素绝对值之和`/ N * C`。
///
/// 前向与反向各自独立地对真实类别做取反：前向作用于原始分数，反向作用于前向得到的margin。
#[derive(Debug, Clone)]
pub struct L2HingeLoss {
    num: usize,
    dim: usize,
    /// 前向写入、反向读取；仅属于本实例
    margin: Tensor,
    /// margin是否由本批次的前向算出，反向结束后复位
    has_margin: bool,
}

impl L2HingeLoss {
    pub const NAME: &'static str = "L2HingeLoss";
    /// margin缩放常数
    pub const C: f32 = 1.;

    pub fn new(prediction_shape: &[usize], label_shape: &[usize]) -> Result<Self, LossError> {
        let (prediction, label) = batch_pair(Self::NAME, prediction_shape, label_shape)?;
        check_class_index_label(Self::NAME, &label)?;
        Ok(Self {
            num: prediction.num,
            dim: prediction.dim(),
            margin: Tensor::zeros(prediction_shape),
            has_margin: false,
        })
    }

    /// 最近一次前向得到的margin
    pub fn margin(&self) -> &Tensor {
        &self.margin
    }

    fn compute_margin(&mut self, prediction: &Tensor, label: &Tensor) {
        debug_assert_eq!(prediction.size(), self.margin.size());
        debug_assert_eq!(label.size(), self.num);
        let dim = self.dim;
        let margin = self.margin.as_slice_mut();
        margin.copy_from_slice(prediction.as_slice());
        for (i, &label) in label.as_slice().iter().enumerate() {
            margin[i * dim + class_index(label)] *= -1.;
        }
        for value in margin.iter_mut() {
            *value = f32::max(0., 1. + *value);
        }
        self.has_margin = true;
    }
}

impl TraitLoss for L2HingeLoss {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn forward(&mut self, prediction: &Tensor, label: &Tensor) -> Result<Option<Tensor>, LossError> {
        self.compute_margin(prediction, label);
        Ok(None)
    }

    /// 若本批次未执行前向，会先由`prediction`就地计算margin
    fn backward(
        &mut self,
        prediction: &Tensor,
        label: &Tensor,
        grad: &mut Tensor,
        propagate_down: bool,
    ) -> f32 {
        if !self.has_margin {
            self.compute_margin(prediction, label);
        }
        let (num, dim) = (self.num, self.dim);
        let scale = Self::C / num as f32;

        // 缩放因子为正，且取反不改变绝对值，因此损失可直接由margin算出
        let loss = self.margin.abs_sum() * scale / num as f32 * Self::C;

        if propagate_down {
            let diff = grad.as_slice_mut();
            diff.copy_from_slice(self.margin.as_slice());
            for (i, &label) in label.as_slice().iter().enumerate() {
                diff[i * dim + class_index(label)] *= -1.;
            }
            grad.scale_mut(scale);
        }
        // margin只供紧随其后的一次反向使用，下一批次须重新由前向（或反向自身）计算
        self.has_margin = false;
        trace!(layer = Self::NAME, loss, "反向计算完成");
        loss
    }
}
