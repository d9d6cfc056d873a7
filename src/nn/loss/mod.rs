/*
 * @Author       : 老董
 * @Date         : 2026-10-17
 * @Description  : 损失层（loss layer）：读入一个批次的预测与标签，
 *                 输出标量损失，并将逐元素梯度写入调用方提供的梯度缓冲区
 */

mod accuracy;
mod config;
mod dump;
mod error;
mod euclidean;
mod infogain_logistic;
mod l2_hinge;
mod matrix;
mod multi_label_logistic;
mod multinomial_logistic;
mod per_position_logistic;

pub use accuracy::Accuracy;
pub use config::LossConfig;
pub use dump::{DUMP_THRESHOLD, DumpPaths};
pub use error::LossError;
pub use euclidean::EuclideanLoss;
pub use infogain_logistic::InfogainLogisticLoss;
pub use l2_hinge::L2HingeLoss;
pub use matrix::{FileMatrixLoader, MatrixLoader};
pub use multi_label_logistic::MultiLabelLogisticLoss;
pub use multinomial_logistic::MultinomialLogisticLoss;
pub use per_position_logistic::PerPositionLogisticLoss;

use crate::tensor::{BatchShape, Tensor};
use enum_dispatch::enum_dispatch;
use tracing::debug;

/// 对数的数值稳定下限：所有进入`ln`（或作为分母）的概率都先截断到不低于该值
pub const LOG_THRESHOLD: f32 = 1e-20;

/// 稳定性截断：`max(prob, LOG_THRESHOLD)`
#[inline]
pub fn clamp_prob(prob: f32) -> f32 {
    prob.max(LOG_THRESHOLD)
}

#[inline]
pub(crate) fn sigmoid(x: f32) -> f32 {
    1. / (1. + (-x).exp())
}

/// 执行阶段。训练阶段为默认值；仅评估阶段下准确率层才会写调试转储
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Train,
    Eval,
}

#[enum_dispatch]
#[derive(Debug, Clone)]
pub enum LossLayer {
    MultinomialLogistic(MultinomialLogisticLoss),
    InfogainLogistic(InfogainLogisticLoss),
    Euclidean(EuclideanLoss),
    Accuracy(Accuracy),
    L2Hinge(L2HingeLoss),
    MultiLabelLogistic(MultiLabelLogisticLoss),
    PerPositionLogistic(PerPositionLogisticLoss),
}

/// 所有损失层共同遵守的约定：先（在构造时）校验并配置一次，之后每个批次反复计算。
/// 同一实例不可被并发调用（内部暂存缓冲区会被原地改写），不同实例之间互不影响。
#[enum_dispatch(LossLayer)]
pub trait TraitLoss {
    fn name(&self) -> &'static str;

    /// 前向：仅需要输出张量（准确率层）或需要预先变换输入（铰链损失的margin）的层才有实际动作
    fn forward(&mut self, _prediction: &Tensor, _label: &Tensor) -> Result<Option<Tensor>, LossError> {
        Ok(None)
    }

    /// 反向：一次遍历同时算出批次标量损失与逐元素梯度。
    /// `propagate_down`为true时`grad`（与预测同形）会被完整覆写（而非累加）；为false时只返回损失，不触碰`grad`
    fn backward(
        &mut self,
        prediction: &Tensor,
        label: &Tensor,
        grad: &mut Tensor,
        propagate_down: bool,
    ) -> f32;

    /// 切换执行阶段，默认忽略
    fn set_phase(&mut self, _phase: Phase) {}
}

impl LossLayer {
    /// 按配置选定一种损失层并完成校验，信息增益矩阵从文件加载（见`FileMatrixLoader`）
    pub fn configure(
        prediction_shape: &[usize],
        label_shape: &[usize],
        config: &LossConfig,
    ) -> Result<Self, LossError> {
        Self::configure_with_loader(prediction_shape, label_shape, config, &FileMatrixLoader)
    }

    /// 同`configure`，但信息增益矩阵由调用方提供的`loader`加载
    pub fn configure_with_loader(
        prediction_shape: &[usize],
        label_shape: &[usize],
        config: &LossConfig,
        loader: &dyn MatrixLoader,
    ) -> Result<Self, LossError> {
        let layer: LossLayer = match config {
            LossConfig::MultinomialLogistic => {
                MultinomialLogisticLoss::new(prediction_shape, label_shape)?.into()
            }
            LossConfig::InfogainLogistic { source } => {
                let infogain = loader.load_matrix(source)?;
                InfogainLogisticLoss::new(prediction_shape, label_shape, infogain)?.into()
            }
            LossConfig::Euclidean => EuclideanLoss::new(prediction_shape, label_shape)?.into(),
            LossConfig::Accuracy {
                data_dump,
                label_dump,
            } => {
                let dump = DumpPaths::from_pair(data_dump.clone(), label_dump.clone())?;
                Accuracy::new(prediction_shape, label_shape, dump)?.into()
            }
            LossConfig::L2Hinge => L2HingeLoss::new(prediction_shape, label_shape)?.into(),
            LossConfig::MultiLabelLogistic => {
                MultiLabelLogisticLoss::new(prediction_shape, label_shape)?.into()
            }
            LossConfig::PerPositionLogistic => {
                PerPositionLogisticLoss::new(prediction_shape, label_shape)?.into()
            }
        };
        debug!(
            layer = layer.name(),
            ?prediction_shape,
            ?label_shape,
            "损失层配置完成"
        );
        Ok(layer)
    }

    pub fn set_train_mode(&mut self) {
        self.set_phase(Phase::Train);
    }

    pub fn set_eval_mode(&mut self) {
        self.set_phase(Phase::Eval);
    }
}

// ========== 配置阶段共用的形状校验 ==========

/// 解析预测与标签的批次形状，并校验二者样本数一致
pub(crate) fn batch_pair(
    layer: &'static str,
    prediction_shape: &[usize],
    label_shape: &[usize],
) -> Result<(BatchShape, BatchShape), LossError> {
    let prediction = BatchShape::from_shape(prediction_shape)?;
    let label = BatchShape::from_shape(label_shape)?;
    if prediction.num != label.num {
        return Err(LossError::BatchSizeMismatch {
            layer,
            prediction: prediction.num,
            label: label.num,
        });
    }
    Ok((prediction, label))
}

/// 每个样本只含一个类别索引的标签：形状须为(num, 1, 1, 1)
pub(crate) fn check_class_index_label(
    layer: &'static str,
    label: &BatchShape,
) -> Result<(), LossError> {
    if !label.is_trivial_per_sample() {
        return Err(LossError::LabelShape {
            layer,
            expected: "(num, 1, 1, 1)".to_string(),
            got: label.to_vec(),
        });
    }
    Ok(())
}

/// 将类别索引标签转为下标
#[inline]
pub(crate) fn class_index(label: f32) -> usize {
    label as usize
}
