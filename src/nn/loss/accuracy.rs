use super::{
    DumpPaths, LossError, Phase, TraitLoss, batch_pair, check_class_index_label, clamp_prob,
    class_index,
};
use crate::tensor::Tensor;
use tracing::{debug, trace};

/// 准确率/对数概率指标层
///
/// 并非可训练的损失：不产生梯度，仅对每个批次统计两项指标，以长度为2的输出给出：
/// 1. 准确率：argmax预测等于标签的样本比例（并列时取下标最小者）；
/// 2. 平均负对数概率：`-Σ_i ln(clamp(p[i, label_i])) / N`。
///
/// 评估阶段（`Phase::Eval`）下若配置了转储目标，还会把每个样本的预测行与标签追加写入两个文本文件，
/// 训练阶段从不写文件。
#[derive(Debug, Clone)]
pub struct Accuracy {
    num: usize,
    dim: usize,
    dump: Option<DumpPaths>,
    phase: Phase,
}

impl Accuracy {
    pub const NAME: &'static str = "Accuracy";

    pub fn new(
        prediction_shape: &[usize],
        label_shape: &[usize],
        dump: Option<DumpPaths>,
    ) -> Result<Self, LossError> {
        let (prediction, label) = batch_pair(Self::NAME, prediction_shape, label_shape)?;
        check_class_index_label(Self::NAME, &label)?;
        Ok(Self {
            num: prediction.num,
            dim: prediction.dim(),
            dump,
            phase: Phase::default(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn dump(&self) -> Option<&DumpPaths> {
        self.dump.as_ref()
    }
}

/// 下标最小的最大值位置：只有严格大于当前最大值才会替换
fn argmax(row: &[f32]) -> usize {
    let mut max_value = f32::MIN;
    let mut max_id = 0;
    for (j, &value) in row.iter().enumerate() {
        if value > max_value {
            max_value = value;
            max_id = j;
        }
    }
    max_id
}

impl TraitLoss for Accuracy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    /// 输出形状为`[1, 2, 1, 1]`：`[accuracy, mean_log_loss]`
    fn forward(&mut self, prediction: &Tensor, label: &Tensor) -> Result<Option<Tensor>, LossError> {
        debug_assert_eq!(prediction.size(), self.num * self.dim);
        debug_assert_eq!(label.size(), self.num);
        let (num, dim) = (self.num, self.dim);
        let data = prediction.as_slice();
        let labels = label.as_slice();

        let mut writer = match (&self.dump, self.phase) {
            (Some(dump), Phase::Eval) => Some(dump.open()?),
            _ => None,
        };

        let mut accuracy = 0.;
        let mut log_prob = 0.;
        for (row, &label) in data.chunks_exact(dim).zip(labels) {
            if let Some(writer) = writer.as_mut() {
                writer.write_row(row)?;
                writer.write_label(label)?;
            }
            let target = class_index(label);
            debug_assert!(target < dim, "类别索引{target}越界（dim={dim}）");
            if argmax(row) == target {
                accuracy += 1.;
            }
            log_prob -= clamp_prob(row[target]).ln();
        }

        if let Some(writer) = writer {
            writer.finish()?;
            debug!(layer = Self::NAME, num, "已追加写入调试转储");
        }

        let accuracy = accuracy / num as f32;
        let log_prob = log_prob / num as f32;
        trace!(layer = Self::NAME, accuracy, log_prob, "前向计算完成");
        Ok(Some(Tensor::new(&[accuracy, log_prob], &[1, 2, 1, 1])))
    }

    /// 指标层没有梯度：传播时将梯度清零，返回的损失恒为0
    fn backward(
        &mut self,
        _prediction: &Tensor,
        _label: &Tensor,
        grad: &mut Tensor,
        propagate_down: bool,
    ) -> f32 {
        if propagate_down {
            grad.fill(0.);
        }
        0.
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }
}
