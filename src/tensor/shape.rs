use crate::errors::TensorError;

/// 批次张量的4维逻辑形状：(num, channels, height, width)。
/// 形状不足4维时，缺省的尾部维度视为1，如`[n, c]`等价于`[n, c, 1, 1]`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchShape {
    pub num: usize,
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl BatchShape {
    pub fn new(num: usize, channels: usize, height: usize, width: usize) -> Self {
        Self {
            num,
            channels,
            height,
            width,
        }
    }

    /// 从任意1~4阶的形状解析出批次形状；各维度须大于0
    pub fn from_shape(shape: &[usize]) -> Result<Self, TensorError> {
        if shape.is_empty() || shape.len() > 4 {
            return Err(TensorError::BatchRank(shape.to_vec()));
        }
        let axis = |i: usize| shape.get(i).copied().unwrap_or(1);
        let batch = Self::new(axis(0), axis(1), axis(2), axis(3));
        if batch.count() == 0 {
            return Err(TensorError::EmptyBatch);
        }
        Ok(batch)
    }

    /// 全部元素数
    pub const fn count(&self) -> usize {
        self.num * self.channels * self.height * self.width
    }

    /// 每个样本的元素数，即`count / num`
    pub const fn dim(&self) -> usize {
        self.channels * self.height * self.width
    }

    /// 非批次维度是否均为1（即每个样本只有一个数值，如类别索引标签）
    pub const fn is_trivial_per_sample(&self) -> bool {
        self.channels == 1 && self.height == 1 && self.width == 1
    }

    pub fn to_vec(&self) -> Vec<usize> {
        vec![self.num, self.channels, self.height, self.width]
    }
}
