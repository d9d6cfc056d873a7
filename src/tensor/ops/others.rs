use crate::tensor::Tensor;
use ndarray::Zip;
use std::cmp::PartialEq;

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Tensor {
    /// 对张量中所有元素的绝对值求和（即asum）
    pub fn abs_sum(&self) -> f32 {
        let mut value = 0.0;
        Zip::from(&self.data).for_each(|a| value += a.abs());
        value
    }

    /// 按行优先顺序逐元素相乘再求和。两个张量的元素数须一致（形状可不同，如[n, c]与[n, c, 1, 1]）
    pub fn dot_sum(&self, other: &Tensor) -> f32 {
        assert!(
            self.size() == other.size(),
            "元素数不一致，故无法进行点积和：第一个张量的形状为{:?}，第二个张量的形状为{:?}",
            self.shape(),
            other.shape()
        );
        self.as_slice()
            .iter()
            .zip(other.as_slice())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// 原地将所有元素乘以`alpha`
    pub fn scale_mut(&mut self, alpha: f32) {
        self.data.mapv_inplace(|x| x * alpha);
    }
}
