use ndarray::{Array, ArrayD, IxDyn};
use rand::distributions::{Distribution, Uniform};

use crate::errors::{ComparisonOperator, TensorError};

mod ops {
    pub mod others;
}

mod index;
mod property;
mod save_load;
mod shape;

pub use shape::BatchShape;


/// 定义张量的结构体。损失层中的预测、标签、梯度缓冲区均以张量表示。
/// 注：张量内部数据始终为连续的行优先（row-major）内存布局，
/// 因此可以安全地以扁平切片（`as_slice`/`as_slice_mut`）访问，
/// 扁平索引即`i * dim + j`（`dim`为每个样本的元素数）。
#[derive(Debug, Clone)]
pub struct Tensor {
    data: Array<f32, IxDyn>,
}

impl Tensor {
    /// 创建一个张量，若为标量，`shape`可以是[]、[1]、[1,1]、[1,1,1]...
    /// 若为批次数据，`shape`通常为[num, channels, height, width]，后三维可省略（视为1）；
    /// 注：除了`data`长度为1且shape为`[]`的情况（标量），`data`的长度必须和`shape`中所有元素的乘积相等，否则panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Tensor {
        Self::try_new(data, shape).unwrap_or_else(|e| panic!("{}", e))
    }

    /// 同`new`，但形状与数据长度不符时返回错误而非panic
    pub fn try_new(data: &[f32], shape: &[usize]) -> Result<Tensor, TensorError> {
        let data = Array::from_shape_vec(IxDyn(shape), data.to_vec()).map_err(|_| {
            TensorError::ShapeDataMismatch {
                shape: shape.to_vec(),
                len: data.len(),
            }
        })?;
        Ok(Tensor { data })
    }

    /// 创建一个元素全为0的张量
    pub fn zeros(shape: &[usize]) -> Tensor {
        Tensor {
            data: Array::zeros(IxDyn(shape)),
        }
    }

    /// 创建一个随机张量，其值在[min, max]的闭区间
    pub fn new_random(min: f32, max: f32, shape: &[usize]) -> Tensor {
        let mut rng = rand::thread_rng();
        let data = (0..shape.iter().product::<usize>())
            .map(|_| Uniform::from(min..=max).sample(&mut rng))
            .collect::<Vec<_>>();
        Tensor::new(&data, shape)
    }

    /// 创建一个含`n`个对角元素的单位矩阵，形状为`[n, n]`。
    /// n必须大于等于1，否则会panic。
    pub fn new_eye(n: usize) -> Tensor {
        assert!(
            n >= 1,
            "{}",
            TensorError::ValueMustSatisfyComparison {
                value_name: "n".to_string(),
                operator: ComparisonOperator::GreaterOrEqual,
                threshold: 1,
            }
        );
        Tensor {
            data: Array::eye(n).into_dyn(),
        }
    }
}

impl From<ArrayD<f32>> for Tensor {
    /// 任意内存布局（如Fortran序的npy文件）的数组都会被整理为行优先的连续布局
    fn from(array: ArrayD<f32>) -> Self {
        let data = if array.is_standard_layout() {
            array
        } else {
            array.as_standard_layout().into_owned()
        };
        Tensor { data }
    }
}
