/*
 * @Author       : 老董
 * @Date         : 2026-10-17
 * @Description  : 信息增益矩阵的加载
 */

use std::fs::File;
use std::path::Path;

use ndarray::ArrayD;
use ndarray_npy::read_npy;
use tracing::debug;

use super::LossError;
use crate::tensor::Tensor;

/// 按来源标识加载一个方阵。来源的格式与位置由实现决定
pub trait MatrixLoader {
    fn load_matrix(&self, source: &str) -> Result<Tensor, LossError>;
}

/// 从本地文件加载：`.npy`后缀按NumPy格式读取，其余按`Tensor::save`写出的bincode格式读取
#[derive(Debug, Clone, Copy, Default)]
pub struct FileMatrixLoader;

impl MatrixLoader for FileMatrixLoader {
    fn load_matrix(&self, source: &str) -> Result<Tensor, LossError> {
        let path = Path::new(source);
        let load_error = |reason: String| LossError::MatrixLoad {
            origin: source.to_string(),
            reason,
        };

        let matrix = if path.extension().is_some_and(|ext| ext == "npy") {
            let array: ArrayD<f32> = read_npy(path).map_err(|e| load_error(e.to_string()))?;
            Tensor::from(array)
        } else {
            let mut file = File::open(path).map_err(|e| load_error(e.to_string()))?;
            Tensor::load(&mut file).map_err(|e| load_error(e.to_string()))?
        };

        debug!(source, shape = ?matrix.shape(), "已加载信息增益矩阵");
        Ok(matrix)
    }
}

/// 方阵的边长：接受`[d, d]`，以及原始blob布局`[1, 1, d, d]`；其余形状返回None
pub(crate) fn square_side(matrix: &Tensor) -> Option<usize> {
    match *matrix.shape() {
        [h, w] | [1, 1, h, w] if h == w => Some(h),
        _ => None,
    }
}
