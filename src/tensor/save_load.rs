use std::fs::File;
use std::io::{Read, Write};

use super::Tensor;
use crate::errors::TensorError;

// 保存和加载张量
impl Tensor {
    /// 将单个Tensor写入本地文件
    pub fn save(&self, file: &mut File) -> Result<(), TensorError> {
        let serialized_data = bincode::serialize(&self.data)
            .map_err(|e| TensorError::Serialization(e.to_string()))?;
        file.write_all(&serialized_data)
            .map_err(|e| TensorError::Io(e.to_string()))
    }

    /// 从本地文件加载单个Tensor
    pub fn load(file: &mut File) -> Result<Self, TensorError> {
        let mut serialized_data = Vec::new();
        file.read_to_end(&mut serialized_data)
            .map_err(|e| TensorError::Io(e.to_string()))?;
        let data: ndarray::ArrayD<f32> = bincode::deserialize(&serialized_data)
            .map_err(|e| TensorError::Serialization(e.to_string()))?;
        Ok(Self::from(data))
    }
}
