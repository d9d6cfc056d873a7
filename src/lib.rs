//! # Only Loss
//!
//! `only_loss`用纯rust实现神经网络训练中的一族损失层（loss layer）：
//! 每个损失层读入一个批次的预测与真实标签，给出汇总批次误差的标量损失，
//! 并写出逐元素的梯度以驱动反向传播。
//!
//! ```ignore
//! let mut layer = LossLayer::configure(&[2, 3], &[2, 1], &LossConfig::MultinomialLogistic)?;
//! let mut grad = Tensor::zeros(&[2, 3]);
//! let loss = layer.backward(&prediction, &label, &mut grad, true);
//! ```

pub mod errors;
pub mod nn;
pub mod tensor;
