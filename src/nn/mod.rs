/*
 * @Author       : 老董
 * @Date         : 2026-10-17
 * @Description  : 神经网络（neural network）中与损失相关的层
 */

pub mod loss;

pub use loss::{
    Accuracy, EuclideanLoss, InfogainLogisticLoss, L2HingeLoss, LOG_THRESHOLD, LossConfig,
    LossError, LossLayer, MultiLabelLogisticLoss, MultinomialLogisticLoss, Phase,
    PerPositionLogisticLoss, TraitLoss,
};

#[cfg(test)]
mod tests;
