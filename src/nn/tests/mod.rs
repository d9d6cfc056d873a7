mod loss_multinomial_logistic;
mod loss_per_position_logistic;

use crate::nn::{LossLayer, TraitLoss};
use crate::tensor::Tensor;

/// 对同一输入连续调用两次`backward`，返回两次的(损失, 梯度)
fn backward_twice(
    layer: &mut LossLayer,
    prediction: &Tensor,
    label: &Tensor,
) -> ((f32, Tensor), (f32, Tensor)) {
    let mut grad = Tensor::zeros(prediction.shape());
    let first_loss = layer.backward(prediction, label, &mut grad, true);
    let first_grad = grad.clone();
    let second_loss = layer.backward(prediction, label, &mut grad, true);
    ((first_loss, first_grad), (second_loss, grad))
}
