/*
 * @Author       : 老董
 * @Date         : 2026-10-17
 * @Description  : PerPositionLogisticLoss 单元测试
 */

use super::backward_twice;
use crate::nn::{LossError, LossLayer, PerPositionLogisticLoss, TraitLoss};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_per_position_shape_check() {
    // N=1, dim=2：预测共 1*2*2 个元素，样本数 N*dim
    assert!(PerPositionLogisticLoss::new(&[2, 2], &[1, 2]).is_ok());
    assert!(PerPositionLogisticLoss::new(&[6, 3, 1, 1], &[2, 3, 1, 1]).is_ok());
    assert!(matches!(
        PerPositionLogisticLoss::new(&[3, 2], &[1, 2]),
        Err(LossError::BatchSizeMismatch { .. })
    ));
    assert!(matches!(
        PerPositionLogisticLoss::new(&[2, 3], &[1, 2]),
        Err(LossError::PredictionShape { .. })
    ));
    assert!(matches!(
        PerPositionLogisticLoss::new(&[2, 2], &[1, 2, 2]),
        Err(LossError::LabelShape { .. })
    ));
}

#[test]
fn test_per_position_touches_only_diagonal() {
    let mut layer = PerPositionLogisticLoss::new(&[2, 2], &[1, 2]).unwrap();
    // 非对角元素的值不应影响结果
    let prediction = Tensor::new(&[0., 9., 9., 0.], &[2, 2]);
    let label = Tensor::new(&[1., 0.], &[1, 2]);
    let mut grad = Tensor::new(&[3.; 4], &[2, 2]);

    let loss = layer.backward(&prediction, &label, &mut grad, true);

    // 损失只除以 N
    assert_abs_diff_eq!(loss, 2. * std::f32::consts::LN_2, epsilon = 1e-5);
    // 梯度除以 N * dim
    assert_eq!(grad, Tensor::new(&[-0.25, 0., 0., 0.25], &[2, 2]));
}

#[test]
fn test_per_position_batch_normalization() {
    let mut layer = PerPositionLogisticLoss::new(&[4, 2], &[2, 2]).unwrap();
    let prediction = Tensor::zeros(&[4, 2]);
    let label = Tensor::new(&[1., 0., 0., 1.], &[2, 2]);
    let mut grad = Tensor::zeros(&[4, 2]);

    let loss = layer.backward(&prediction, &label, &mut grad, true);

    // 4 个对角元素，每个 -ln0.5，合计后除以 N=2
    assert_abs_diff_eq!(loss, 2. * std::f32::consts::LN_2, epsilon = 1e-5);
    // 对角下标：(i*dim + j)*dim + j -> 0, 3, 4, 7
    let expected = [-0.125, 0., 0., 0.125, 0.125, 0., 0., -0.125];
    for (g, e) in grad.as_slice().iter().zip(expected) {
        assert_abs_diff_eq!(*g, e, epsilon = 1e-7);
    }
}

#[test]
fn test_per_position_no_propagate_keeps_grad() {
    let mut layer = PerPositionLogisticLoss::new(&[2, 2], &[1, 2]).unwrap();
    let prediction = Tensor::zeros(&[2, 2]);
    let label = Tensor::new(&[1., 0.], &[1, 2]);
    let mut grad = Tensor::new(&[3.; 4], &[2, 2]);

    layer.backward(&prediction, &label, &mut grad, false);

    assert_eq!(grad, Tensor::new(&[3.; 4], &[2, 2]));
}

#[test]
fn test_per_position_backward_is_idempotent() {
    let mut layer: LossLayer = PerPositionLogisticLoss::new(&[6, 3], &[2, 3]).unwrap().into();
    let prediction = Tensor::new_random(-2., 2., &[6, 3]);
    let label = Tensor::new(&[1., 0., 1., 0., 0., 1.], &[2, 3]);

    let ((loss1, grad1), (loss2, grad2)) = backward_twice(&mut layer, &prediction, &label);
    assert_eq!(loss1.to_bits(), loss2.to_bits());
    assert_eq!(grad1, grad2);
}
