/*
 * @Author       : 老董
 * @Date         : 2026-10-17
 * @Description  : MultinomialLogisticLoss 单元测试
 */

use super::backward_twice;
use crate::nn::{LOG_THRESHOLD, LossError, LossLayer, MultinomialLogisticLoss, TraitLoss};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

// ========== 配置 ==========

#[test]
fn test_multinomial_logistic_creation() {
    assert!(MultinomialLogisticLoss::new(&[2, 3], &[2, 1]).is_ok());
    assert!(MultinomialLogisticLoss::new(&[2, 3, 1, 1], &[2, 1, 1, 1]).is_ok());
    assert!(MultinomialLogisticLoss::new(&[2, 3], &[2]).is_ok());
}

#[test]
fn test_multinomial_logistic_batch_mismatch() {
    let result = MultinomialLogisticLoss::new(&[2, 3], &[3, 1]);
    assert_eq!(
        result.unwrap_err(),
        LossError::BatchSizeMismatch {
            layer: MultinomialLogisticLoss::NAME,
            prediction: 2,
            label: 3,
        }
    );
}

#[test]
fn test_multinomial_logistic_label_must_be_class_index() {
    let result = MultinomialLogisticLoss::new(&[2, 3], &[2, 3]);
    assert!(matches!(result, Err(LossError::LabelShape { .. })));
}

// ========== 反向 ==========

#[test]
fn test_multinomial_logistic_backward_basic() {
    let mut layer = MultinomialLogisticLoss::new(&[2, 3], &[2, 1]).unwrap();
    let prediction = Tensor::new(&[0.2, 0.5, 0.3, 0.1, 0.1, 0.8], &[2, 3]);
    let label = Tensor::new(&[1., 2.], &[2, 1]);
    let mut grad = Tensor::zeros(&[2, 3]);

    let loss = layer.backward(&prediction, &label, &mut grad, true);

    // -(ln0.5 + ln0.8) / 2
    assert_abs_diff_eq!(loss, 0.458_145, epsilon = 1e-5);
    assert_abs_diff_eq!(grad[[0, 1]], -1.0, epsilon = 1e-6); // -1 / (2 * 0.5)
    assert_abs_diff_eq!(grad[[1, 2]], -0.625, epsilon = 1e-6); // -1 / (2 * 0.8)
    for (i, j) in [(0, 0), (0, 2), (1, 0), (1, 1)] {
        assert_eq!(grad[[i, j]], 0.);
    }
}

#[test]
fn test_multinomial_logistic_perfect_prediction() {
    let mut layer = MultinomialLogisticLoss::new(&[3, 2], &[3, 1]).unwrap();
    let prediction = Tensor::new(&[1., 0., 0., 1., 1., 0.], &[3, 2]);
    let label = Tensor::new(&[0., 1., 0.], &[3, 1]);
    let mut grad = Tensor::zeros(&[3, 2]);

    let loss = layer.backward(&prediction, &label, &mut grad, true);

    assert_eq!(loss, 0.);
    // 每个样本恰有一个非零元素 -1/N
    assert_abs_diff_eq!(grad.as_slice().iter().sum::<f32>(), -1. / 3. * 3., epsilon = 1e-6);
    assert_eq!(grad.as_slice().iter().filter(|&&g| g != 0.).count(), 3);
}

#[test]
fn test_multinomial_logistic_loss_non_negative() {
    let mut layer = MultinomialLogisticLoss::new(&[4, 5], &[4, 1]).unwrap();
    let prediction = Tensor::new_random(0., 1., &[4, 5]);
    let label = Tensor::new(&[0., 4., 2., 3.], &[4, 1]);
    let mut grad = Tensor::zeros(&[4, 5]);

    let loss = layer.backward(&prediction, &label, &mut grad, true);
    assert!(loss >= 0.);
    assert!(grad.as_slice().iter().all(|&g| g <= 0.));
}

#[test]
fn test_multinomial_logistic_zero_probability_is_clamped() {
    let mut layer = MultinomialLogisticLoss::new(&[1, 2], &[1, 1]).unwrap();
    let prediction = Tensor::new(&[0., 1.], &[1, 2]);
    let label = Tensor::new(&[0.], &[1, 1]);
    let mut grad = Tensor::zeros(&[1, 2]);

    let loss = layer.backward(&prediction, &label, &mut grad, true);

    assert!(loss.is_finite());
    assert_abs_diff_eq!(loss, -LOG_THRESHOLD.ln(), epsilon = 1e-4);
    assert!(grad[[0, 0]].is_finite());
    assert_abs_diff_eq!(grad[[0, 0]], -1. / LOG_THRESHOLD, epsilon = 1e14);
}

#[test]
fn test_multinomial_logistic_overwrites_stale_grad() {
    let mut layer = MultinomialLogisticLoss::new(&[2, 2], &[2, 1]).unwrap();
    let prediction = Tensor::new(&[0.5, 0.5, 0.25, 0.75], &[2, 2]);
    let label = Tensor::new(&[0., 1.], &[2, 1]);
    let mut grad = Tensor::new(&[5., 5., 5., 5.], &[2, 2]);

    layer.backward(&prediction, &label, &mut grad, true);

    assert_abs_diff_eq!(grad[[0, 0]], -1.0, epsilon = 1e-6);
    assert_eq!(grad[[0, 1]], 0.);
    assert_eq!(grad[[1, 0]], 0.);
    assert_abs_diff_eq!(grad[[1, 1]], -1. / 1.5, epsilon = 1e-6);
}

#[test]
fn test_multinomial_logistic_no_propagate_keeps_grad() {
    let mut layer = MultinomialLogisticLoss::new(&[1, 2], &[1, 1]).unwrap();
    let prediction = Tensor::new(&[0.5, 0.5], &[1, 2]);
    let label = Tensor::new(&[1.], &[1, 1]);
    let mut grad = Tensor::new(&[7., 7.], &[1, 2]);

    let loss = layer.backward(&prediction, &label, &mut grad, false);

    assert_abs_diff_eq!(loss, std::f32::consts::LN_2, epsilon = 1e-6);
    assert_eq!(grad, Tensor::new(&[7., 7.], &[1, 2]));
}

#[test]
fn test_multinomial_logistic_backward_is_idempotent() {
    let mut layer: LossLayer = MultinomialLogisticLoss::new(&[3, 4], &[3, 1]).unwrap().into();
    let prediction = Tensor::new_random(0., 1., &[3, 4]);
    let label = Tensor::new(&[3., 0., 1.], &[3, 1]);

    let ((loss1, grad1), (loss2, grad2)) = backward_twice(&mut layer, &prediction, &label);
    assert_eq!(loss1.to_bits(), loss2.to_bits());
    assert_eq!(grad1, grad2);
}
