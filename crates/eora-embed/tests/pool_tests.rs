use candle_core::{DType, Device, Tensor};
use eora_embed::masked_mean_l2;

fn unit(v: &[f32]) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    v.iter().map(|x| x / norm).collect()
}

#[test]
fn padded_positions_do_not_shift_the_mean() {
    let dev = Device::Cpu;
    // Row 0 has one real token and one pad; row 1 has two real tokens.
    let hidden = Tensor::from_slice(
        &[2.0f32, 0.0, 0.0, 9.0, 9.0, 9.0, 1.0, 3.0, 0.0, 3.0, 1.0, 0.0],
        (2, 2, 3),
        &dev,
    )
    .unwrap();
    let mask = Tensor::from_slice(&[1u32, 0, 1, 1], (2, 2), &dev).unwrap().to_dtype(DType::F32).unwrap();

    let pooled: Vec<Vec<f32>> = masked_mean_l2(&hidden, &mask).unwrap().to_vec2().unwrap();

    assert_eq!(pooled.len(), 2);
    for (got, want) in pooled[0].iter().zip(unit(&[2.0, 0.0, 0.0])) {
        assert!((got - want).abs() < 1e-5, "row 0: {got} vs {want}");
    }
    for (got, want) in pooled[1].iter().zip(unit(&[2.0, 2.0, 0.0])) {
        assert!((got - want).abs() < 1e-5, "row 1: {got} vs {want}");
    }
}

#[test]
fn two_dimensional_hidden_state_is_an_error() {
    let dev = Device::Cpu;
    let hidden = Tensor::zeros((2, 4), DType::F32, &dev).unwrap();
    let mask = Tensor::ones((2, 4), DType::F32, &dev).unwrap();
    assert!(masked_mean_l2(&hidden, &mask).is_err());
}

#[test]
fn fully_masked_row_pools_to_zeros() {
    let dev = Device::Cpu;
    let hidden = Tensor::ones((1, 3, 2), DType::F32, &dev).unwrap();
    let mask = Tensor::zeros((1, 3), DType::F32, &dev).unwrap();
    let pooled: Vec<Vec<f32>> = masked_mean_l2(&hidden, &mask).unwrap().to_vec2().unwrap();
    assert!(pooled[0].iter().all(|x| *x == 0.0));
}
