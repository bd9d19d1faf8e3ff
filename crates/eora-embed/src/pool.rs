use anyhow::{ensure, Context, Result};
use candle_core::Tensor;

const MIN_DENOMINATOR: f64 = 1e-12;

/// Mean of the hidden states over unmasked tokens, L2-normalized per row.
///
/// `hidden` is `[B, T, H]`, `attention_mask` is `[B, T]`; returns `[B, H]`.
/// A row with no unmasked tokens pools to zeros.
pub fn masked_mean_l2(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    let (batch, _seq, hidden_dim) = hidden.dims3().context("hidden state must be [batch, seq, hidden]")?;
    let mask = attention_mask.to_device(hidden.device())?.to_dtype(hidden.dtype())?.unsqueeze(2)?;

    let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
    let counts = mask.sum(1)?.maximum(MIN_DENOMINATOR)?;
    let mean = summed.broadcast_div(&counts)?;

    let norms = mean.sqr()?.sum_keepdim(1)?.sqrt()?.maximum(MIN_DENOMINATOR)?;
    let pooled = mean.broadcast_div(&norms)?;
    ensure!(pooled.dims() == [batch, hidden_dim], "pooled shape {:?}, expected [{batch}, {hidden_dim}]", pooled.dims());
    Ok(pooled)
}
