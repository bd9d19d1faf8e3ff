use anyhow::{anyhow, Result};
use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;

/// Fits an encoding to exactly `max_len` positions: longer inputs are cut,
/// shorter ones are right-padded with `pad_id` and a zero mask.
pub fn fit_to_length(mut ids: Vec<u32>, mut mask: Vec<u32>, max_len: usize, pad_id: u32) -> (Vec<u32>, Vec<u32>) {
    ids.resize(max_len, pad_id);
    mask.resize(max_len, 0);
    (ids, mask)
}

/// Encodes `text` into `[1, max_len]` id and mask tensors on `device`.
pub fn tokenize_on_device(tokenizer: &Tokenizer, text: &str, max_len: usize, pad_id: u32, device: &Device) -> Result<(Tensor, Tensor)> {
    let encoding = tokenizer.encode(text, true).map_err(|e| anyhow!("tokenization failed: {e}"))?;
    let (ids, mask) = fit_to_length(encoding.get_ids().to_vec(), encoding.get_attention_mask().to_vec(), max_len, pad_id);
    let input_ids = Tensor::from_vec(ids, (1, max_len), device)?;
    let attention_mask = Tensor::from_vec(mask, (1, max_len), device)?;
    Ok((input_ids, attention_mask))
}
