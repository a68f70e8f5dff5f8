// ============================================================
// Layer 4 — Digit Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<DigitSample>
// into tensors for the model forward pass.
//
// How batching works here:
//   Input:  Vec of N DigitSamples, each with feature rows of
//           width W and one-hot target rows
//   Output: DigitBatch with an image tensor of shape [N, W] and
//           an integer class tensor of shape [N]
//
//   We flatten all feature rows into one long Vec, then reshape:
//   [s1_p1, ..., s1_pW, s2_p1, ..., sN_pW] → [N, W]
//
//   Targets arrive one-hot (the label preprocessing output) and
//   the loss wants class indices, so each row collapses to the
//   position of its hot slot.
//
// Reference: Burn Book §4 (Batcher)
//            Rust Book §8 (Vectors)

use std::cmp::Ordering;

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::dataset::DigitSample;

// ─── DigitBatch ───────────────────────────────────────────────────────────────
/// A batch of digit samples ready for the model forward pass.
/// All tensors have batch_size as their first dimension.
///
/// B is the Burn Backend (e.g. NdArray, Wgpu) —
/// generic so the same batcher works on any device.
#[derive(Debug, Clone)]
pub struct DigitBatch<B: Backend> {
    /// Feature rows — shape: [batch_size, width]
    pub images: Tensor<B, 2>,

    /// Class index per sample — shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

// ─── DigitBatcher ─────────────────────────────────────────────────────────────
/// The batcher struct — holds the target device so tensors
/// are created on the correct device.
#[derive(Clone, Debug)]
pub struct DigitBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> DigitBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

// ─── Burn Batcher Trait Implementation ────────────────────────────────────────
// This is what makes DigitBatcher work with Burn's DataLoader.
// The DataLoader calls .batch(items) with each mini-batch of samples.
impl<B: Backend> Batcher<DigitSample, DigitBatch<B>> for DigitBatcher<B> {
    fn batch(&self, items: Vec<DigitSample>) -> DigitBatch<B> {
        let batch_size = items.len();
        // All feature rows have the same width (one grid shape per split)
        let width = items[0].image.len();

        // ── Flatten feature rows ──────────────────────────────────────────────
        let image_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.image.iter().copied())
            .collect();

        // ── Collapse one-hot targets to class indices ─────────────────────────
        let classes: Vec<i32> = items.iter().map(|s| class_index(&s.target)).collect();

        // ── Create tensors ────────────────────────────────────────────────────
        let images = Tensor::<B, 1>::from_floats(image_flat.as_slice(), &self.device)
            .reshape([batch_size, width]);

        let targets = Tensor::<B, 1, Int>::from_ints(classes.as_slice(), &self.device);

        DigitBatch { images, targets }
    }
}

/// Position of the hot slot in a one-hot row (the row's maximum,
/// so near-one-hot rows from a custom transform still resolve).
fn class_index(row: &[f32]) -> i32 {
    row.iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(Ordering::Equal))
        .map(|(slot, _)| slot as i32)
        .unwrap_or(0)
}
