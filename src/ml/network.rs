// ============================================================
// Layer 5 — Network Definition
// ============================================================
// A small MLP over flattened pixel rows: hidden Linear -> ReLU
// -> Dropout -> output Linear. Logits come out raw; softmax is
// applied only where probabilities are needed.

use burn::{
    nn::{
        Dropout, DropoutConfig,
        Linear, LinearConfig,
    },
    prelude::*,
};

// NOTE: #[derive(Config)] already generates new(), Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct DigitMlpConfig {
    pub input_width: usize,
    pub hidden_size: usize,
    pub classes:     usize,
    pub dropout:     f64,
}

impl DigitMlpConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> DigitMlp<B> {
        DigitMlp {
            hidden:  LinearConfig::new(self.input_width, self.hidden_size).init(device),
            output:  LinearConfig::new(self.hidden_size, self.classes).init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
        }
    }
}

#[derive(Module, Debug)]
pub struct DigitMlp<B: Backend> {
    pub hidden:  Linear<B>,
    pub output:  Linear<B>,
    pub dropout: Dropout,
}

impl<B: Backend> DigitMlp<B> {
    /// [batch, input_width] -> [batch, classes] logits.
    pub fn forward(&self, images: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.hidden.forward(images);
        let x = burn::tensor::activation::relu(x);
        let x = self.dropout.forward(x);
        self.output.forward(x)
    }

    /// Forward pass plus cross-entropy loss against class indices.
    /// No autodiff bound here: the evaluation phase runs this on
    /// the inner backend.
    pub fn forward_loss(
        &self,
        images:  Tensor<B, 2>,
        targets: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(images);
        let ce = burn::nn::loss::CrossEntropyLossConfig::new()
            .init(&logits.device());
        let loss = ce.forward(logits.clone(), targets);
        (loss, logits)
    }

    /// Flattened parameter values keyed by layer-qualified name,
    /// in the form the session's weights map stores.
    pub fn named_parameters(&self) -> Vec<(String, Vec<f32>)> {
        let mut params = Vec::new();
        collect_linear(&mut params, "hidden", &self.hidden);
        collect_linear(&mut params, "output", &self.output);
        params
    }
}

fn collect_linear<B: Backend>(
    params: &mut Vec<(String, Vec<f32>)>,
    name: &str,
    linear: &Linear<B>,
) {
    params.push((format!("{name}.weight"), flat_values(linear.weight.val())));
    if let Some(bias) = &linear.bias {
        params.push((format!("{name}.bias"), flat_values_1d(bias.val())));
    }
}

fn flat_values<B: Backend>(tensor: Tensor<B, 2>) -> Vec<f32> {
    tensor.into_data().to_vec::<f32>().unwrap_or_default()
}

fn flat_values_1d<B: Backend>(tensor: Tensor<B, 1>) -> Vec<f32> {
    tensor.into_data().to_vec::<f32>().unwrap_or_default()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    fn tiny_model() -> DigitMlp<TestBackend> {
        let device = Default::default();
        DigitMlpConfig::new(4, 8, 3, 0.0).init(&device)
    }

    #[test]
    fn test_forward_produces_one_logit_row_per_record() {
        let device = Default::default();
        let model = tiny_model();

        let images = Tensor::<TestBackend, 2>::from_floats(
            [[0.0, 0.1, 0.2, 0.3], [1.0, 0.9, 0.8, 0.7]],
            &device,
        );
        let logits = model.forward(images);

        assert_eq!(logits.dims(), [2, 3]);
    }

    #[test]
    fn test_forward_loss_is_finite() {
        let device = Default::default();
        let model = tiny_model();

        let images =
            Tensor::<TestBackend, 2>::from_floats([[0.5, 0.5, 0.5, 0.5]], &device);
        let targets = Tensor::<TestBackend, 1, Int>::from_ints([2], &device);

        let (loss, logits) = model.forward_loss(images, targets);

        assert_eq!(logits.dims(), [1, 3]);
        assert!(loss.into_scalar().is_finite());
    }

    #[test]
    fn test_named_parameters_cover_both_layers() {
        let model = tiny_model();
        let params = model.named_parameters();

        let names: Vec<&str> = params.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec!["hidden.weight", "hidden.bias", "output.weight", "output.bias"]
        );

        let lengths: Vec<usize> = params.iter().map(|(_, values)| values.len()).collect();
        assert_eq!(lengths, vec![4 * 8, 8, 8 * 3, 3]);
    }
}
