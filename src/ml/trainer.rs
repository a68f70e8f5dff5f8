// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + evaluation loop using Burn's DataLoader and Adam.
//
// Key Burn 0.15 insight:
//   - Training uses MyBackend (Autodiff<NdArray>) for gradients
//   - model.valid() returns model on MyInnerBackend (NdArray)
//   - Evaluation batcher must also use MyInnerBackend
//   - argmax(1) returns [batch,1] so we squeeze before .equal()
//
// The loop reads splits from the session and, when it finishes,
// writes the final parameters back into the session's weights
// map. Per-epoch figures accumulate in ExecutionStats so the
// caller can log or persist them.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::ElementConversion,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::batcher::DigitBatcher;
use crate::domain::error::DigitError;
use crate::domain::traits::Preprocessing;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::network::{DigitMlp, DigitMlpConfig};
use crate::ml::session::ModelSession;
use crate::ml::stats::ExecutionStats;

type MyBackend      = burn::backend::Autodiff<burn::backend::NdArray>;
type MyInnerBackend = burn::backend::NdArray;

/// Per-epoch histories of one training run. Testing figures are
/// present only when the session carried a non-empty testing
/// split.
#[derive(Debug)]
pub struct TrainOutcome {
    pub training: ExecutionStats,
    pub testing:  Option<ExecutionStats>,
}

pub fn run_training<P: Preprocessing>(
    cfg:          &TrainConfig,
    session:      &mut ModelSession<P>,
    ckpt_manager: &CheckpointManager,
) -> Result<TrainOutcome> {
    let device = burn::backend::ndarray::NdArrayDevice::default();
    tracing::info!("Using NdArray device: {:?}", device);
    train_loop(cfg, session, ckpt_manager, device)
}

fn train_loop<P: Preprocessing>(
    cfg:          &TrainConfig,
    session:      &mut ModelSession<P>,
    ckpt_manager: &CheckpointManager,
    device:       burn::backend::ndarray::NdArrayDevice,
) -> Result<TrainOutcome> {

    // ── Validate run shape ────────────────────────────────────────────────────
    if cfg.epochs == 0 {
        return Err(DigitError::Config("epochs must be positive".into()).into());
    }
    if cfg.batch_size == 0 {
        return Err(DigitError::Config("batch size must be positive".into()).into());
    }

    let train_split = session
        .training_split()
        .cloned()
        .ok_or_else(|| DigitError::Config("training requires a populated training split".into()))?;
    if train_split.is_empty() {
        return Err(DigitError::Config("training split has no records".into()).into());
    }
    if train_split.feature_width() != cfg.input_width {
        return Err(DigitError::Config(format!(
            "record width {} does not match configured input width {}",
            train_split.feature_width(),
            cfg.input_width
        ))
        .into());
    }

    // An empty testing split has nothing to evaluate; skip it
    // rather than failing the run.
    let test_split = match session.testing_split() {
        Some(split) if split.is_empty() => {
            tracing::warn!("Testing split is empty; skipping per-epoch evaluation");
            None
        }
        other => other.cloned(),
    };

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg =
        DigitMlpConfig::new(cfg.input_width, cfg.hidden_size, cfg.classes, cfg.dropout);
    let mut model: DigitMlp<MyBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} -> {} -> {} units",
        cfg.input_width, cfg.hidden_size, cfg.classes,
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let optim_cfg = AdamConfig::new().with_epsilon(1e-8);
    let mut optim = optim_cfg.init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = DigitBatcher::<MyBackend>::new(device.clone());
    let mut train_builder = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1);
    if cfg.shuffle {
        train_builder = train_builder.shuffle(42);
    }
    let train_loader = train_builder.build(train_split.clone());

    // ── Evaluation data loader (InnerBackend — no autodiff overhead) ──────────
    let eval_loader = test_split.as_ref().map(|split| {
        let batcher = DigitBatcher::<MyInnerBackend>::new(device.clone());
        DataLoaderBuilder::new(batcher)
            .batch_size(cfg.batch_size)
            .num_workers(1)
            .build(split.clone())
    });

    let mut train_stats = ExecutionStats::new();
    let mut test_stats  = test_split.as_ref().map(|_| ExecutionStats::new());

    // ── Epoch loop ────────────────────────────────────────────────────────────
    let first_epoch = cfg.initial_epoch + 1;
    let last_epoch  = cfg.initial_epoch + cfg.epochs;

    for epoch in first_epoch..=last_epoch {

        // ── Training phase ────────────────────────────────────────────────────
        let mut loss_sum = 0.0f64;
        let mut correct  = 0usize;

        for batch in train_loader.iter() {
            let batch_len = batch.targets.dims()[0];
            let (loss, logits) = model.forward_loss(batch.images, batch.targets.clone());

            // Batch loss is a mean; weight by batch length so the
            // epoch figure divides out to a per-record average.
            loss_sum += loss.clone().into_scalar().elem::<f64>() * batch_len as f64;
            correct  += count_correct(logits, batch.targets);

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        train_stats.append(loss_sum, correct as f64, train_split.len());

        // ── Evaluation phase ──────────────────────────────────────────────────
        // model.valid() → DigitMlp<MyInnerBackend>
        // dropout disabled for deterministic evaluation
        if let (Some(loader), Some(stats), Some(split)) =
            (&eval_loader, test_stats.as_mut(), test_split.as_ref())
        {
            let model_valid = model.valid();

            let mut eval_loss_sum = 0.0f64;
            let mut eval_correct  = 0usize;

            for batch in loader.iter() {
                let batch_len = batch.targets.dims()[0];
                let (loss, logits) =
                    model_valid.forward_loss(batch.images, batch.targets.clone());

                eval_loss_sum += loss.into_scalar().elem::<f64>() * batch_len as f64;
                eval_correct  += count_correct(logits, batch.targets);
            }

            stats.append(eval_loss_sum, eval_correct as f64, split.len());
        }

        let test_err_col = test_stats
            .as_ref()
            .and_then(|stats| stats.last_err())
            .map_or_else(|| "n/a".to_string(), |err| format!("{err:.4}"));
        let test_acc_col = test_stats
            .as_ref()
            .and_then(|stats| stats.last_acc())
            .map_or_else(|| "n/a".to_string(), |acc| format!("{:.1}%", acc * 100.0));

        println!(
            "Epoch {:>3}/{} | train_err={:.4} | train_acc={:.1}% | test_err={} | test_acc={}",
            epoch,
            last_epoch,
            train_stats.last_err().unwrap_or(f64::NAN),
            train_stats.last_acc().unwrap_or(0.0) * 100.0,
            test_err_col,
            test_acc_col,
        );

        ckpt_manager.save_model(&model, epoch)?;
        tracing::info!("Checkpoint saved for epoch {}", epoch);
    }

    // ── Publish weights into the session ──────────────────────────────────────
    let trained = model.valid();
    let weights = session.weights_mut();
    weights.clear();
    for (name, values) in trained.named_parameters() {
        weights.insert(name, values);
    }

    tracing::info!("Training complete!");
    Ok(TrainOutcome {
        training: train_stats,
        testing:  test_stats,
    })
}

/// Count records whose top logit names the target class.
fn count_correct<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> usize {
    // argmax(1) returns shape [batch, 1] — squeeze to [batch]
    // before comparing with targets which is [batch]
    let predicted = logits.argmax(1).flatten::<1>(0, 1);
    let matches: i64 = predicted
        .equal(targets)
        .int().sum().into_scalar().elem::<i64>();
    matches as usize
}
