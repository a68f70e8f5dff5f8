// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one.
//
// Why isolate Burn code here?
//   - If Burn's API changes, we only update this layer
//   - Other layers are testable without tensor machinery
//   - The model architecture is clearly separated from
//     data loading and application logic
//
// What's in this layer:
//
//   session.rs   — The model session
//                  Owns the training/testing splits, the weights
//                  map, and the injected preprocessing capability
//
//   stats.rs     — Per-epoch error/accuracy histories
//
//   network.rs   — The MLP classifier architecture
//                  hidden Linear → ReLU → Dropout → output Linear
//
//   trainer.rs   — The training loop
//                  Handles forward pass, loss computation,
//                  backward pass, optimiser step, and
//                  checkpoint saving per epoch
//
//   predictor.rs — The inference engine
//                  Loads a checkpoint, preprocesses raw records,
//                  runs the model, picks the winning class
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Session state: splits, weights, preprocessing capability
pub mod session;

/// Error/accuracy histories appended per epoch
pub mod stats;

/// MLP classifier architecture
pub mod network;

/// Full training loop with evaluation and checkpointing
pub mod trainer;

/// Inference engine — loads checkpoint and predicts classes
pub mod predictor;
