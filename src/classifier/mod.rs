use anyhow::Result;
use candle_core::Tensor;

/// Binary image classifier consumed as an opaque `tensor -> score` function.
///
/// Input is an NHWC `f32` tensor of shape `[1, 224, 224, 3]` with values in
/// `[0, 1]`; output is the probability of the positive class. Implementations
/// must be safe to call from several threads at once.
pub trait Classifier: Send + Sync {
    fn score(&self, input: &Tensor) -> Result<f32>;
}

mod vit;

pub use vit::VitClassifier;
