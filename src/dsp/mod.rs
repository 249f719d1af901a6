//! Effects
//!
//! An [`Effect`] wraps a base audio and an [`EffectOperation`]. Operations
//! are plain value types: amplify, normalize, fade in and fade out.

mod amplify;
mod creator;
mod effect;
mod fade;
mod normalize;

pub use amplify::{Amplify, AmplifyEffect};
pub use creator::EffectCreator;
pub use effect::{Effect, EffectOperation};
pub use fade::{FadeIn, FadeInOperation, FadeOut};
pub use normalize::Normalize;
