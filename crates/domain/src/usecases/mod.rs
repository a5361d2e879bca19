//! Application use cases

pub mod convert;
pub mod publish;
pub mod transform;

pub use convert::{ConvertConfig, ConvertError, ConvertRun, ConvertSummary};
pub use publish::{PublishConfig, PublishRun, PublishRunError, PublishSummary};
pub use transform::{AssetConfig, devto_variant, qiita_variant, rewrite_image_links};
