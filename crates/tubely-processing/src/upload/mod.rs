//! Upload pipelines: authorize → stage → (probe → classify → remux) → publish.

mod authorize;
mod publish;
mod service;
mod thumbnail_pipeline;
mod video_pipeline;

#[cfg(test)]
pub(crate) mod test_support;

pub use authorize::AuthorizedUpload;
pub use publish::Publisher;
pub use service::{IngestService, IngestSettings};
