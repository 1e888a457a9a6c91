//! Parameter search and size estimation around the external codec engine

pub mod estimate;
pub mod loader;
pub mod recommend;

pub use estimate::extrapolate_size;
pub use loader::EngineLoader;
pub use recommend::{fps_candidates, Recommendation, Recommender, RECOMMEND_SAMPLE_SECS};
