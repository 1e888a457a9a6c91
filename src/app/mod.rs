// Application layer - session state and use-case interactors

pub mod context;
pub mod convert_interactor;
pub mod estimate_interactor;
pub mod recommend_interactor;

pub use context::AppContext;
pub use convert_interactor::{ConvertInteractor, ConvertReport, PREVIEW_SECS};
pub use estimate_interactor::{EstimateInteractor, EstimateReport, ESTIMATE_SAMPLE_SECS};
pub use recommend_interactor::RecommendInteractor;
