//! UIコンポーネント

mod analysis_view;
mod follow_up;
mod header;
mod loader;
mod quality_gauge;
mod settings_panel;
mod upload_area;

pub use analysis_view::AnalysisView;
pub use follow_up::FollowUpPanel;
pub use header::Header;
pub use loader::Loader;
pub use quality_gauge::QualityGauge;
pub use settings_panel::SettingsPanel;
pub use upload_area::{FileReadResult, UploadArea};
