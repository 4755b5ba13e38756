//! Weekly training plan: week arithmetic, entry store, view modes and
//! the batch writes behind the send actions.

pub mod backend;
pub mod error;
pub mod mode;
pub mod notice;
pub mod render;
pub mod selection;
pub mod store;
pub mod submit;
pub mod view;
pub mod week;

pub use backend::PlanBackend;
pub use error::PlanError;
pub use mode::{ModeDecision, ViewMode, ViewParams};
pub use notice::{Notice, NoticeLevel};
pub use render::{render_week, CellView, Drafts, RenderContext, RowView, WeekView};
pub use selection::{AthleteSelection, DaySelection};
pub use store::PlanStore;
pub use submit::DayInput;
pub use view::WeekPlanView;
pub use week::{IsoWeek, WeekDates};
