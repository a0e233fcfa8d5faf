pub mod engine;
pub mod pipeline;
pub mod solver;

pub use crate::domain::model::{
    OutputFormat, RenderedRoster, RosterSpec, Schedule, WeekPlan,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
