pub mod tooltip;

pub use tooltip::{TooltipModel, TooltipPlacement};
