pub mod batch_planner;
pub mod overview_writer;
pub mod script_emitter;

pub use batch_planner::plan;
pub use overview_writer::OverviewWriter;
pub use script_emitter::{BatchScript, ScriptEmitter};
