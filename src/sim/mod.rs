//! 仿真核心模块
//!
//! 此模块包含传染过程、仿真时钟、准稳态历史、仿真门面与场景描述。

// 子模块声明
mod history;
mod process;
mod scenario;
mod simulation;
mod time;

// 重新导出公共接口
pub use history::HistoryBuffer;
pub use process::ContagionProcess;
pub use scenario::{
    MeasureKind, ModelSpec, PhaseSpec, SCENARIO_SCHEMA_VERSION, ScenarioSpec, StructureSpec,
    TableSpec,
};
pub use simulation::{EvolveStats, Simulation};
pub use time::Clock;
