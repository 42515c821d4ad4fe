pub mod cli;
pub mod errors;
pub mod loader;

use floorplan_config::AppConfig;
use tracing::info;

use cli::{CliOptions, PlanSummary};
use errors::FrontendError;

/// 运行 CLI 前端：加载平面图、执行命令并输出概览。
pub fn run_cli(options: &CliOptions, config: &AppConfig) -> Result<PlanSummary, FrontendError> {
    info!(commands = options.commands.len(), "启动平面图 CLI 前端");
    cli::run(options, config)
}
