use floorplan_engine::errors::EngineError;
use floorplan_io::IoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("加载平面图失败: {0}")]
    Load(#[source] IoError),
    #[error("导出平面图失败: {0}")]
    Export(#[source] IoError),
    #[error("场景操作失败: {0}")]
    Engine(#[from] EngineError),
}
