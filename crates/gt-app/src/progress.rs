use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum GenerateStage {
    PreparingOutput,
    Resuming { already_computed: usize },
    ComputingPoint,
    WritingTable,
    WritingReport,
    Packaging,
    Completed,
}

impl GenerateStage {
    pub fn label(&self) -> &'static str {
        match self {
            GenerateStage::PreparingOutput => "prepare",
            GenerateStage::Resuming { .. } => "resume",
            GenerateStage::ComputingPoint => "compute",
            GenerateStage::WritingTable => "write",
            GenerateStage::WritingReport => "report",
            GenerateStage::Packaging => "package",
            GenerateStage::Completed => "done",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PointProgress {
    pub index: usize,
    pub total: usize,
    pub electric_field: f64,
}

#[derive(Debug, Clone)]
pub struct GenerateProgressEvent {
    pub stage: GenerateStage,
    pub elapsed_wall_s: f64,
    pub output: PathBuf,
    pub message: Option<String>,
    pub point: Option<PointProgress>,
}

impl GenerateProgressEvent {
    pub fn stage(
        stage: GenerateStage,
        elapsed_wall_s: f64,
        output: PathBuf,
        message: Option<String>,
    ) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            output,
            message,
            point: None,
        }
    }
}
