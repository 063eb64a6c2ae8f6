// src/types.rs
use crate::analysis::{Analysis, ReportFiles};

// 界面发给状态机的事件
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    Process(String),
    // 文件对话框或拖放选中的路径
    PathChosen(String),
    GenerateReport,
    // 回到文件选择页
    Back,
    Dismiss,
    Close,
}

// 弹窗消息
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResultsTab {
    #[default]
    Data,
    Statistics,
    Chart,
}

#[derive(Clone, Debug, Default)]
pub struct FileSelectState {
    pub path_input: String,
    pub notice: Option<Notice>,
}

#[derive(Clone, Debug)]
pub struct ResultsState {
    pub analysis: Analysis,
    pub histogram_png: Vec<u8>,
    pub tab: ResultsTab,
    pub last_report: Option<ReportFiles>,
    pub notice: Option<Notice>,
}

// 两个界面状态
#[derive(Clone, Debug)]
pub enum Screen {
    FileSelect(FileSelectState),
    Results(Box<ResultsState>),
}

impl Default for Screen {
    fn default() -> Self {
        Screen::FileSelect(FileSelectState::default())
    }
}

impl Screen {
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Screen::FileSelect(s) => s.notice.as_ref(),
            Screen::Results(r) => r.notice.as_ref(),
        }
    }
}
