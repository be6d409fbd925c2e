use crate::error::CqrsError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 命令执行结果码
///
/// 取值参考 <https://en.wikipedia.org/wiki/List_of_HTTP_status_codes>，
/// 但仅作为不透明标签使用，彼此之间没有大小顺序。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandStatus {
    #[default]
    Default,
    Success,
    Created,
    Accepted,
    Deleted,
    Modified,
    Unchanged,
    NotFound,
    Conflict,
    Removed,
    Added,
    Error,
}

impl CommandStatus {
    /// 全部取值（声明顺序）
    pub const ALL: [CommandStatus; 12] = [
        CommandStatus::Default,
        CommandStatus::Success,
        CommandStatus::Created,
        CommandStatus::Accepted,
        CommandStatus::Deleted,
        CommandStatus::Modified,
        CommandStatus::Unchanged,
        CommandStatus::NotFound,
        CommandStatus::Conflict,
        CommandStatus::Removed,
        CommandStatus::Added,
        CommandStatus::Error,
    ];

    /// 对应的数值码
    pub const fn code(self) -> u16 {
        match self {
            CommandStatus::Default => 0,
            CommandStatus::Success => 200,
            CommandStatus::Created => 201,
            CommandStatus::Accepted => 202,
            CommandStatus::Deleted => 204,
            CommandStatus::Added => 206,
            CommandStatus::Modified => 302,
            CommandStatus::Unchanged => 304,
            CommandStatus::NotFound => 404,
            CommandStatus::Conflict => 409,
            CommandStatus::Removed => 410,
            CommandStatus::Error => 500,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            CommandStatus::Default => "Default",
            CommandStatus::Success => "Success",
            CommandStatus::Created => "Created",
            CommandStatus::Accepted => "Accepted",
            CommandStatus::Deleted => "Deleted",
            CommandStatus::Modified => "Modified",
            CommandStatus::Unchanged => "Unchanged",
            CommandStatus::NotFound => "NotFound",
            CommandStatus::Conflict => "Conflict",
            CommandStatus::Removed => "Removed",
            CommandStatus::Added => "Added",
            CommandStatus::Error => "Error",
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u16> for CommandStatus {
    type Error = CqrsError;

    fn try_from(code: u16) -> Result<Self, CqrsError> {
        Self::from_code(code).ok_or(CqrsError::InvalidStatusCode(code))
    }
}

impl From<CommandStatus> for u16 {
    fn from(status: CommandStatus) -> Self {
        status.code()
    }
}

/// 状态变更快照：旧值与新值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusChange {
    old_status: CommandStatus,
    new_status: CommandStatus,
}

impl StatusChange {
    pub const fn new(old_status: CommandStatus, new_status: CommandStatus) -> Self {
        Self {
            old_status,
            new_status,
        }
    }

    pub const fn old_status(&self) -> CommandStatus {
        self.old_status
    }

    pub const fn new_status(&self) -> CommandStatus {
        self.new_status
    }

    /// 新旧值相同（同值设置同样会产生通知）
    pub fn is_unchanged(&self) -> bool {
        self.old_status == self.new_status
    }
}
