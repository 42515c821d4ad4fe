use std::collections::HashMap;

use floorplan_core::geometry::Vector2;

use crate::scene::Scene;

#[derive(Debug, Clone)]
pub struct CommandRequest {
    pub name: String,
    pub args: Vec<String>,
}

impl CommandRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommandResponse {
    pub success: bool,
    pub message: Option<String>,
}

impl CommandResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

pub trait CommandHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse;
}

pub struct CommandContext<'a> {
    pub scene: &'a mut Scene,
}

pub struct CommandBus {
    handlers: HashMap<&'static str, Box<dyn CommandHandler>>,
}

impl CommandBus {
    pub fn new() -> Self {
        let mut bus = Self {
            handlers: HashMap::new(),
        };
        bus.register(UndoCommand);
        bus.register(RedoCommand);
        bus.register(ClearSelectionCommand);
        bus.register(SelectAllCommand);
        bus.register(FocusSelectionCommand);
        bus.register(DeleteSelectionCommand);
        bus.register(DuplicateSelectionCommand);
        bus.register(MoveSelectionCommand);
        bus.register(ToggleSnapCommand);
        bus
    }

    pub fn register<H: CommandHandler + 'static>(&mut self, handler: H) {
        self.handlers.insert(handler.name(), Box::new(handler));
    }

    pub fn dispatch(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        if let Some(handler) = self.handlers.get(request.name.as_str()) {
            handler.execute(request, context)
        } else {
            CommandResponse::err(format!("未知命令: {}", request.name))
        }
    }

    /// 已注册命令名，按字母序排列。
    pub fn available_commands(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for CommandBus {
    fn default() -> Self {
        Self::new()
    }
}

struct UndoCommand;

impl CommandHandler for UndoCommand {
    fn name(&self) -> &'static str {
        "undo"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        if context.scene.undo() {
            CommandResponse::ok("已撤销上一步操作")
        } else {
            CommandResponse::err("没有可撤销的操作")
        }
    }
}

struct RedoCommand;

impl CommandHandler for RedoCommand {
    fn name(&self) -> &'static str {
        "redo"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        if context.scene.redo() {
            CommandResponse::ok("已重做操作")
        } else {
            CommandResponse::err("没有可重做的操作")
        }
    }
}

struct ClearSelectionCommand;

impl CommandHandler for ClearSelectionCommand {
    fn name(&self) -> &'static str {
        "clear_selection"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        context.scene.clear_selection();
        CommandResponse::ok("选中集已清空")
    }
}

struct SelectAllCommand;

impl CommandHandler for SelectAllCommand {
    fn name(&self) -> &'static str {
        "select_all"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        context.scene.select_all();
        CommandResponse::ok(format!("已选中 {} 个元素", context.scene.selection_len()))
    }
}

struct FocusSelectionCommand;

impl CommandHandler for FocusSelectionCommand {
    fn name(&self) -> &'static str {
        "focus_selection"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        context.scene.focus_on_selection();
        CommandResponse::ok("视口已聚焦当前选中元素")
    }
}

struct DeleteSelectionCommand;

impl CommandHandler for DeleteSelectionCommand {
    fn name(&self) -> &'static str {
        "delete_selection"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        match context.scene.delete_selection() {
            0 => CommandResponse::err("选中集中没有可删除的元素"),
            removed => CommandResponse::ok(format!("已删除 {removed} 个元素")),
        }
    }
}

struct DuplicateSelectionCommand;

impl CommandHandler for DuplicateSelectionCommand {
    fn name(&self) -> &'static str {
        "duplicate_selection"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let created = context.scene.duplicate_selection();
        if created.is_empty() {
            CommandResponse::err("选中集中没有可复制的元素")
        } else {
            CommandResponse::ok(format!("已复制 {} 个元素", created.len()))
        }
    }
}

struct MoveSelectionCommand;

impl CommandHandler for MoveSelectionCommand {
    fn name(&self) -> &'static str {
        "move_selection"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let (dx, dy) = match request.args.as_slice() {
            [dx, dy] => match (dx.parse::<f64>(), dy.parse::<f64>()) {
                (Ok(dx), Ok(dy)) => (dx, dy),
                _ => return CommandResponse::err(format!("无法解析位移: {dx} {dy}")),
            },
            _ => return CommandResponse::err("用法: move_selection <dx> <dy>"),
        };
        match context.scene.move_selection(Vector2::new(dx, dy)) {
            Ok(0) => CommandResponse::err("选中集中没有可移动的元素"),
            Ok(moved) => CommandResponse::ok(format!("已移动 {moved} 个元素 ({dx}, {dy})")),
            Err(err) => CommandResponse::err(format!("移动失败: {err}")),
        }
    }
}

struct ToggleSnapCommand;

impl CommandHandler for ToggleSnapCommand {
    fn name(&self) -> &'static str {
        "toggle_snap"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        if context.scene.toggle_snap() {
            CommandResponse::ok("网格吸附已开启")
        } else {
            CommandResponse::ok("网格吸附已关闭")
        }
    }
}
