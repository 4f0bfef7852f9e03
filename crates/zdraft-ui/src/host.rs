//! Action 宿主
//!
//! 持有当前激活的 Action，把原始输入路由给它，并根据返回值驱动
//! 预览、提交和提示三个接收者。同一时刻只有一个 Action 处于激活状态。

use crate::action::{Action, ActionResult, ActionType, EntitySink, HintSink, MouseButton, PreviewSink};
use crate::actions::create_action;
use crate::command_registry;
use crate::error::ActionError;
use crate::event::{EventAdapter, InputEvent, PointerEvent};
use crate::settings::Settings;
use zdraft_core::entity::EntityId;

/// 由宿主直接处理的取消命令
const CANCEL_COMMANDS: [&str; 2] = ["esc", "cancel"];

/// 视图：预览和提示的接收者
pub trait View: PreviewSink + HintSink {}

impl<T: PreviewSink + HintSink + ?Sized> View for T {}

/// Action 宿主
pub struct ActionHost {
    settings: Settings,
    action: Option<Box<dyn Action>>,
}

impl ActionHost {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            action: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn active(&self) -> Option<&dyn Action> {
        self.action.as_deref()
    }

    pub fn active_type(&self) -> Option<ActionType> {
        self.action.as_ref().map(|a| a.action_type())
    }

    /// 停用当前 Action（写回设置），再激活新的 Action
    pub fn activate<V: View + ?Sized>(&mut self, action_type: ActionType, view: &mut V) {
        self.deactivate(view);
        let mut action = create_action(action_type, &self.settings);
        action.init(0);
        tracing::info!("Activated {}", action.name());
        self.action = Some(action);
        self.refresh(view);
    }

    /// 按命令名或快捷键激活工具
    pub fn activate_by_name<V: View + ?Sized>(&mut self, name: &str, view: &mut V) -> Result<ActionType, ActionError> {
        let action_type = command_registry::lookup(name)?;
        self.activate(action_type, view);
        Ok(action_type)
    }

    /// 停用当前 Action，把它的参数写回设置
    pub fn deactivate<V: View + ?Sized>(&mut self, view: &mut V) {
        if let Some(action) = self.action.take() {
            action.save_settings(&mut self.settings);
            tracing::info!("Deactivated {}", action.name());
            view.draw_preview(&[]);
            view.update_mouse_button_hints("", &[]);
        }
    }

    /// 鼠标移动：只刷新预览
    pub fn pointer_moved<V: View + ?Sized>(&mut self, pointer: &PointerEvent, view: &mut V) -> Result<(), ActionError> {
        let action = self.action.as_mut().ok_or(ActionError::NoActiveAction)?;
        action.on_mouse_move(pointer);
        view.draw_preview(action.preview());
        Ok(())
    }

    /// 鼠标释放
    pub fn pointer_released<D, V>(
        &mut self,
        pointer: &PointerEvent,
        button: MouseButton,
        doc: &mut D,
        view: &mut V,
    ) -> Result<Vec<EntityId>, ActionError>
    where
        D: EntitySink + ?Sized,
        V: View + ?Sized,
    {
        let action = self.action.as_mut().ok_or(ActionError::NoActiveAction)?;
        let result = action.on_mouse_click(pointer, button);
        Ok(self.apply(result, doc, view))
    }

    /// 命令行输入
    ///
    /// 没有激活的 Action 时，输入按工具名解析并激活对应工具。
    pub fn command_line<D, V>(&mut self, text: &str, doc: &mut D, view: &mut V) -> Result<Vec<EntityId>, ActionError>
    where
        D: EntitySink + ?Sized,
        V: View + ?Sized,
    {
        let trimmed = text.trim();
        if CANCEL_COMMANDS.iter().any(|c| c.eq_ignore_ascii_case(trimmed)) {
            self.escape(view);
            return Ok(Vec::new());
        }
        if self.action.is_none() {
            self.activate_by_name(trimmed, view)?;
            return Ok(Vec::new());
        }

        let event = EventAdapter::parse(trimmed).inspect_err(|e| {
            tracing::warn!("Rejected input {:?}: {}", trimmed, e);
        })?;
        let action = self.action.as_mut().ok_or(ActionError::NoActiveAction)?;
        let result = match event {
            InputEvent::Coordinate(coordinate) => action.on_coordinate(&coordinate),
            InputEvent::Command(command) => match action.on_command(&command) {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!("{} rejected {:?}: {}", action.name(), trimmed, e);
                    return Err(e);
                }
            },
        };
        Ok(self.apply(result, doc, view))
    }

    /// 取消：清空当前 Action 的全部约束，工具保持激活
    pub fn escape<V: View + ?Sized>(&mut self, view: &mut V) {
        if let Some(action) = self.action.as_mut() {
            action.reset();
            action.init(0);
            tracing::debug!("{} reset", action.name());
        }
        self.refresh(view);
    }

    /// 让当前 Action 重新进入序号为 `status` 的状态，保留已采集的约束
    pub fn init_status<V: View + ?Sized>(&mut self, status: usize, view: &mut V) -> Result<(), ActionError> {
        let action = self.action.as_mut().ok_or(ActionError::NoActiveAction)?;
        action.init(status);
        tracing::debug!("{} re-entered state {}", action.name(), status);
        self.refresh(view);
        Ok(())
    }

    /// 处理 Action 的返回值
    fn apply<D, V>(&mut self, result: ActionResult, doc: &mut D, view: &mut V) -> Vec<EntityId>
    where
        D: EntitySink + ?Sized,
        V: View + ?Sized,
    {
        let ids = match result {
            ActionResult::Continue => Vec::new(),
            ActionResult::CreateEntities(geometries) => {
                geometries.into_iter().map(|g| doc.add_entity(g)).collect()
            }
            ActionResult::Cancel => {
                self.deactivate(view);
                return Vec::new();
            }
        };
        self.refresh(view);
        ids
    }

    /// 刷新预览、提示和光标
    fn refresh<V: View + ?Sized>(&self, view: &mut V) {
        if let Some(action) = self.action.as_deref() {
            view.draw_preview(action.preview());
            view.update_mouse_button_hints(action.get_prompt(), &action.get_available_commands());
            view.update_mouse_cursor(action.cursor());
        }
    }
}
