//! 窗口管理：历史栈、组件挂载与事件分发
//!
//! 窗口按 ID 在 arena 中持有自己的组件实例，实例不反向引用窗口。

use super::app::{Shared, Task};
use super::navigation::{parse_url, NavEntry, Route, Target};
use crate::bridge::OutboundMessage;
use crate::component::{Context, Effect, Instance, Navigation};
use crate::error::{Direction, Error, Result};
use crate::event::{InstanceId, UiEvent, WindowId};
use crate::renderer::{RenderOutput, RenderPipeline};
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 窗口配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    /// 打开后立即加载的 URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_url: Option<String>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Mini App".to_string(),
            width: 1024,
            height: 768,
            resizable: true,
            default_url: None,
        }
    }
}

pub struct Window {
    id: WindowId,
    config: WindowConfig,
    shared: Shared,
    queue: Sender<Task>,
    pipeline: RenderPipeline,
    entries: Vec<NavEntry>,
    cursor: usize,
    instances: HashMap<InstanceId, Box<dyn Instance>>,
    mounted: Option<InstanceId>,
}

impl Window {
    pub(crate) fn new(id: WindowId, config: WindowConfig, shared: Shared, queue: Sender<Task>) -> Self {
        let pipeline = RenderPipeline::new(id, shared.transport.clone());
        Self {
            id,
            config,
            shared,
            queue,
            pipeline,
            entries: Vec::new(),
            cursor: 0,
            instances: HashMap::new(),
            mounted: None,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_entry(&self) -> Option<&NavEntry> {
        self.entries.get(self.cursor)
    }

    /// 当前挂载的实例
    pub fn current(&self) -> Option<InstanceId> {
        self.mounted
    }

    pub fn can_previous(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    pub fn can_next(&self) -> bool {
        !self.entries.is_empty() && self.cursor < self.entries.len() - 1
    }

    /// 以具体类型读取实例字段
    pub fn component<C: 'static>(&self, instance_id: InstanceId) -> Option<&C> {
        self.instances
            .get(&instance_id)
            .and_then(|i| i.as_any().downcast_ref::<C>())
    }

    pub fn snapshot(&self, instance_id: InstanceId) -> Result<serde_json::Value> {
        self.instances
            .get(&instance_id)
            .ok_or_else(|| Error::Snapshot {
                component: instance_id.to_string(),
                reason: "instance is not alive in this window".to_string(),
            })?
            .snapshot()
    }

    pub fn last_sequence(&self, instance_id: InstanceId) -> Option<u64> {
        self.pipeline.last_sequence(instance_id)
    }

    /// 加载 URL。组件未注册时返回错误，历史不变。
    pub fn load(&mut self, url: &str) -> Result<()> {
        let route = match parse_url(url)? {
            Target::External(url) => return self.shared.native.open_url(&url),
            Target::Component(route) => route,
        };

        let instance = self
            .shared
            .registry
            .create(route.component(), self.shared.next_instance_id())?;
        let instance_id = instance.id();
        tracing::debug!("window {}: load {} as instance {}", self.id, url, instance_id);

        self.dismount_current();
        if !self.entries.is_empty() {
            let evicted: Vec<NavEntry> = self.entries.drain(self.cursor + 1..).collect();
            for entry in evicted {
                self.evict(entry.instance_id);
            }
        }

        self.instances.insert(instance_id, instance);
        self.entries.push(NavEntry {
            route: route.clone(),
            instance_id,
        });
        self.cursor = self.entries.len() - 1;
        self.mount(instance_id, &route);
        Ok(())
    }

    pub fn previous(&mut self) -> Result<()> {
        if !self.can_previous() {
            return Err(Error::NoHistory {
                direction: Direction::Previous,
            });
        }
        self.move_cursor(self.cursor - 1);
        Ok(())
    }

    pub fn next(&mut self) -> Result<()> {
        if !self.can_next() {
            return Err(Error::NoHistory {
                direction: Direction::Next,
            });
        }
        self.move_cursor(self.cursor + 1);
        Ok(())
    }

    /// 用全新实例重新挂载当前记录，URL 和查询参数不变
    pub fn reload(&mut self) -> Result<()> {
        let entry = self.current_entry().cloned().ok_or(Error::NoHistory {
            direction: Direction::Current,
        })?;
        let instance = self
            .shared
            .registry
            .create(entry.route.component(), self.shared.next_instance_id())?;
        let instance_id = instance.id();
        tracing::debug!("window {}: reload {} as instance {}", self.id, entry.route.url(), instance_id);

        self.dismount_current();
        self.evict(entry.instance_id);
        self.instances.insert(instance_id, instance);
        self.entries[self.cursor].instance_id = instance_id;
        self.mount(instance_id, &entry.route);
        Ok(())
    }

    /// 分发一个 UI 事件到当前实例
    ///
    /// 指向已卸下实例的事件被静默丢弃。
    pub fn dispatch(&mut self, event: UiEvent) -> Result<()> {
        if self.mounted != Some(event.instance_id) {
            tracing::debug!(
                "window {}: drop '{}' for instance {} which is not mounted",
                self.id,
                event.action_name,
                event.instance_id
            );
            return Ok(());
        }

        let (can_previous, can_next) = (self.can_previous(), self.can_next());
        let Some(instance) = self.instances.get_mut(&event.instance_id) else {
            return Ok(());
        };
        let handler = instance.descriptor().resolve(&event.action_name)?;

        let mut ctx = Context::new(
            self.id,
            event.instance_id,
            can_previous,
            can_next,
            self.shared.native.as_ref(),
            &self.queue,
        );
        instance.invoke(handler, &mut ctx, event.payload)?;
        let effects = ctx.into_effects();
        self.apply_effects(event.instance_id, effects);
        Ok(())
    }

    /// 重新渲染实例，未挂载的实例直接忽略
    pub fn request_render(&mut self, instance_id: InstanceId) -> Result<Option<RenderOutput>> {
        if self.mounted != Some(instance_id) {
            return Ok(None);
        }
        match self.instances.get_mut(&instance_id) {
            Some(instance) => self.pipeline.render(instance.as_mut()).map(Some),
            None => Ok(None),
        }
    }

    /// 关闭窗口：卸下当前实例并销毁全部实例
    pub(crate) fn close(&mut self) {
        self.dismount_current();
        for (id, _) in self.instances.drain() {
            self.pipeline.forget(id);
        }
        self.entries.clear();
        self.cursor = 0;
    }

    fn move_cursor(&mut self, cursor: usize) {
        self.dismount_current();
        self.cursor = cursor;
        let entry = self.entries[cursor].clone();
        tracing::debug!("window {}: remount {} (instance {})", self.id, entry.route.url(), entry.instance_id);
        self.mount(entry.instance_id, &entry.route);
    }

    /// 挂载：导航钩子 → 页面文档 → 渲染 → 钩子请求的导航
    fn mount(&mut self, instance_id: InstanceId, route: &Route) {
        self.mounted = Some(instance_id);

        let (can_previous, can_next) = (self.can_previous(), self.can_next());
        let Some(instance) = self.instances.get_mut(&instance_id) else {
            return;
        };
        let mut ctx = Context::new(
            self.id,
            instance_id,
            can_previous,
            can_next,
            self.shared.native.as_ref(),
            &self.queue,
        );
        instance.navigate(&mut ctx, route);
        let effects = ctx.into_effects();

        if let Err(e) = self.render_mounted(instance_id) {
            self.report(&e);
        }

        // 钩子里的渲染请求已被上面的挂载渲染覆盖
        for effect in effects {
            if matches!(effect, Effect::Navigate(_)) {
                self.apply_effect(instance_id, effect);
            }
        }
    }

    fn render_mounted(&mut self, instance_id: InstanceId) -> Result<()> {
        let Some(instance) = self.instances.get_mut(&instance_id) else {
            return Ok(());
        };
        let output = self.pipeline.produce(instance.as_mut())?;

        if let Some(page) = instance.page_config() {
            let page = page.merged_with(&self.shared.page);
            let document = page.document(&output.markup).map_err(|source| Error::Template {
                component: instance.descriptor().name().to_string(),
                source,
            })?;
            self.pipeline.transport().send(OutboundMessage::Page {
                window_id: self.id,
                instance_id,
                title: page.title,
                document,
            })?;
        }
        self.pipeline.ship(output)
    }

    fn apply_effects(&mut self, instance_id: InstanceId, effects: Vec<Effect>) {
        for effect in effects {
            self.apply_effect(instance_id, effect);
        }
    }

    fn apply_effect(&mut self, instance_id: InstanceId, effect: Effect) {
        let result = match effect {
            Effect::Render => self.request_render(instance_id).map(|_| ()),
            Effect::Navigate(Navigation::Load(url)) => self.load(&url),
            Effect::Navigate(Navigation::Previous) => self.previous(),
            Effect::Navigate(Navigation::Next) => self.next(),
            Effect::Navigate(Navigation::Reload) => self.reload(),
        };
        if let Err(e) = result {
            self.report(&e);
        }
    }

    fn dismount_current(&mut self) {
        if let Some(id) = self.mounted.take() {
            if let Some(instance) = self.instances.get_mut(&id) {
                instance.dismount();
            }
        }
    }

    fn evict(&mut self, instance_id: InstanceId) {
        if self.instances.remove(&instance_id).is_some() {
            tracing::debug!("window {}: evict instance {}", self.id, instance_id);
        }
        self.pipeline.forget(instance_id);
    }

    fn report(&self, error: &Error) {
        self.shared.reporter.report(self.id, error);
    }
}
