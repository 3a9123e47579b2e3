//! 组件注册表
//!
//! 进程启动时写入，之后冻结为只读，通过 `Arc<Registry>` 在窗口间共享。

use super::{ActionTable, Component, Context, Descriptor, HandlerRef};
use crate::error::{Error, Result};
use crate::event::InstanceId;
use crate::page::PageConfig;
use crate::parser::Template;
use crate::runtime::Route;
use serde_json::Value as JsonValue;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// 类型擦除后的组件实例，由窗口按 ID 持有
pub trait Instance {
    fn id(&self) -> InstanceId;

    fn descriptor(&self) -> &Arc<Descriptor>;

    /// 当前公开字段的快照
    fn snapshot(&self) -> Result<JsonValue>;

    /// 已挂载的模板，首次使用时解析并缓存
    fn template(&mut self) -> Result<Arc<Template>>;

    fn invoke(&mut self, handler: HandlerRef, ctx: &mut Context<'_>, payload: Option<JsonValue>) -> Result<()>;

    fn navigate(&mut self, ctx: &mut Context<'_>, route: &Route);

    fn dismount(&mut self);

    fn page_config(&self) -> Option<PageConfig>;

    fn as_any(&self) -> &dyn Any;
}

struct Mounted<C> {
    id: InstanceId,
    component: C,
    descriptor: Arc<Descriptor>,
    table: Arc<ActionTable<C>>,
    template: Option<Arc<Template>>,
}

impl<C: Component> Instance for Mounted<C> {
    fn id(&self) -> InstanceId {
        self.id
    }

    fn descriptor(&self) -> &Arc<Descriptor> {
        &self.descriptor
    }

    fn snapshot(&self) -> Result<JsonValue> {
        serde_json::to_value(&self.component).map_err(|e| Error::Snapshot {
            component: self.descriptor.name().to_string(),
            reason: e.to_string(),
        })
    }

    fn template(&mut self) -> Result<Arc<Template>> {
        if let Some(template) = &self.template {
            return Ok(template.clone());
        }
        let template = Template::parse(self.component.template()).map_err(|source| Error::Template {
            component: self.descriptor.name().to_string(),
            source,
        })?;
        let template = Arc::new(template);
        self.template = Some(template.clone());
        Ok(template)
    }

    fn invoke(&mut self, handler: HandlerRef, ctx: &mut Context<'_>, payload: Option<JsonValue>) -> Result<()> {
        self.table
            .invoke(&self.descriptor, handler, &mut self.component, ctx, payload)
    }

    fn navigate(&mut self, ctx: &mut Context<'_>, route: &Route) {
        self.component.on_navigate(ctx, route);
    }

    fn dismount(&mut self) {
        self.component.on_dismount();
    }

    fn page_config(&self) -> Option<PageConfig> {
        self.component.page_config()
    }

    fn as_any(&self) -> &dyn Any {
        &self.component
    }
}

trait Factory: Send + Sync {
    fn descriptor(&self) -> &Arc<Descriptor>;
    fn create(&self, id: InstanceId) -> Box<dyn Instance>;
}

struct ComponentType<C> {
    descriptor: Arc<Descriptor>,
    table: Arc<ActionTable<C>>,
    factory: Box<dyn Fn() -> C + Send + Sync>,
}

impl<C: Component> Factory for ComponentType<C> {
    fn descriptor(&self) -> &Arc<Descriptor> {
        &self.descriptor
    }

    fn create(&self, id: InstanceId) -> Box<dyn Instance> {
        Box::new(Mounted {
            id,
            component: (self.factory)(),
            descriptor: self.descriptor.clone(),
            table: self.table.clone(),
            template: None,
        })
    }
}

/// 组件注册表：名字 → 工厂
#[derive(Default)]
pub struct Registry {
    types: HashMap<String, Arc<dyn Factory>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以 `C::default()` 作为工厂注册组件
    pub fn register<C: Component>(&mut self, name: &str) -> Result<Arc<Descriptor>> {
        self.register_with(name, C::default)
    }

    pub fn register_with<C, F>(&mut self, name: &str, factory: F) -> Result<Arc<Descriptor>>
    where
        C: Component,
        F: Fn() -> C + Send + Sync + 'static,
    {
        let key = normalize(name);
        if key.is_empty() {
            return Err(Error::EmptyName);
        }
        if self.types.contains_key(&key) {
            return Err(Error::DuplicateName { name: key });
        }

        let mut table = ActionTable::new();
        C::actions(&mut table);
        let descriptor = Arc::new(table.descriptor(&key));
        tracing::debug!(
            "registered component '{}' with {} actions",
            key,
            descriptor.actions().len()
        );

        self.types.insert(
            key,
            Arc::new(ComponentType {
                descriptor: descriptor.clone(),
                table: Arc::new(table),
                factory: Box::new(factory),
            }),
        );
        Ok(descriptor)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(&normalize(name))
    }

    pub fn descriptor(&self, name: &str) -> Result<Arc<Descriptor>> {
        self.lookup(name).map(|f| f.descriptor().clone())
    }

    /// 创建一个全新的零值实例
    pub fn create(&self, name: &str, id: InstanceId) -> Result<Box<dyn Instance>> {
        self.lookup(name).map(|f| f.create(id))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(|k| k.as_str())
    }

    fn lookup(&self, name: &str) -> Result<&Arc<dyn Factory>> {
        self.types.get(&normalize(name)).ok_or_else(|| Error::UnknownComponent {
            name: name.to_string(),
        })
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
