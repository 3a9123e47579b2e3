//! 组件描述与动作分发表
//!
//! 每种组件类型在注册时构建一次 [`ActionTable`]，由它派生出只读的
//! [`Descriptor`]。分发时按名字精确查找，不做任何运行时反射。

use super::Context;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;

/// 动作期望的载荷形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// 无参数
    None,
    /// 一个结构化事件参数，值为类型名
    Event(&'static str),
}

impl fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadShape::None => write!(f, "no payload"),
            PayloadShape::Event(name) => write!(f, "a {} payload", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionInfo {
    pub name: String,
    pub payload: PayloadShape,
}

/// 组件类型的只读元数据
#[derive(Debug, Clone)]
pub struct Descriptor {
    name: String,
    actions: Vec<ActionInfo>,
    index: HashMap<String, usize>,
}

impl Descriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn actions(&self) -> &[ActionInfo] {
        &self.actions
    }

    pub fn action(&self, name: &str) -> Option<&ActionInfo> {
        self.index.get(name).map(|&i| &self.actions[i])
    }

    /// 按名字解析动作
    pub fn resolve(&self, action: &str) -> Result<HandlerRef> {
        self.index
            .get(action)
            .map(|&index| HandlerRef {
                index,
                payload: self.actions[index].payload,
            })
            .ok_or_else(|| Error::ActionNotFound {
                component: self.name.clone(),
                action: action.to_string(),
            })
    }
}

/// 已解析的处理函数引用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerRef {
    index: usize,
    payload: PayloadShape,
}

impl HandlerRef {
    pub fn payload(&self) -> PayloadShape {
        self.payload
    }
}

type PlainHandler<C> = Box<dyn Fn(&mut C, &mut Context<'_>) + Send + Sync>;
type EventHandler<C> =
    Box<dyn Fn(&mut C, &mut Context<'_>, JsonValue) -> serde_json::Result<()> + Send + Sync>;

enum Handler<C> {
    Plain(PlainHandler<C>),
    Event(EventHandler<C>),
}

/// 动作分发表
///
/// ```ignore
/// fn actions(table: &mut ActionTable<Self>) {
///     table
///         .on("OnNextPage", Self::on_next_page)
///         .on_event("OnDrop", Self::on_drop);
/// }
/// ```
pub struct ActionTable<C> {
    actions: Vec<ActionInfo>,
    handlers: Vec<Handler<C>>,
}

impl<C: 'static> ActionTable<C> {
    pub(crate) fn new() -> Self {
        Self {
            actions: Vec::new(),
            handlers: Vec::new(),
        }
    }

    /// 注册无参数动作
    pub fn on(&mut self, name: &str, handler: fn(&mut C, &mut Context<'_>)) -> &mut Self {
        self.insert(name, PayloadShape::None, Handler::Plain(Box::new(handler)))
    }

    /// 注册带一个结构化事件参数的动作，入站载荷必须能反序列化为 `E`
    pub fn on_event<E>(&mut self, name: &str, handler: fn(&mut C, &mut Context<'_>, E)) -> &mut Self
    where
        E: DeserializeOwned + 'static,
    {
        let erased = event_handler(move |component: &mut C, ctx: &mut Context<'_>, value: JsonValue| {
            let event: E = serde_json::from_value(value)?;
            handler(component, ctx, event);
            Ok(())
        });
        self.insert(name, PayloadShape::Event(short_type_name::<E>()), Handler::Event(erased))
    }

    fn insert(&mut self, name: &str, payload: PayloadShape, handler: Handler<C>) -> &mut Self {
        let info = ActionInfo {
            name: name.to_string(),
            payload,
        };
        match self.actions.iter().position(|a| a.name == name) {
            Some(i) => {
                tracing::warn!("action '{}' declared twice, keeping the last one", name);
                self.actions[i] = info;
                self.handlers[i] = handler;
            }
            None => {
                self.actions.push(info);
                self.handlers.push(handler);
            }
        }
        self
    }

    pub(crate) fn descriptor(&self, name: &str) -> Descriptor {
        let index = self
            .actions
            .iter()
            .enumerate()
            .map(|(i, a)| (a.name.clone(), i))
            .collect();
        Descriptor {
            name: name.to_string(),
            actions: self.actions.clone(),
            index,
        }
    }

    /// 同步调用处理函数。载荷与声明不符时不触碰组件。
    pub(crate) fn invoke(
        &self,
        descriptor: &Descriptor,
        handler: HandlerRef,
        component: &mut C,
        ctx: &mut Context<'_>,
        payload: Option<JsonValue>,
    ) -> Result<()> {
        let info = &descriptor.actions[handler.index];
        let mismatch = |reason: String| Error::SignatureMismatch {
            component: descriptor.name.clone(),
            action: info.name.clone(),
            expected: handler.payload(),
            reason,
        };

        match (&self.handlers[handler.index], payload) {
            (Handler::Plain(f), None) => {
                f(component, ctx);
                Ok(())
            }
            (Handler::Plain(_), Some(_)) => Err(mismatch("unexpected payload".to_string())),
            (Handler::Event(_), None) => Err(mismatch("missing payload".to_string())),
            (Handler::Event(f), Some(value)) => f(component, ctx, value).map_err(|e| mismatch(e.to_string())),
        }
    }
}

fn event_handler<C, F>(f: F) -> EventHandler<C>
where
    F: Fn(&mut C, &mut Context<'_>, JsonValue) -> serde_json::Result<()> + Send + Sync + 'static,
{
    Box::new(f)
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    // 泛型参数里也有 `::`，只截取最外层
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}
