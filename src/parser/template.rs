//! 模板引擎 - 处理数据绑定和条件渲染
//!
//! 支持的语法：
//! - `{{.Field}}` / `{{.A.B}}` / `{{.}}` 插值，输出经过 HTML 转义
//! - `{{raw .Field}}` 原样输出
//! - `{{if .X}}` / `{{if not .X}}` ... `{{else}}` ... `{{end}}`
//! - `{{range .List}}` ... `{{else}}` ... `{{end}}`，循环体内 `.` 指向当前元素

use crate::component::Descriptor;
use crate::error::{Error, Result, TemplateError};
use serde_json::Value as JsonValue;

static NULL: JsonValue = JsonValue::Null;

/// 字段路径，空路径表示 `.`
#[derive(Debug, Clone, PartialEq)]
struct FieldPath {
    segments: Vec<String>,
    line: usize,
    column: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Value { path: FieldPath, raw: bool },
    If { path: FieldPath, negate: bool, then: Vec<Node>, otherwise: Vec<Node> },
    Range { path: FieldPath, body: Vec<Node>, otherwise: Vec<Node> },
}

/// 模板词法单元
enum Token {
    Text(String),
    Action { content: String, line: usize, column: usize },
}

enum Action {
    Value { path: FieldPath, raw: bool },
    If { path: FieldPath, negate: bool },
    Range { path: FieldPath },
    Else,
    End,
}

enum BlockKind {
    If { path: FieldPath, negate: bool },
    Range { path: FieldPath },
}

/// 尚未遇到 `{{end}}` 的块
struct Block {
    kind: BlockKind,
    nodes: Vec<Node>,
    otherwise: Option<Vec<Node>>,
    line: usize,
    column: usize,
}

impl Block {
    fn open(kind: BlockKind, line: usize, column: usize) -> Self {
        Self {
            kind,
            nodes: Vec::new(),
            otherwise: None,
            line,
            column,
        }
    }
}

/// 解析后的模板，可重复渲染
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    pub fn parse(text: &str) -> std::result::Result<Self, TemplateError> {
        let mut root = Vec::new();
        let mut open: Vec<Block> = Vec::new();

        for token in tokenize(text)? {
            let (content, line, column) = match token {
                Token::Text(text) => {
                    current(&mut root, &mut open).push(Node::Text(text));
                    continue;
                }
                Token::Action { content, line, column } => (content, line, column),
            };

            match parse_action(&content, line, column)? {
                Action::Value { path, raw } => current(&mut root, &mut open).push(Node::Value { path, raw }),
                Action::If { path, negate } => open.push(Block::open(BlockKind::If { path, negate }, line, column)),
                Action::Range { path } => open.push(Block::open(BlockKind::Range { path }, line, column)),
                Action::Else => match open.last_mut() {
                    Some(block) if block.otherwise.is_none() => block.otherwise = Some(Vec::new()),
                    Some(_) => return Err(TemplateError::new(line, column, "duplicate {{else}}")),
                    None => return Err(TemplateError::new(line, column, "unexpected {{else}}")),
                },
                Action::End => {
                    let block = open
                        .pop()
                        .ok_or_else(|| TemplateError::new(line, column, "unexpected {{end}}"))?;
                    let node = close_block(block);
                    current(&mut root, &mut open).push(node);
                }
            }
        }

        if let Some(block) = open.last() {
            return Err(TemplateError::new(block.line, block.column, "unclosed block, missing {{end}}"));
        }
        Ok(Self { nodes: root })
    }

    /// 用字段快照渲染模板，不修改任何状态
    pub fn render(&self, data: &JsonValue) -> std::result::Result<String, TemplateError> {
        let mut out = String::new();
        render_nodes(&self.nodes, data, &mut out)?;
        Ok(out)
    }
}

/// 模板引擎
pub struct TemplateEngine;

impl TemplateEngine {
    /// 用快照渲染已解析的模板，错误归属到组件名下
    pub fn render(descriptor: &Descriptor, template: &Template, snapshot: &JsonValue) -> Result<String> {
        template.render(snapshot).map_err(|source| Error::Template {
            component: descriptor.name().to_string(),
            source,
        })
    }
}

fn current<'a>(root: &'a mut Vec<Node>, open: &'a mut [Block]) -> &'a mut Vec<Node> {
    match open.last_mut() {
        Some(Block {
            otherwise: Some(otherwise),
            ..
        }) => otherwise,
        Some(block) => &mut block.nodes,
        None => root,
    }
}

fn close_block(block: Block) -> Node {
    let otherwise = block.otherwise.unwrap_or_default();
    match block.kind {
        BlockKind::If { path, negate } => Node::If {
            path,
            negate,
            then: block.nodes,
            otherwise,
        },
        BlockKind::Range { path } => Node::Range {
            path,
            body: block.nodes,
            otherwise,
        },
    }
}

fn tokenize(text: &str) -> std::result::Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();
    let mut rest = text;
    let (mut line, mut column) = (1, 1);

    while let Some(open) = rest.find("{{") {
        if open > 0 {
            tokens.push(Token::Text(rest[..open].to_string()));
            advance(&rest[..open], &mut line, &mut column);
        }
        let after = &rest[open + 2..];
        let close = after
            .find("}}")
            .ok_or_else(|| TemplateError::new(line, column, "unclosed action, missing }}"))?;
        tokens.push(Token::Action {
            content: after[..close].trim().to_string(),
            line,
            column,
        });
        advance(&rest[open..open + 2 + close + 2], &mut line, &mut column);
        rest = &after[close + 2..];
    }

    if !rest.is_empty() {
        tokens.push(Token::Text(rest.to_string()));
    }
    Ok(tokens)
}

fn advance(consumed: &str, line: &mut usize, column: &mut usize) {
    for c in consumed.chars() {
        if c == '\n' {
            *line += 1;
            *column = 1;
        } else {
            *column += 1;
        }
    }
}

fn parse_action(content: &str, line: usize, column: usize) -> std::result::Result<Action, TemplateError> {
    let mut words = content.split_whitespace();
    let keyword = words
        .next()
        .ok_or_else(|| TemplateError::new(line, column, "empty action"))?;
    let args: Vec<&str> = words.collect();

    let single_path = |args: &[&str]| -> std::result::Result<FieldPath, TemplateError> {
        match args {
            [path] => parse_path(path, line, column),
            _ => Err(TemplateError::new(
                line,
                column,
                format!("'{}' expects exactly one field", keyword),
            )),
        }
    };

    match keyword {
        "end" if args.is_empty() => Ok(Action::End),
        "else" if args.is_empty() => Ok(Action::Else),
        "if" => match args.as_slice() {
            ["not", rest @ ..] => Ok(Action::If {
                path: single_path(rest)?,
                negate: true,
            }),
            _ => Ok(Action::If {
                path: single_path(args.as_slice())?,
                negate: false,
            }),
        },
        "range" => Ok(Action::Range {
            path: single_path(args.as_slice())?,
        }),
        "raw" => Ok(Action::Value {
            path: single_path(args.as_slice())?,
            raw: true,
        }),
        _ if keyword.starts_with('.') && args.is_empty() => Ok(Action::Value {
            path: parse_path(keyword, line, column)?,
            raw: false,
        }),
        _ => Err(TemplateError::new(line, column, format!("unknown action '{}'", content))),
    }
}

fn parse_path(text: &str, line: usize, column: usize) -> std::result::Result<FieldPath, TemplateError> {
    let invalid = || TemplateError::new(line, column, format!("invalid field '{}'", text));
    if text == "." {
        return Ok(FieldPath {
            segments: Vec::new(),
            line,
            column,
        });
    }
    let rest = text.strip_prefix('.').ok_or_else(invalid)?;
    let segments: Vec<String> = rest.split('.').map(str::to_string).collect();
    let valid = segments
        .iter()
        .all(|s| !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_'));
    if !valid {
        return Err(invalid());
    }
    Ok(FieldPath { segments, line, column })
}

fn render_nodes(nodes: &[Node], dot: &JsonValue, out: &mut String) -> std::result::Result<(), TemplateError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Value { path, raw } => {
                let text = json_to_string(lookup(path, dot)?);
                if *raw {
                    out.push_str(&text);
                } else {
                    escape_into(&text, out);
                }
            }
            Node::If { path, negate, then, otherwise } => {
                let truthy = is_truthy(lookup(path, dot)?);
                if truthy != *negate {
                    render_nodes(then, dot, out)?;
                } else {
                    render_nodes(otherwise, dot, out)?;
                }
            }
            Node::Range { path, body, otherwise } => {
                let items: Vec<&JsonValue> = match lookup(path, dot)? {
                    JsonValue::Array(items) => items.iter().collect(),
                    JsonValue::Object(map) => map.values().collect(),
                    JsonValue::Null => Vec::new(),
                    other => {
                        return Err(TemplateError::new(
                            path.line,
                            path.column,
                            format!("range can't iterate over {}", other),
                        ))
                    }
                };
                if items.is_empty() {
                    render_nodes(otherwise, dot, out)?;
                }
                for item in items {
                    render_nodes(body, item, out)?;
                }
            }
        }
    }
    Ok(())
}

/// 获取数据值
fn lookup<'a>(path: &FieldPath, dot: &'a JsonValue) -> std::result::Result<&'a JsonValue, TemplateError> {
    let mut current = dot;
    for segment in &path.segments {
        current = match current {
            JsonValue::Object(map) => map.get(segment).ok_or_else(|| {
                TemplateError::new(path.line, path.column, format!("field '{}' not found", segment))
            })?,
            JsonValue::Null => &NULL,
            _ => {
                return Err(TemplateError::new(
                    path.line,
                    path.column,
                    format!("can't evaluate field '{}' on a non-object value", segment),
                ))
            }
        };
    }
    Ok(current)
}

fn json_to_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null => String::new(),
        _ => value.to_string(),
    }
}

fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().unwrap_or(0.0) != 0.0,
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(a) => !a.is_empty(),
        JsonValue::Object(o) => !o.is_empty(),
    }
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
