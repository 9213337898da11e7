//! The `engine` binding: the API scripts use to talk to the host.

use std::sync::Arc;

use snip_eval::{arg, HostObject, Value};

use crate::errors::{not_a_render_function, unknown_message_type};
use crate::id::InstanceId;
use crate::messages::{Message, MessageManager, MessageType};
use crate::reactive::ReactiveComponent;

/// One API instance. Each execution gets its own, tagged with the
/// execution's instance id, so messages it creates can be traced back.
#[derive(Clone, Debug)]
pub struct EngineApi {
    instance_id: InstanceId,
    messages: Arc<MessageManager>,
}

impl EngineApi {
    pub fn new(instance_id: InstanceId, messages: Arc<MessageManager>) -> Self {
        EngineApi {
            instance_id,
            messages,
        }
    }

    pub fn instance_id(&self) -> &InstanceId {
        &self.instance_id
    }

    pub fn create_message(
        &self,
        kind: MessageType,
        title: impl Into<String>,
        content: impl Into<String>,
        detail: Option<String>,
    ) -> Message {
        self.messages
            .add(self.instance_id.clone(), kind, title, content, detail)
    }

    /// Messages created through this instance.
    pub fn messages(&self) -> Vec<Message> {
        self.messages.messages_from_source(&self.instance_id)
    }

    fn message_namespace(&self) -> Value {
        let api = self.clone();
        Value::object([(
            "createMessage",
            Value::native("createMessage", move |interp, args| {
                let kind_name = arg(&args, 0).to_display();
                let Some(kind) = MessageType::parse(&kind_name) else {
                    return Err(unknown_message_type(interp, &kind_name));
                };
                let detail = match arg(&args, 3) {
                    Value::Undefined | Value::Null => None,
                    other => Some(other.to_display()),
                };
                let message = api.create_message(
                    kind,
                    arg(&args, 1).to_display(),
                    arg(&args, 2).to_display(),
                    detail,
                );
                Ok(message_to_value(&message))
            }),
        )])
    }
}

impl HostObject for EngineApi {
    fn type_name(&self) -> &str {
        "EngineApi"
    }

    fn get(&self, key: &str) -> Option<Value> {
        match key {
            "instanceId" => Some(Value::string(self.instance_id.id.as_str())),
            "message" => Some(self.message_namespace()),
            "reactive" => Some(Value::native("reactive", |interp, mut args| {
                if !args.first().is_some_and(Value::is_callable) {
                    return Err(not_a_render_function(interp));
                }
                let render = args.remove(0);
                Ok(Value::host(ReactiveComponent::new(render, args)))
            })),
            "getMessages" => {
                let api = self.clone();
                Some(Value::native("getMessages", move |_, _| {
                    let messages = api.messages().iter().map(message_to_value).collect();
                    Ok(Value::array(messages))
                }))
            }
            _ => None,
        }
    }

    fn keys(&self) -> Vec<Arc<str>> {
        vec![Arc::from("instanceId")]
    }
}

/// Script view of a message: `{ id, type, title, content, detail? }`.
pub fn message_to_value(message: &Message) -> Value {
    let mut entries = vec![
        ("id", Value::Number(message.id as f64)),
        ("type", Value::string(message.kind.as_str())),
        ("title", Value::string(message.title.as_str())),
        ("content", Value::string(message.content.as_str())),
    ];
    if let Some(detail) = &message.detail {
        entries.push(("detail", Value::string(detail.as_str())));
    }
    Value::object(entries)
}

#[cfg(test)]
mod tests;
