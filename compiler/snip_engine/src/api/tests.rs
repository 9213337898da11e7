#![allow(clippy::unwrap_used, reason = "tests unwrap known-good scripts")]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use snip_eval::CompiledFunction;

use super::*;
use crate::id::ExecutionId;

fn api() -> (EngineApi, Arc<MessageManager>) {
    let messages = Arc::new(MessageManager::new());
    let api = EngineApi::new(InstanceId::execution(&ExecutionId::new()), Arc::clone(&messages));
    (api, messages)
}

async fn run(api: &EngineApi, source: &str) -> Result<Value, snip_eval::RunFault> {
    let function = CompiledFunction::compile(&[Arc::from("engine")], source).unwrap();
    function.invoke(vec![Value::host(api.clone())]).await
}

#[tokio::test]
async fn scripts_read_the_instance_id() {
    let (api, _) = api();
    let value = run(&api, "return engine.instanceId").await.unwrap();
    assert_eq!(value.as_str(), Some(api.instance_id().id.as_str()));
}

#[tokio::test]
async fn create_message_records_under_the_instance() {
    let (api, messages) = api();
    let value = run(
        &api,
        r#"return engine.message.createMessage("warning", "Low disk", "3% left", "df -h")"#,
    )
    .await
    .unwrap();

    assert_eq!(
        value.inspect(),
        "{ id: 0, type: \"warning\", title: \"Low disk\", content: \"3% left\", detail: \"df -h\" }"
    );
    let stored = messages.messages_from_source(api.instance_id());
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].kind, MessageType::Warning);
    assert_eq!(stored[0].detail.as_deref(), Some("df -h"));
}

#[tokio::test]
async fn create_message_without_detail_omits_it() {
    let (api, _) = api();
    let value = run(
        &api,
        r#"return engine.message.createMessage("info", "Hello", "world")"#,
    )
    .await
    .unwrap();
    assert_eq!(
        value.inspect(),
        "{ id: 0, type: \"info\", title: \"Hello\", content: \"world\" }"
    );
}

#[tokio::test]
async fn unknown_message_types_throw() {
    let (api, messages) = api();
    let fault = run(&api, r#"engine.message.createMessage("debug", "t", "c")"#)
        .await
        .unwrap_err();
    assert_eq!(
        fault.error_message(),
        "Unknown message type \"debug\", expected \"info\", \"warning\" or \"error\""
    );
    assert!(messages.is_empty());
}

#[tokio::test]
async fn get_messages_lists_this_instance_only() {
    let (api, messages) = api();
    messages.add(InstanceId::engine(), MessageType::Info, "other", "x", None);
    let value = run(
        &api,
        r#"
        engine.message.createMessage("error", "A", "first")
        engine.message.createMessage("info", "B", "second")
        return engine.getMessages().map(m => m.title)
        "#,
    )
    .await
    .unwrap();
    assert_eq!(value.inspect(), "[\"A\", \"B\"]");
    assert_eq!(messages.len(), 3);
}

#[tokio::test]
async fn reactive_components_render_and_refresh() {
    let (api, _) = api();
    let value = run(
        &api,
        r#"
        let calls = 0
        const view = engine.reactive((a, b) => { calls++; return a + b }, 1, 2)
        const first = await view.render()
        const cached = await view.refresh(1, 2)
        const fresh = await view.refresh(5, 5)
        return [first, cached, fresh, calls, view.args]
        "#,
    )
    .await
    .unwrap();
    assert_eq!(value.inspect(), "[3, 3, 10, 2, [5, 5]]");
}

#[tokio::test]
async fn reactive_requires_a_function() {
    let (api, _) = api();
    let fault = run(&api, "engine.reactive(42)").await.unwrap_err();
    assert_eq!(fault.error_message(), "reactive() expects a render function");
}

#[test]
fn message_values_carry_all_fields() {
    let (api, _) = api();
    let message = api.create_message(MessageType::Error, "T", "C", None);
    let value = message_to_value(&message);
    assert_eq!(
        value.inspect(),
        "{ id: 0, type: \"error\", title: \"T\", content: \"C\" }"
    );
    assert_eq!(api.messages(), vec![message]);
}
