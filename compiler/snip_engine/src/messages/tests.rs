use pretty_assertions::assert_eq;

use super::*;
use crate::id::ExecutionId;

#[test]
fn messages_are_keyed_by_source() {
    let manager = MessageManager::new();
    let first = InstanceId::execution(&ExecutionId::new());
    let second = InstanceId::execution(&ExecutionId::new());

    manager.add(first.clone(), MessageType::Info, "a", "one", None);
    manager.add(second.clone(), MessageType::Error, "b", "two", Some("detail".into()));
    manager.add(first.clone(), MessageType::Warning, "c", "three", None);

    let titles: Vec<String> = manager
        .messages_from_source(&first)
        .into_iter()
        .map(|m| m.title)
        .collect();
    assert_eq!(titles, vec!["a", "c"]);
    assert_eq!(manager.messages_from_source(&second).len(), 1);
    assert_eq!(manager.len(), 3);
}

#[test]
fn ids_increase_monotonically() {
    let manager = MessageManager::new();
    let source = InstanceId::engine();
    let a = manager.add(source.clone(), MessageType::Info, "t", "c", None);
    let b = manager.add(source, MessageType::Info, "t", "c", None);
    assert!(b.id > a.id);
    assert!(b.created_at >= a.created_at);
}

#[test]
fn remove_and_clear() {
    let manager = MessageManager::new();
    let source = InstanceId::engine();
    let other = InstanceId::engine();
    let message = manager.add(source.clone(), MessageType::Info, "t", "c", None);
    manager.add(source.clone(), MessageType::Info, "t", "c", None);
    manager.add(other.clone(), MessageType::Info, "t", "c", None);

    assert!(manager.remove(message.id));
    assert!(!manager.remove(message.id));
    assert_eq!(manager.clear_source(&source), 1);
    assert_eq!(manager.all().len(), 1);
    assert_eq!(manager.all()[0].source, other);
}

#[test]
fn message_types_parse_their_names() {
    for kind in [MessageType::Info, MessageType::Warning, MessageType::Error] {
        assert_eq!(MessageType::parse(kind.as_str()), Some(kind));
    }
    assert_eq!(MessageType::parse("fatal"), None);
}

#[test]
fn display_includes_detail() {
    let manager = MessageManager::new();
    let message = manager.add(
        InstanceId::engine(),
        MessageType::Error,
        "Failed",
        "body",
        Some("stack".into()),
    );
    assert_eq!(message.to_string(), "[error] Failed: body\nstack");
}
