#![allow(clippy::unwrap_used, reason = "tests unwrap known-good renders")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use super::*;

/// A render function that sums its arguments and counts its calls.
fn counting_render() -> (Value, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let render = Value::native("render", move |_, args| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Value::Number(args.iter().map(Value::to_number).sum()))
    });
    (render, calls)
}

#[test]
fn args_changed_compares_length_and_strict_equality() {
    let shared = Value::array(vec![]);
    let component = ReactiveComponent::new(
        Value::Undefined,
        vec![Value::Number(1.0), shared.clone()],
    );

    assert!(!component.args_changed(&[Value::Number(1.0), shared.clone()]));
    assert!(component.args_changed(&[Value::Number(2.0), shared]));
    assert!(component.args_changed(&[Value::Number(1.0), Value::array(vec![])]));
    assert!(component.args_changed(&[Value::Number(1.0)]));
}

#[tokio::test]
async fn refresh_reuses_the_cached_result_for_equal_args() {
    let (render, calls) = counting_render();
    let component = ReactiveComponent::new(render, vec![Value::Number(1.0), Value::Number(2.0)]);
    let interp = Interpreter::default();

    assert!(component.last_result().is_none());
    let first = component.render(&interp).await.unwrap();
    assert_eq!(first.as_number(), Some(3.0));

    let same = component
        .refresh(&interp, vec![Value::Number(1.0), Value::Number(2.0)])
        .await
        .unwrap();
    assert_eq!(same.as_number(), Some(3.0));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let changed = component
        .refresh(&interp, vec![Value::Number(10.0)])
        .await
        .unwrap();
    assert_eq!(changed.as_number(), Some(10.0));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(component.args().len(), 1);
    assert_eq!(component.last_result().unwrap().as_number(), Some(10.0));
}

#[tokio::test]
async fn refresh_before_any_render_renders() {
    let (render, calls) = counting_render();
    let component = ReactiveComponent::new(render, vec![Value::Number(4.0)]);
    let interp = Interpreter::default();

    let value = component
        .refresh(&interp, vec![Value::Number(4.0)])
        .await
        .unwrap();
    assert_eq!(value.as_number(), Some(4.0));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn render_errors_propagate_and_keep_the_cache() {
    let render = Value::native("render", |interp, _| {
        Err(snip_eval::type_error(interp, "render failed"))
    });
    let component = ReactiveComponent::new(render, Vec::new());
    let thrown = component.render(&Interpreter::default()).await.unwrap_err();
    assert_eq!(thrown.message(), "TypeError: render failed");
    assert!(component.last_result().is_none());
}

#[tokio::test]
async fn stale_renders_do_not_replace_the_cache() {
    // Renders sleep for as many milliseconds as their argument.
    let render = Value::native_async("render", |_, args| async move {
        let ms = snip_eval::arg(&args, 0).to_number();
        tokio::time::sleep(Duration::from_millis(ms as u64)).await;
        Ok(snip_eval::arg(&args, 0))
    });
    let component = ReactiveComponent::new(render, Vec::new());
    let interp = Interpreter::default();

    let (slow, fast) = tokio::join!(
        component.refresh(&interp, vec![Value::Number(50.0)]),
        component.refresh(&interp, vec![Value::Number(1.0)]),
    );
    assert_eq!(slow.unwrap().as_number(), Some(50.0));
    assert_eq!(fast.unwrap().as_number(), Some(1.0));

    assert_eq!(component.args().len(), 1);
    assert_eq!(component.args()[0].as_number(), Some(1.0));
    assert_eq!(component.last_result().unwrap().as_number(), Some(1.0));
}

#[test]
fn host_view_exposes_args() {
    let component = ReactiveComponent::new(Value::Undefined, vec![Value::Number(7.0)]);
    assert_eq!(component.type_name(), "ReactiveComponent");
    assert_eq!(component.get("args").unwrap().inspect(), "[7]");
    assert!(component.get("render").unwrap().is_callable());
    assert!(component.get("missing").is_none());
}
