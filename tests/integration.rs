//! Integration tests for minifiber.
//!
//! These tests drive the engine through its public API against the recording
//! host, checking host-call order, minimality, state updates, and failures.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use minifiber::engine::{Engine, EngineConfig, Phase, RenderError};
use minifiber::hooks::{Hooks, SetState};
use minifiber::scheduler::{run_until_idle, UnitBudget, WorkStatus};
use minifiber::testing::{to_markup, HostCall, RecordingHost};
use minifiber::vnode::{attributes, create_element, h, AttrValue, Component, Event, Props, VNode};
use pretty_assertions::assert_eq;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn engine() -> Engine<RecordingHost> {
    Engine::new(RecordingHost::new())
}

fn mount(engine: &mut Engine<RecordingHost>, tree: VNode) {
    let container = engine.host().container();
    engine.render(tree, container);
    engine.flush().expect("flush");
}

/// Re-render into the same container, recording only the calls this pass makes.
fn update(engine: &mut Engine<RecordingHost>, tree: VNode) {
    engine.host_mut().clear_calls();
    mount(engine, tree);
}

fn log(engine: &Engine<RecordingHost>) -> String {
    engine
        .host()
        .calls()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn markup(engine: &Engine<RecordingHost>) -> String {
    to_markup(engine.host(), engine.host().container())
}

fn list(items: &[&str]) -> VNode {
    h("ul").with_children(items.iter().map(|item| h("li").child(*item)))
}

// ---------------------------------------------------------------------------
// Host call order
// ---------------------------------------------------------------------------

#[test]
fn test_first_render_call_order() {
    let mut engine = engine();
    let tree = create_element(
        "div",
        attributes([("id", "x")]),
        [create_element("a", attributes([("href", "u")]), ["bar"])],
    );
    mount(&mut engine, tree);

    insta::assert_snapshot!(log(&engine), @r###"
    create div
    set id=x
    create a
    set href=u
    create #text
    set nodeValue=bar
    append #text -> a
    append a -> div
    append div -> #container
    "###);
    assert_eq!(markup(&engine), r#"<div id="x"><a href="u">bar</a></div>"#);
}

#[test]
fn test_identical_rerender_makes_no_host_calls() {
    let mut engine = engine();
    let tree = || h("div").attr("id", "x").child(h("a").attr("href", "u").child("bar"));
    mount(&mut engine, tree());
    update(&mut engine, tree());

    assert!(engine.host().calls().is_empty());
    let report = engine.last_commit().expect("committed");
    assert_eq!(report.placements, 0);
    assert_eq!(report.deletions, 0);
    assert_eq!(report.updates, 3);
    assert_eq!(report.host_calls, 0);
}

#[test]
fn test_replacement_at_one_position() {
    let mut engine = engine();
    mount(&mut engine, list(&["a", "b", "c"]));
    update(
        &mut engine,
        h("ul")
            .child(h("li").child("a"))
            .child(h("li").child("b"))
            .child(h("p").child("c")),
    );

    insta::assert_snapshot!(log(&engine), @r###"
    create p
    create #text
    set nodeValue=c
    remove li from ul
    append #text -> p
    append p -> ul
    "###);
    assert_eq!(markup(&engine), "<ul><li>a</li><li>b</li><p>c</p></ul>");
    assert_eq!(engine.last_commit().map(|r| r.deletions), Some(1));
}

#[test]
fn test_shrinking_list_deletes_tail() {
    let mut engine = engine();
    mount(&mut engine, list(&["a", "b", "c"]));
    update(&mut engine, list(&["a"]));

    assert_eq!(log(&engine), "remove li from ul\nremove li from ul");
    assert_eq!(markup(&engine), "<ul><li>a</li></ul>");
}

#[test]
fn test_growing_list_appends() {
    let mut engine = engine();
    mount(&mut engine, list(&["a"]));
    update(&mut engine, list(&["a", "b"]));

    assert_eq!(markup(&engine), "<ul><li>a</li><li>b</li></ul>");
    let report = engine.last_commit().expect("committed");
    assert_eq!(report.placements, 2);
    assert_eq!(report.deletions, 0);
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

#[test]
fn test_only_changed_attributes_touch_the_host() {
    let mut engine = engine();
    mount(
        &mut engine,
        h("div").attr("id", "x").attr("title", "a").attr("class", "c"),
    );

    update(
        &mut engine,
        h("div").attr("id", "x").attr("title", "b").attr("class", "c"),
    );
    assert_eq!(log(&engine), "set title=b");

    update(&mut engine, h("div").attr("id", "x").attr("title", "b"));
    assert_eq!(log(&engine), "unset class");
    assert_eq!(markup(&engine), r#"<div id="x" title="b"></div>"#);
}

#[test]
fn test_typed_attribute_values() {
    let mut engine = engine();
    mount(
        &mut engine,
        h("input").attr("maxlength", 8).attr("disabled", true).attr("step", 0.5),
    );
    assert_eq!(
        markup(&engine),
        r#"<input maxlength="8" disabled="true" step="0.5"></input>"#
    );
}

// ---------------------------------------------------------------------------
// Event listeners
// ---------------------------------------------------------------------------

#[test]
fn test_stable_listener_is_not_reattached() {
    let clicks = Rc::new(Cell::new(0));
    let counter = Rc::clone(&clicks);
    let handler = AttrValue::listener(move |_| counter.set(counter.get() + 1));

    let mut engine = engine();
    mount(&mut engine, h("button").attr("onClick", handler.clone()));
    update(&mut engine, h("button").attr("onClick", handler));
    assert!(engine.host().calls().is_empty());

    let button = engine.host().find("button").expect("button");
    assert_eq!(engine.host().dispatch(button, &Event::new("click")), 1);

    update(&mut engine, h("button"));
    assert_eq!(log(&engine), "unlisten click");
    assert_eq!(engine.host().dispatch(button, &Event::new("click")), 0);
    assert_eq!(clicks.get(), 1);
}

#[test]
fn test_listener_receives_event_payload() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut engine = engine();
    mount(
        &mut engine,
        h("input").on("onInput", move |event| {
            sink.borrow_mut().push(event.value.clone().unwrap_or_default());
        }),
    );

    let input = engine.host().find("input").expect("input");
    engine.host().dispatch(input, &Event::new("input").with_value("hi"));
    assert_eq!(*seen.borrow(), vec!["hi".to_string()]);
}

// ---------------------------------------------------------------------------
// Components and state
// ---------------------------------------------------------------------------

fn counter(hooks: &mut Hooks<'_>, props: &Props) -> Option<VNode> {
    let start = match props.get("start") {
        Some(AttrValue::Int(n)) => *n,
        _ => 0,
    };
    let (count, set_count) = hooks.use_state(start);
    Some(
        h("button")
            .on("onClick", move |_| set_count.update(|n| n + 1))
            .child(count.to_string()),
    )
}

fn click(engine: &Engine<RecordingHost>) {
    let button = engine.host().find("button").expect("button");
    engine.host().dispatch(button, &Event::new("click"));
}

#[test]
fn test_updates_fold_into_one_pass() {
    let mut engine = engine();
    mount(&mut engine, VNode::new(Component::new(counter)).attr("start", 10));
    assert_eq!(markup(&engine), "<button>10</button>");

    click(&engine);
    click(&engine);
    click(&engine);
    assert!(engine.has_pending_work());
    engine.host_mut().clear_calls();
    engine.flush().expect("flush");

    assert_eq!(markup(&engine), "<button>13</button>");
    assert_eq!(engine.stats().passes_started, 2);
    assert_eq!(engine.stats().commits, 2);
    insta::assert_snapshot!(log(&engine), @r###"
    unlisten click
    listen click
    set nodeValue=13
    "###);
}

#[test]
fn test_state_survives_parent_rerender() {
    let mut engine = engine();
    let app = || h("main").child(VNode::component(counter));
    mount(&mut engine, app());
    click(&engine);
    engine.flush().expect("flush");
    assert_eq!(markup(&engine), "<main><button>1</button></main>");

    update(&mut engine, app());
    assert_eq!(markup(&engine), "<main><button>1</button></main>");
}

#[test]
fn test_update_during_pass_restarts_it_without_losing_updates() {
    let mut engine = engine();
    mount(&mut engine, VNode::component(counter));

    click(&engine);
    // Root and component units of the new pass; the component folds one update.
    engine.perform_unit().expect("unit");
    engine.perform_unit().expect("unit");
    click(&engine);
    engine.flush().expect("flush");

    assert_eq!(markup(&engine), "<button>2</button>");
    assert_eq!(engine.stats().passes_abandoned, 1);
    assert_eq!(engine.stats().commits, 2);
}

#[test]
fn test_set_state_before_first_commit_is_ignored() {
    let mut engine = engine();
    mount(
        &mut engine,
        VNode::component(|hooks, _| {
            let (value, set) = hooks.use_state(String::from("initial"));
            set.set(String::from("ignored"));
            Some(VNode::text(value))
        }),
    );
    assert_eq!(markup(&engine), "initial");
    assert!(engine.is_idle());
    assert_eq!(engine.stats().passes_started, 1);
}

#[test]
fn test_handle_outlives_its_render() {
    let handle: Rc<RefCell<Option<SetState<String>>>> = Rc::default();
    let slot = Rc::clone(&handle);
    let mut engine = engine();
    mount(
        &mut engine,
        VNode::component(move |hooks, _| {
            let (label, set_label) = hooks.use_state(String::from("draft"));
            *slot.borrow_mut() = Some(set_label);
            Some(h("h1").child(label))
        }),
    );

    handle.borrow().as_ref().expect("rendered").set("final".into());
    engine.flush().expect("flush");
    assert_eq!(markup(&engine), "<h1>final</h1>");
}

#[test]
fn test_component_props_and_children() {
    fn card(_: &mut Hooks<'_>, props: &Props) -> Option<VNode> {
        let title = props.get_str("title").unwrap_or("untitled");
        Some(
            h("section")
                .child(h("h2").child(title))
                .with_children(props.children()),
        )
    }

    let mut engine = engine();
    mount(
        &mut engine,
        VNode::new(Component::new(card))
            .attr("title", "News")
            .child(h("p").child("body")),
    );
    assert_eq!(
        markup(&engine),
        "<section><h2>News</h2><p>body</p></section>"
    );
}

#[test]
fn test_component_rendering_nothing() {
    let mut engine = engine();
    mount(&mut engine, h("div").child(VNode::component(|_, _| None)));
    assert_eq!(markup(&engine), "<div></div>");
    assert_eq!(log(&engine).lines().filter(|l| l.starts_with("append")).count(), 2);
}

#[test]
fn test_fragment_children_attach_to_host_ancestor() {
    let mut engine = engine();
    mount(
        &mut engine,
        h("ul").child(VNode::fragment([h("li").child("1"), h("li").child("2")])),
    );
    assert_eq!(markup(&engine), "<ul><li>1</li><li>2</li></ul>");

    update(&mut engine, h("ul"));
    assert_eq!(log(&engine), "remove li from ul\nremove li from ul");
    assert_eq!(markup(&engine), "<ul></ul>");
}

#[test]
fn test_kind_change_replaces_subtree() {
    let mut engine = engine();
    mount(&mut engine, h("div").child(h("span").child("x")));
    update(&mut engine, h("div").child(VNode::fragment(["x"])));

    insta::assert_snapshot!(log(&engine), @r###"
    create #text
    set nodeValue=x
    remove span from div
    append #text -> div
    "###);
}

type RenderFn = fn(&mut Hooks<'_>, &Props) -> Option<VNode>;

fn labelled(hooks: &mut Hooks<'_>, label: &str) -> Option<VNode> {
    let (text, _) = hooks.use_state(format!("{label}-state"));
    Some(h("i").child(text))
}

fn alpha(hooks: &mut Hooks<'_>, _: &Props) -> Option<VNode> {
    labelled(hooks, "alpha")
}

fn beta(hooks: &mut Hooks<'_>, _: &Props) -> Option<VNode> {
    labelled(hooks, "beta")
}

#[test]
fn test_function_pointer_components_do_not_share_state() {
    let mut engine = engine();
    let pick = |render: RenderFn| VNode::component(render);
    mount(&mut engine, pick(alpha));
    assert_eq!(markup(&engine), "<i>alpha-state</i>");

    update(&mut engine, pick(beta));
    assert_eq!(markup(&engine), "<i>beta-state</i>");
    insta::assert_snapshot!(log(&engine), @r###"
    create i
    create #text
    set nodeValue=beta-state
    remove i from #container
    append #text -> i
    append i -> #container
    "###);

    update(&mut engine, pick(beta));
    assert_eq!(log(&engine), "");
}

// ---------------------------------------------------------------------------
// Scheduling
// ---------------------------------------------------------------------------

#[test]
fn test_sliced_render_matches_uninterrupted_render() {
    let tree = || {
        h("div")
            .child(list(&["a", "b", "c"]))
            .child(VNode::component(counter))
            .child(VNode::fragment(["x", "y"]))
    };

    let mut whole = engine();
    mount(&mut whole, tree());

    let mut sliced = engine();
    let container = sliced.host().container();
    sliced.render(tree(), container);
    let mut slices = 0;
    while sliced.work_loop(&mut UnitBudget::new(2)).expect("slice") == WorkStatus::Continue {
        slices += 1;
        assert!(sliced.current_root().is_none());
    }

    assert!(slices > 3);
    assert_eq!(sliced.host().calls(), whole.host().calls());
    assert_eq!(markup(&sliced), markup(&whole));
}

#[test]
fn test_abandoned_pass_attaches_nothing() {
    let mut engine = engine();
    let container = engine.host().container();
    engine.render(list(&["stale", "work"]), container);
    engine.work_loop(&mut UnitBudget::new(3)).expect("slice");

    engine.render(h("p").child("fresh"), container);
    engine.flush().expect("flush");

    assert_eq!(markup(&engine), "<p>fresh</p>");
    assert_eq!(engine.stats().passes_abandoned, 1);
    assert!(engine
        .host()
        .calls()
        .iter()
        .filter(|call| matches!(call, HostCall::AppendChild { .. }))
        .all(|call| !call.to_string().contains("li")));
}

#[test]
fn test_step_by_step_units() {
    let mut engine = engine();
    let container = engine.host().container();
    engine.render(h("p").child("x"), container);

    assert_eq!(engine.perform_unit().expect("root"), WorkStatus::Continue);
    assert_eq!(engine.perform_unit().expect("p"), WorkStatus::Continue);
    assert_eq!(log(&engine), "create p");
    assert_eq!(engine.perform_unit().expect("text"), WorkStatus::Done);
    assert_eq!(markup(&engine), "<p>x</p>");
    assert_eq!(engine.perform_unit().expect("idle"), WorkStatus::Done);
}

#[tokio::test]
async fn test_async_driver_settles_state_updates() {
    let config = EngineConfig::new().with_max_units_per_slice(2);
    let mut engine = Engine::with_config(RecordingHost::new(), config);
    let container = engine.host().container();
    engine.render(VNode::component(counter), container);
    run_until_idle(&mut engine).await.expect("first render");

    click(&engine);
    click(&engine);
    let slices = run_until_idle(&mut engine).await.expect("update");

    assert_eq!(slices, 2);
    assert_eq!(markup(&engine), "<button>2</button>");
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn test_commit_failure_keeps_committed_tree() {
    let mut engine = engine();
    mount(&mut engine, list(&["a"]));
    let committed = engine.current_root();

    engine.host_mut().fail_on("append_child");
    let container = engine.host().container();
    engine.render(list(&["a", "b"]), container);
    let err = engine.flush().expect_err("append fails");

    assert!(matches!(err, RenderError::Host { phase: Phase::Commit, .. }));
    assert_eq!(engine.current_root(), committed);
    assert_eq!(engine.stats().passes_failed, 1);
    assert!(engine.is_idle());
    assert_eq!(markup(&engine), "<ul><li>a</li></ul>");

    engine.host_mut().recover();
    update(&mut engine, list(&["a", "b"]));
    assert_eq!(markup(&engine), "<ul><li>a</li><li>b</li></ul>");
}

#[test]
fn test_failed_deletion_retries_cleanly() {
    let mut engine = engine();
    mount(&mut engine, list(&["a", "b", "c"]));

    engine.host_mut().fail_on("remove_child");
    let container = engine.host().container();
    engine.render(list(&["a"]), container);
    let err = engine.flush().expect_err("remove fails");
    assert!(matches!(err, RenderError::Host { phase: Phase::Commit, .. }));
    assert_eq!(markup(&engine), "<ul><li>a</li><li>b</li><li>c</li></ul>");

    engine.host_mut().recover();
    update(&mut engine, list(&["a"]));
    assert_eq!(markup(&engine), "<ul><li>a</li></ul>");
    insta::assert_snapshot!(log(&engine), @r###"
    remove li from ul
    remove li from ul
    "###);
}

#[test]
fn test_retry_after_deletions_already_applied() {
    let mut engine = engine();
    mount(&mut engine, list(&["a", "b"]));

    engine.host_mut().fail_on("append_child");
    let container = engine.host().container();
    engine.render(h("ul").child(h("p").child("x")), container);
    let err = engine.flush().expect_err("append fails");
    assert!(matches!(err, RenderError::Host { phase: Phase::Commit, .. }));
    // Both items left the host before the append failed.
    assert_eq!(markup(&engine), "<ul></ul>");
    assert_eq!(engine.fibers().len(), 2);

    engine.host_mut().recover();
    update(&mut engine, h("ul").child(h("p").child("x")));
    assert_eq!(markup(&engine), "<ul><p>x</p></ul>");
    insta::assert_snapshot!(log(&engine), @r###"
    create p
    create #text
    set nodeValue=x
    append #text -> p
    append p -> ul
    "###);
    assert_eq!(engine.fibers().len(), 4);
}

#[test]
fn test_failed_commit_detaches_nodes_it_attached() {
    let mut engine = engine();
    let page = |extra: bool, id: &str| {
        let mut section = h("section").child(h("i"));
        if extra {
            section = section.child(h("b"));
        }
        h("div").child(section).child(h("header").attr("id", id))
    };
    mount(&mut engine, page(false, "a"));

    engine.host_mut().fail_on("set_attribute");
    let container = engine.host().container();
    engine.render(page(true, "b"), container);
    engine.flush().expect_err("set fails");
    assert_eq!(
        markup(&engine),
        r#"<div><section><i></i></section><header id="a"></header></div>"#
    );

    engine.host_mut().recover();
    update(&mut engine, page(true, "b"));
    assert_eq!(
        markup(&engine),
        r#"<div><section><i></i><b></b></section><header id="b"></header></div>"#
    );
    insta::assert_snapshot!(log(&engine), @r###"
    create b
    append b -> section
    set id=b
    "###);
}

#[test]
fn test_partial_attribute_patch_is_not_repeated() {
    let mut engine = engine();
    let button = |title: &str| h("button").attr("title", title).on("onClick", |_| {});
    mount(&mut engine, button("a"));

    engine.host_mut().fail_on("add_listener");
    let container = engine.host().container();
    engine.render(button("b"), container);
    engine.flush().expect_err("listen fails");
    assert_eq!(markup(&engine), r#"<button title="b"></button>"#);

    engine.host_mut().recover();
    update(&mut engine, button("b"));
    assert_eq!(log(&engine), "listen click");
    let node = engine.host().find("button").expect("button");
    assert_eq!(engine.host().dispatch(node, &Event::new("click")), 1);
}

#[test]
fn test_render_failure_reports_phase() {
    let mut host = RecordingHost::new();
    host.fail_on("create_node");
    let container = host.container();
    let mut engine = Engine::new(host);
    engine.render(h("div"), container);

    let err = engine.flush().expect_err("create fails");
    assert!(matches!(err, RenderError::Host { phase: Phase::Render, .. }));
    assert!(engine.current_root().is_none());
    assert!(engine.wip_root().is_none());
    assert!(engine.is_idle());
    assert_eq!(engine.fibers().len(), 0);
}
