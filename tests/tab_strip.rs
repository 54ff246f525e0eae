use std::sync::Arc;
use std::time::Duration;

use mockall::mock;
use pretty_assertions::assert_eq;
use rstest::rstest;
use tokio::sync::mpsc;

use tabstrip::layout::{compute_width, Frame, LayoutConfig};
use tabstrip::resource::{DemoPageProvider, NoPageResources, ResourceEvent, ResourceLoader};
use tabstrip::state::{Tab, TabId};
use tabstrip::sticky::{sticky_target, StickyInputs, StickyPosition};
use tabstrip::strip::{
    ChannelObserver, HeadlessButtons, Notification, TabStripController, TabStripObserver,
};

mock! {
    Observer {}
    impl TabStripObserver for Observer {
        fn notify(&mut self, notification: &Notification);
    }
}

fn strip_of(titles: &[&str]) -> TabStripController<HeadlessButtons, NoPageResources> {
    let mut strip = TabStripController::new(HeadlessButtons, NoPageResources, LayoutConfig::default());
    for (i, title) in titles.iter().enumerate() {
        strip.add_tab(Tab::new(TabId(i as u64)).with_title(*title)).unwrap();
    }
    strip
}

fn titles<R: tabstrip::resource::PageResources>(
    strip: &TabStripController<HeadlessButtons, R>,
) -> Vec<String> {
    strip.collection().iter().map(|t| t.title.clone()).collect()
}

#[test]
fn closing_before_the_selection_keeps_the_same_tab_selected() {
    let mut strip = strip_of(&["A", "B", "C"]);
    strip.select_tab(1).unwrap();

    strip.remove_tab(0).unwrap();

    assert_eq!(titles(&strip), vec!["B", "C"]);
    assert_eq!(strip.selected_index(), Some(0));
}

#[test]
fn closing_the_selected_last_tab_selects_the_new_last() {
    let mut strip = strip_of(&["A", "B", "C"]);
    assert_eq!(strip.selected_index(), Some(2));

    strip.remove_tab(2).unwrap();

    assert_eq!(titles(&strip), vec!["A", "B"]);
    assert_eq!(strip.selected_index(), Some(1));
}

#[test]
fn closing_everything_ends_with_no_selection() {
    let mut strip = strip_of(&["A", "B", "C"]);
    strip.select_tab(0).unwrap();
    while !strip.collection().is_empty() {
        strip.remove_tab(0).unwrap();
        assert_eq!(strip.selected_index().is_none(), strip.collection().is_empty());
    }
    assert_eq!(strip.selected_index(), None);
}

#[rstest]
#[case(400.0, 118.33, false)]
#[case(200.0, 90.0, true)]
fn three_tabs_share_the_viewport(#[case] viewport: f32, #[case] width: f32, #[case] scrolling: bool) {
    let ideal = compute_width(viewport, 3, 45.0, 90.0, 250.0).unwrap();
    assert!((ideal - width).abs() < 0.01, "width was {ideal}");

    let mut strip = strip_of(&["A", "B", "C"]);
    strip.viewport_resized(viewport);
    let view = strip.view();
    assert!((view.width_per_tab - width).abs() < 0.01);
    assert_eq!(view.scrolling_enabled, scrolling);
}

#[test]
fn selected_tab_scrolled_past_the_left_edge_pins_left() {
    let inputs = StickyInputs {
        scroll_offset: 600.0,
        viewport_width: 300.0,
        content_width: 1000.0,
        selected: Frame::new(500.0, 90.0),
    };
    assert_eq!(sticky_target(&inputs), StickyPosition::Left);
}

#[test]
fn scrolling_back_and_forth_notifies_each_edge_once() {
    let mut strip = strip_of(&["A", "B", "C", "D", "E", "F", "G", "H"]);
    strip.select_tab(0).unwrap();
    strip.viewport_resized(300.0);

    let (observer, mut rx) = ChannelObserver::channel();
    strip.subscribe(Box::new(observer));

    for offset in [150.0, 200.0, 250.0, 0.0, 0.0] {
        strip.scrolled(offset);
    }

    let mut pins = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        if let Notification::StickyChanged { transition, tab } = notification {
            pins.push((transition.to, tab));
        }
    }
    assert_eq!(
        pins,
        vec![
            (StickyPosition::Left, Some(TabId(0))),
            (StickyPosition::None, None),
        ]
    );
}

#[test]
fn selection_notifies_before_scroll() {
    let mut strip = strip_of(&["A", "B", "C"]);

    let mut observer = MockObserver::new();
    let mut seq = mockall::Sequence::new();
    observer
        .expect_notify()
        .withf(|n| *n == Notification::SelectionChanged { from: Some(2), to: Some(0) })
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    observer
        .expect_notify()
        .withf(|n| matches!(n, Notification::ScrollRequested { index: 0, .. }))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    strip.subscribe(Box::new(observer));

    assert_eq!(strip.select_tab(0), Ok(true));
}

#[tokio::test]
async fn demo_pages_load_in_the_background() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let provider = Arc::new(DemoPageProvider::new(tx.clone(), Duration::ZERO));
    let loader = ResourceLoader::new(provider.clone(), tx);
    let mut strip = TabStripController::new(HeadlessButtons, loader, LayoutConfig::default());

    strip
        .add_tab(Tab::new(TabId(7)).with_url("https://crates.io"))
        .unwrap();
    assert!(!strip.collection().get(0).unwrap().is_active());

    // Title and icon are reported before the creation completes.
    loop {
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        let created = matches!(event, ResourceEvent::Created { .. });
        strip.handle_resource_event(event);
        if created {
            break;
        }
    }

    let tab = strip.collection().get(0).unwrap();
    assert!(tab.is_active());
    assert_eq!(tab.title, "crates.io");
    assert_eq!(provider.live_pages(), 1);

    let config = strip.deactivate_tab(0).unwrap().unwrap();
    assert_eq!(provider.live_pages(), 0);
    assert_eq!(
        config.settings.get("url").and_then(|v| v.as_str()),
        Some("https://crates.io")
    );
}
