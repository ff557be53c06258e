use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use chrome_engine::{
    ArrowSide, ChromeEvent, Error, EventCursor, Exit, FrameChrome, Notification, NotificationId,
    NotificationPhase, PointerOutcome, RemovalReason,
    test_support::{TestShell, wait_event, words},
};
use chrome_geom::{Point, RectPx, Size};
use config::Config;
use tokio::time::{Duration, sleep};

fn is_phase(ev: &ChromeEvent, want: fn(&NotificationPhase) -> bool) -> bool {
    matches!(ev, ChromeEvent::Notification { phase, .. } if want(phase))
}

/// Collect notification phases until `removed` notifications were removed.
async fn phases_until_removed(
    cursor: &mut EventCursor,
    removed: usize,
) -> Vec<(NotificationId, NotificationPhase)> {
    let mut out = Vec::new();
    let mut seen = 0;
    while seen < removed {
        let Some(ChromeEvent::Notification { id, phase, .. }) =
            wait_event(cursor, 120_000, |e| matches!(e, ChromeEvent::Notification { .. })).await
        else {
            panic!("timed out after {out:?}");
        };
        if matches!(phase, NotificationPhase::Removed(_) | NotificationPhase::Redirected) {
            seen += 1;
        }
        out.push((id, phase));
    }
    out
}

fn shown_frame(t: &TestShell) -> FrameChrome {
    let f = t.shell.frame("console").build();
    f.show();
    f
}

#[tokio::test(start_paused = true)]
async fn queue_is_fifo_with_one_visible_at_a_time() {
    let t = TestShell::new(Config::default()).unwrap();
    let f = shown_frame(&t);
    let mut cursor = t.shell.subscribe();
    let ids: Vec<NotificationId> = ["first", "second", "third"]
        .iter()
        .map(|s| f.notify(*s, 200, Exit::N, ArrowSide::Top, None).unwrap())
        .collect();

    let phases = phases_until_removed(&mut cursor, 3).await;
    let appeared: Vec<NotificationId> = phases
        .iter()
        .filter(|(_, p)| *p == NotificationPhase::Appearing)
        .map(|(id, _)| *id)
        .collect();
    assert_eq!(appeared, ids);

    let mut on_screen: Option<NotificationId> = None;
    for (id, phase) in &phases {
        match phase {
            NotificationPhase::Appearing => {
                assert_eq!(on_screen, None, "{id} appeared while another was showing");
                on_screen = Some(*id);
            }
            NotificationPhase::Removed(RemovalReason::Vanished) => {
                assert_eq!(on_screen, Some(*id));
                on_screen = None;
            }
            _ => {}
        }
    }
    assert!(!f.is_notifying());
    assert_eq!(f.notification_backlog(), vec!["first", "second", "third"]);
}

#[tokio::test(start_paused = true)]
async fn auto_duration_follows_word_count() {
    let t = TestShell::new(Config::default()).unwrap();
    let f = shown_frame(&t);
    let mut cursor = t.shell.subscribe();
    for n in [1, 2, 50] {
        f.notify(words(n), 0, Exit::None, ArrowSide::Top, None).unwrap();
    }
    let durations: Vec<Option<u64>> = phases_until_removed(&mut cursor, 3)
        .await
        .into_iter()
        .filter_map(|(_, p)| match p {
            NotificationPhase::Visible { duration_ms } => Some(duration_ms),
            _ => None,
        })
        .collect();
    assert_eq!(durations, vec![Some(5000), Some(5000), Some(15000)]);
}

#[tokio::test(start_paused = true)]
async fn short_text_is_rejected() {
    let t = TestShell::new(Config::default()).unwrap();
    let f = shown_frame(&t);
    assert_eq!(
        f.notify("ab", 0, Exit::N, ArrowSide::Top, None),
        Err(Error::InvalidContent { chars: 2, min: 3 })
    );
    assert_eq!(
        f.notify("<b>a</b>b", 0, Exit::N, ArrowSide::Top, None),
        Err(Error::InvalidContent { chars: 2, min: 3 })
    );
    assert!(f.notify("abc", 0, Exit::N, ArrowSide::Top, None).is_ok());
}

#[tokio::test(start_paused = true)]
async fn persistent_notifications_wait_for_a_click() {
    let t = TestShell::new(Config::default()).unwrap();
    t.prefs.update(|p| p.persistent_notifications = true);
    let f = shown_frame(&t);
    let mut cursor = t.shell.subscribe();
    let id = f.notify("stays around", 100, Exit::S, ArrowSide::Bottom, None).unwrap();

    let visible = wait_event(&mut cursor, 10_000, |e| {
        is_phase(e, |p| matches!(p, NotificationPhase::Visible { .. }))
    })
    .await;
    assert!(matches!(
        visible,
        Some(ChromeEvent::Notification {
            phase: NotificationPhase::Visible { duration_ms: None },
            ..
        })
    ));

    sleep(Duration::from_secs(60)).await;
    assert_eq!(
        f.active_notification(),
        Some((id, NotificationPhase::Visible { duration_ms: None }))
    );

    assert!(f.click_notification());
    let removed = wait_event(&mut cursor, 10_000, |e| {
        is_phase(e, |p| matches!(p, NotificationPhase::Removed(_)))
    })
    .await;
    assert!(matches!(
        removed,
        Some(ChromeEvent::Notification {
            phase: NotificationPhase::Removed(RemovalReason::Vanished),
            ..
        })
    ));
}

#[tokio::test(start_paused = true)]
async fn click_runs_dismiss_callback_once() {
    let t = TestShell::new(Config::default()).unwrap();
    let f = shown_frame(&t);
    let mut cursor = t.shell.subscribe();
    let fired = Arc::new(AtomicBool::new(false));
    let flag = fired.clone();
    f.notify_with(
        Notification::text("click me")
            .duration_ms(30_000)
            .on_dismiss(move || flag.store(true, Ordering::SeqCst)),
    )
    .unwrap();

    // A click during the slide-in is remembered and honoured once visible.
    wait_event(&mut cursor, 10_000, |e| {
        is_phase(e, |p| *p == NotificationPhase::Appearing)
    })
    .await
    .unwrap();
    assert!(f.click_notification());

    let removed = wait_event(&mut cursor, 10_000, |e| {
        is_phase(e, |p| matches!(p, NotificationPhase::Removed(_)))
    })
    .await;
    assert!(matches!(
        removed,
        Some(ChromeEvent::Notification {
            phase: NotificationPhase::Removed(RemovalReason::Dismissed),
            ..
        })
    ));
    assert!(fired.load(Ordering::SeqCst));
    assert!(!f.click_notification());
}

#[tokio::test(start_paused = true)]
async fn oversized_content_goes_to_a_popup_window() {
    let t = TestShell::new(Config::default()).unwrap();
    let f = t
        .shell
        .frame("tiny")
        .bounds(RectPx::new(0, 0, 150, 120))
        .build();
    f.show();
    let mut cursor = t.shell.subscribe();
    f.notify(words(100), 0, Exit::N, ArrowSide::Top, None).unwrap();
    let phases = phases_until_removed(&mut cursor, 1).await;
    assert_eq!(phases.last().map(|(_, p)| *p), Some(NotificationPhase::Redirected));
    assert!(!phases.iter().any(|(_, p)| *p == NotificationPhase::Appearing));
    let popups = t.popups.shown();
    assert_eq!(popups.len(), 1);
    assert_eq!(popups[0].0, f.id());
    assert!(t.surfaces.overlays(f.id()).is_empty());
}

#[tokio::test(start_paused = true)]
async fn kill_empties_the_queue_and_it_stays_usable() {
    let t = TestShell::new(Config::default()).unwrap();
    let f = shown_frame(&t);
    let mut cursor = t.shell.subscribe();
    for s in ["one", "two", "three"] {
        f.notify(s, 10_000, Exit::E, ArrowSide::Right, None).unwrap();
    }
    wait_event(&mut cursor, 10_000, |e| {
        is_phase(e, |p| matches!(p, NotificationPhase::Visible { .. }))
    })
    .await
    .unwrap();
    f.kill_notifications();
    assert_eq!(f.active_notification(), None);
    assert_eq!(f.pending_notifications(), 0);
    let killed = cursor
        .drain()
        .into_iter()
        .filter(|e| is_phase(e, |p| *p == NotificationPhase::Removed(RemovalReason::Killed)))
        .count();
    assert_eq!(killed, 3);
    assert_eq!(t.surfaces.overlays(f.id()).last().map(|(_, r)| *r), Some(None));

    f.notify("again", 100, Exit::None, ArrowSide::Top, None).unwrap();
    let phases = phases_until_removed(&mut cursor, 1).await;
    assert_eq!(
        phases.last().map(|(_, p)| *p),
        Some(NotificationPhase::Removed(RemovalReason::Vanished))
    );
}

#[tokio::test(start_paused = true)]
async fn fast_dispose_mid_slide_leaves_no_late_surface_writes() {
    let t = TestShell::new(Config::default()).unwrap();
    let f = shown_frame(&t);
    let mut cursor = t.shell.subscribe();
    f.notify("sliding in", 5_000, Exit::N, ArrowSide::Top, None).unwrap();
    f.notify("never shown", 5_000, Exit::N, ArrowSide::Top, None).unwrap();
    wait_event(&mut cursor, 10_000, |e| {
        is_phase(e, |p| *p == NotificationPhase::Appearing)
    })
    .await
    .unwrap();
    sleep(Duration::from_millis(20)).await;
    assert!(matches!(
        f.active_notification(),
        Some((_, NotificationPhase::Appearing))
    ));

    f.dispose(true).await;
    sleep(Duration::from_secs(10)).await;

    assert!(t.surfaces.released(f.id()));
    assert!(t.surfaces.calls_after_release(f.id()).is_empty());
    assert_eq!(
        f.notify("too late", 0, Exit::N, ArrowSide::Top, None),
        Err(Error::FrameDisposed)
    );
}

#[tokio::test(start_paused = true)]
async fn backlog_keeps_the_most_recent() {
    let mut config = Config::default();
    config.notify.backlog = 2;
    let t = TestShell::new(config).unwrap();
    let f = shown_frame(&t);
    let mut cursor = t.shell.subscribe();
    for s in ["<i>alpha</i>", "beta", "gamma"] {
        f.notify(s, 50, Exit::None, ArrowSide::Top, None).unwrap();
    }
    phases_until_removed(&mut cursor, 3).await;
    assert_eq!(f.notification_backlog(), vec!["beta", "gamma"]);
}

#[tokio::test(start_paused = true)]
async fn visible_popup_follows_frame_resize() {
    let t = TestShell::new(Config::default()).unwrap();
    let f = t
        .shell
        .frame("console")
        .bounds(RectPx::new(0, 0, 400, 300))
        .build();
    f.show();
    let mut cursor = t.shell.subscribe();
    f.notify("anchored", 30_000, Exit::N, ArrowSide::Bottom, None).unwrap();
    wait_event(&mut cursor, 10_000, |e| {
        is_phase(e, |p| matches!(p, NotificationPhase::Visible { .. }))
    })
    .await
    .unwrap();
    let before = t.surfaces.overlays(f.id()).last().and_then(|(_, r)| *r).unwrap();

    f.set_bounds(RectPx::new(0, 0, 600, 500));
    let after = t.surfaces.overlays(f.id()).last().and_then(|(_, r)| *r).unwrap();
    assert_eq!(after.size(), before.size());
    assert_eq!(after.bottom() - before.bottom(), 200);
    assert_eq!(after.cx() - before.cx(), 100);
}

/// First overlay rectangle placed for `id`.
fn first_overlay(t: &TestShell, f: &FrameChrome, id: NotificationId) -> RectPx {
    t.surfaces
        .overlays(f.id())
        .into_iter()
        .find_map(|(n, r)| if n == id { r } else { None })
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn pressing_on_the_popup_clicks_it() {
    let t = TestShell::new(Config::default()).unwrap();
    let f = t
        .shell
        .frame("console")
        .bounds(RectPx::new(50, 40, 400, 300))
        .build();
    f.show();
    let mut cursor = t.shell.subscribe();
    f.notify("press here", 30_000, Exit::None, ArrowSide::Bottom, None)
        .unwrap();
    wait_event(&mut cursor, 10_000, |e| {
        is_phase(e, |p| matches!(p, NotificationPhase::Visible { .. }))
    })
    .await
    .unwrap();

    let rect = t.surfaces.overlays(f.id()).last().and_then(|(_, r)| *r).unwrap();
    let on_popup = Point::new(50 + rect.cx(), 40 + rect.cy());
    assert_eq!(f.pointer_pressed(on_popup), PointerOutcome::NotificationClicked);
    assert_eq!(f.bounds(), RectPx::new(50, 40, 400, 300));

    let removed = wait_event(&mut cursor, 10_000, |e| {
        is_phase(e, |p| matches!(p, NotificationPhase::Removed(_)))
    })
    .await;
    assert!(matches!(
        removed,
        Some(ChromeEvent::Notification {
            phase: NotificationPhase::Removed(RemovalReason::Vanished),
            ..
        })
    ));
    assert_ne!(f.pointer_pressed(on_popup), PointerOutcome::NotificationClicked);
}

#[tokio::test(start_paused = true)]
async fn component_content_is_measured_redirected_and_remembered() {
    let config = Config::default();
    let (pad, arrow) = (config.notify.padding, config.notify.arrow);
    let t = TestShell::new(config).unwrap();
    let f = shown_frame(&t);
    let mut cursor = t.shell.subscribe();

    let small = f
        .notify_with(
            Notification::component(Size::new(120, 40), "progress bar")
                .duration_ms(100)
                .exit(Exit::None),
        )
        .unwrap();
    let large = f
        .notify_with(Notification::component(Size::new(600, 100), "big chart").duration_ms(100))
        .unwrap();
    let phases = phases_until_removed(&mut cursor, 2).await;

    assert_eq!(
        first_overlay(&t, &f, small).size(),
        Size::new(120 + 2 * pad, 40 + 2 * pad + arrow)
    );
    assert!(phases.contains(&(large, NotificationPhase::Redirected)));
    assert!(!phases.contains(&(large, NotificationPhase::Appearing)));
    let popups = t.popups.shown();
    assert_eq!(popups.len(), 1);
    assert_eq!(popups[0].0, f.id());
    assert_eq!(f.notification_backlog(), vec!["progress bar", "big chart"]);
}

#[tokio::test(start_paused = true)]
async fn diagonal_exits_start_off_frame() {
    let t = TestShell::new(Config::default()).unwrap();
    let f = t
        .shell
        .frame("console")
        .bounds(RectPx::new(0, 0, 400, 300))
        .build();
    f.show();
    let mut cursor = t.shell.subscribe();
    let ne = f.notify("from the corner", 100, Exit::NE, ArrowSide::Top, None).unwrap();
    let sw = f.notify("from the other one", 100, Exit::SW, ArrowSide::Bottom, None).unwrap();
    phases_until_removed(&mut cursor, 2).await;

    let frame = RectPx::new(0, 0, 400, 300);
    let first_ne = first_overlay(&t, &f, ne);
    assert!(first_ne.x >= frame.right() && first_ne.bottom() <= frame.y);
    let first_sw = first_overlay(&t, &f, sw);
    assert!(first_sw.right() <= frame.x && first_sw.y >= frame.bottom());
    assert!(!first_ne.overlaps(&frame));
    assert!(!first_sw.overlaps(&frame));
}

#[tokio::test(start_paused = true)]
async fn queue_restarts_after_shutdown_spares_a_frame() {
    let t = TestShell::new(Config::default()).unwrap();
    let f = shown_frame(&t);
    f.set_closing_confirmation(Some("Keep working?".into()));
    t.prompt.set_answer(false);
    let mut cursor = t.shell.subscribe();
    let first = f
        .notify("long lived message", 60_000, Exit::N, ArrowSide::Top, None)
        .unwrap();
    wait_event(&mut cursor, 10_000, |e| {
        is_phase(e, |p| matches!(p, NotificationPhase::Visible { .. }))
    })
    .await
    .unwrap();

    t.shell.shutdown().await;
    sleep(Duration::from_millis(10)).await;
    assert!(f.is_open());
    assert_eq!(f.active_notification(), None);
    assert!(!f.is_notifying());
    assert_eq!(t.surfaces.overlays(f.id()).last(), Some(&(first, None)));

    let second = f
        .notify("second message here", 100, Exit::N, ArrowSide::Top, None)
        .unwrap();
    let appeared = wait_event(&mut cursor, 10_000, |e| {
        matches!(
            e,
            ChromeEvent::Notification {
                id,
                phase: NotificationPhase::Appearing,
                ..
            } if *id == second
        )
    })
    .await;
    assert!(appeared.is_some());
}
