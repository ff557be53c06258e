use std::sync::Arc;

use chrome_engine::{
    ArrowSide, ChromeEvent, DisposeOutcome, Error, Exit, FrameId, FrameKind, Lifecycle, PaintOp,
    PinLink, PinMode, PointerOutcome,
    test_support::{SurfaceCall, TestShell, wait_event},
};
use chrome_geom::{ChromeButton, ChromeLayout, Direction, Point, RectPx, Size, SizeLimits};
use config::{Config, Rgb};
use futures::future::join;
use parking_lot::Mutex;
use tokio::time::{Duration, sleep};

#[tokio::test(start_paused = true)]
async fn second_dispose_is_a_no_op() {
    let t = TestShell::new(Config::default()).unwrap();
    let f = t.shell.frame("a").build();
    f.show();
    assert_eq!(f.dispose(false).await, DisposeOutcome::Disposed);
    assert_eq!(f.dispose(false).await, DisposeOutcome::AlreadyDisposed);
    assert_eq!(f.lifecycle(), Lifecycle::Disposed);
    assert_eq!(t.owner.disposed(), vec![f.id()]);
    assert!(t.shell.frames().is_empty());
    let releases = t
        .surfaces
        .calls()
        .iter()
        .filter(|c| **c == SurfaceCall::Release(f.id()))
        .count();
    assert_eq!(releases, 1);
}

#[tokio::test(start_paused = true)]
async fn concurrent_dispose_runs_once() {
    let t = TestShell::new(Config::default()).unwrap();
    let f = t.shell.frame("a").build();
    f.show();
    let g = f.clone();
    let (a, b) = join(f.dispose(false), g.dispose(true)).await;
    let mut outcomes = [a, b];
    outcomes.sort_by_key(|o| *o == DisposeOutcome::AlreadyDisposed);
    assert_eq!(
        outcomes,
        [DisposeOutcome::Disposed, DisposeOutcome::AlreadyDisposed]
    );
    assert_eq!(t.owner.disposed().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn declined_confirmation_keeps_frame_open() {
    let t = TestShell::new(Config::default()).unwrap();
    let f = t.shell.frame("editor").build();
    f.show();
    let ran = Arc::new(Mutex::new(Vec::new()));
    let r = ran.clone();
    f.add_pre_close_action(move || r.lock().push("pre"));
    f.set_closing_confirmation(Some("Discard changes?".into()));
    t.prompt.set_answer(false);

    assert_eq!(f.dispose(false).await, DisposeOutcome::Declined);
    assert!(f.is_open());
    assert!(ran.lock().is_empty());
    assert!(!t.surfaces.released(f.id()));
    f.set_location(Point::new(10, 10));
    assert_eq!(f.bounds().origin(), Point::new(10, 10));

    t.prompt.set_answer(true);
    assert_eq!(f.dispose(true).await, DisposeOutcome::Disposed);
    assert_eq!(t.prompt.asked(), 2);
    assert_eq!(*ran.lock(), vec!["pre"]);
}

#[tokio::test(start_paused = true)]
async fn close_actions_bracket_the_teardown() {
    let t = TestShell::new(Config::default()).unwrap();
    let f = t.shell.frame("a").build();
    f.show();
    let log = Arc::new(Mutex::new(Vec::new()));
    let (pre, post) = (log.clone(), log.clone());
    let (s1, s2) = (t.surfaces.clone(), t.surfaces.clone());
    let id = f.id();
    f.add_pre_close_action(move || pre.lock().push(("pre", s1.released(id))));
    f.add_post_close_action(move || post.lock().push(("post", s2.released(id))));
    f.add_pre_close_action(|| panic!("hook failure"));
    f.notify("pending", 0, Exit::N, ArrowSide::Top, None).unwrap();

    let mut cursor = t.shell.subscribe();
    assert_eq!(f.dispose(true).await, DisposeOutcome::Disposed);
    assert_eq!(*log.lock(), vec![("pre", false), ("post", true)]);

    let events = cursor.drain();
    let pos = |want: fn(&ChromeEvent) -> bool| events.iter().position(want).unwrap();
    let started = pos(|e| matches!(e, ChromeEvent::DisposeStarted { .. }));
    let killed = pos(|e| matches!(e, ChromeEvent::Notification { .. }));
    let disposed = pos(|e| matches!(e, ChromeEvent::FrameDisposed { .. }));
    assert!(started < killed && killed < disposed);
}

#[tokio::test(start_paused = true)]
async fn close_animation_slides_off_screen_unless_fast() {
    let screen = RectPx::new(0, 0, 1000, 800);
    let t = TestShell::with_screen(Config::default(), screen).unwrap();
    let top = t.shell.frame("top").bounds(RectPx::new(100, 50, 200, 200)).build();
    let bottom = t.shell.frame("bottom").bounds(RectPx::new(100, 500, 200, 200)).build();
    top.show();
    bottom.show();
    top.dispose(false).await;
    bottom.dispose(false).await;
    let last_bounds = |id: FrameId| {
        t.surfaces
            .calls()
            .iter()
            .rev()
            .find_map(|c| match c {
                SurfaceCall::Bounds(f, r) if *f == id => Some(*r),
                _ => None,
            })
    };
    assert_eq!(last_bounds(top.id()), Some(RectPx::new(100, -200, 200, 200)));
    assert_eq!(last_bounds(bottom.id()), Some(RectPx::new(100, 800, 200, 200)));

    t.prefs.update(|p| p.close_animation = false);
    let quiet = t.shell.frame("quiet").build();
    quiet.dispose(false).await;
    assert_eq!(last_bounds(quiet.id()), None);
}

#[tokio::test(start_paused = true)]
async fn notify_on_disposed_frame_fails() {
    let t = TestShell::new(Config::default()).unwrap();
    let f = t.shell.frame("a").build();
    f.dispose(true).await;
    assert_eq!(
        f.notify("hello", 0, Exit::N, ArrowSide::Top, None),
        Err(Error::FrameDisposed)
    );
    assert_eq!(f.pointer_pressed(Point::new(150, 110)), PointerOutcome::Ignored);
}

#[tokio::test(start_paused = true)]
async fn owner_drag_moves_only_overlapping_pinned_frames() {
    let t = TestShell::new(Config::default()).unwrap();
    let console = t
        .shell
        .frame("console")
        .console()
        .bounds(RectPx::new(100, 100, 400, 300))
        .build();
    let near = t.shell.frame("near").bounds(RectPx::new(300, 250, 200, 150)).build();
    let far = t.shell.frame("far").bounds(RectPx::new(1000, 700, 200, 150)).build();
    let loose = t.shell.frame("loose").bounds(RectPx::new(150, 150, 100, 100)).build();
    for f in [&console, &near, &far, &loose] {
        f.show();
    }
    near.set_pinned_to_owner(true);
    far.set_pinned_to_owner(true);
    loose.set_pinned(true);
    assert_eq!(t.shell.owner().map(|o| o.id()), Some(console.id()));
    assert_eq!(near.kind(), FrameKind::Child);

    assert_eq!(console.pointer_pressed(Point::new(300, 110)), PointerOutcome::DragStarted);
    let reg = t.shell.context().registry();
    assert_eq!(reg.pin_link(near.id()), Some(PinLink::Follow { dx: 200, dy: 150 }));
    assert_eq!(reg.pin_link(far.id()), Some(PinLink::Unrelated));
    assert_eq!(reg.pin_link(loose.id()), None);

    console.pointer_dragged(Point::new(350, 160));
    assert_eq!(console.bounds(), RectPx::new(150, 150, 400, 300));
    assert_eq!(near.bounds(), RectPx::new(350, 300, 200, 150));
    assert_eq!(loose.bounds(), RectPx::new(150, 150, 100, 100));

    // Moving the owner over the unrelated frame does not capture it.
    console.pointer_dragged(Point::new(1000, 710));
    assert_eq!(far.bounds(), RectPx::new(1000, 700, 200, 150));
    assert_eq!(near.bounds(), RectPx::new(1000, 850, 200, 150));

    assert_eq!(console.pointer_released(Point::new(1000, 710)), PointerOutcome::DragEnded);
    assert_eq!(reg.pin_link(near.id()), None);
}

#[tokio::test(start_paused = true)]
async fn owner_is_cleared_when_disposed() {
    let t = TestShell::new(Config::default()).unwrap();
    let first = t.shell.frame("first").console().build();
    let second = t.shell.frame("second").console().build();
    first.show();
    second.show();
    assert!(first.is_owner());
    assert!(!second.is_owner());
    first.dispose(true).await;
    assert_eq!(t.shell.owner().map(|o| o.id()), None);
    assert_eq!(t.owner.shown(), vec![first.id(), second.id()]);
}

#[tokio::test(start_paused = true)]
async fn west_resize_clamps_at_minimum_and_keeps_east_edge() {
    let t = TestShell::new(Config::default()).unwrap();
    let f = t
        .shell
        .frame("a")
        .bounds(RectPx::new(100, 100, 200, 200))
        .limits(SizeLimits::default())
        .build();
    f.show();
    assert_eq!(
        f.pointer_pressed(Point::new(101, 200)),
        PointerOutcome::ResizeStarted(Direction::W)
    );
    assert_eq!(
        f.pointer_dragged(Point::new(500, 200)),
        PointerOutcome::Resized(RectPx::new(200, 100, 100, 200))
    );
    assert_eq!(f.pointer_released(Point::new(500, 200)), PointerOutcome::ResizeEnded);
    assert_eq!(f.bounds().right(), 300);
}

#[tokio::test(start_paused = true)]
async fn resize_straddling_monitors_only_follows_the_pointer() {
    let t = TestShell::with_monitors(
        Config::default(),
        &[RectPx::new(0, 0, 1000, 1000), RectPx::new(1000, 0, 1000, 1000)],
    )
    .unwrap();
    let start = RectPx::new(700, 100, 400, 300);
    let f = t.shell.frame("wide").bounds(start).build();
    f.show();
    assert_eq!(
        f.pointer_pressed(Point::new(1098, 250)),
        PointerOutcome::ResizeStarted(Direction::E)
    );
    assert_eq!(
        f.pointer_dragged(Point::new(1098, 250)),
        PointerOutcome::Resized(start)
    );
    assert_eq!(
        f.pointer_dragged(Point::new(1060, 250)),
        PointerOutcome::Resized(RectPx::new(700, 100, 362, 300))
    );
    assert_eq!(f.pointer_released(Point::new(1060, 250)), PointerOutcome::ResizeEnded);
}

#[tokio::test(start_paused = true)]
async fn new_limits_reclamp_the_current_size() {
    let t = TestShell::new(Config::default()).unwrap();
    let f = t
        .shell
        .frame("a")
        .bounds(RectPx::new(100, 100, 400, 300))
        .build();
    f.show();
    let mut cursor = t.shell.subscribe();

    let shrunk = f.set_limits(SizeLimits::default().with_max(Size::new(250, 200)));
    assert_eq!(shrunk, RectPx::new(100, 100, 250, 200));
    assert_eq!(f.bounds(), shrunk);
    assert_eq!(f.limits().max(), Size::new(250, 200));
    assert_eq!(
        t.surfaces.calls().last(),
        Some(&SurfaceCall::Bounds(f.id(), shrunk))
    );

    let grown = f.set_limits(SizeLimits::default().with_min(Size::new(500, 400)));
    assert_eq!(grown, RectPx::new(100, 100, 500, 400));
    assert!(
        cursor
            .drain()
            .iter()
            .any(|e| matches!(e, ChromeEvent::BoundsChanged { .. }))
    );

    assert_eq!(f.set_bounds(RectPx::new(100, 100, 50, 50)).size(), Size::new(500, 400));
}

#[tokio::test(start_paused = true)]
async fn resize_gesture_refreshes_background_once() {
    let t = TestShell::new(Config::default()).unwrap();
    let f = t
        .shell
        .frame("a")
        .bounds(RectPx::new(100, 100, 200, 200))
        .refresh_background_on_resize(true)
        .build();
    f.show();
    let mut cursor = t.shell.subscribe();
    f.pointer_pressed(Point::new(298, 298));
    f.pointer_dragged(Point::new(350, 330));
    f.pointer_released(Point::new(350, 330));
    sleep(Duration::from_millis(100)).await;
    let refreshes = cursor
        .drain()
        .iter()
        .filter(|e| matches!(e, ChromeEvent::BackgroundRefreshed { .. }))
        .count();
    assert_eq!(refreshes, 1);
    assert_eq!(f.bounds(), RectPx::new(100, 100, 252, 232));
}

#[tokio::test(start_paused = true)]
async fn drag_disabled_frame_stays_put() {
    let t = TestShell::new(Config::default()).unwrap();
    let a = t.shell.frame("a").bounds(RectPx::new(0, 0, 300, 200)).build();
    a.show();
    a.set_drag_enabled(false);
    assert_eq!(a.pointer_pressed(Point::new(100, 10)), PointerOutcome::DragStarted);
    assert_eq!(a.pointer_dragged(Point::new(200, 10)), PointerOutcome::Ignored);
    assert_eq!(a.bounds().origin(), Point::new(0, 0));
}

#[tokio::test(start_paused = true)]
async fn title_bar_buttons_dispatch_actions() {
    let t = TestShell::new(Config::default()).unwrap();
    let f = t.shell.frame("a").bounds(RectPx::new(0, 0, 400, 300)).build();
    f.show();
    let (_, pin) = ChromeLayout::for_size(f.bounds().size(), Config::default().chrome)
        .buttons()[2];
    let at = Point::new(pin.cx(), pin.cy());
    assert_eq!(f.pointer_pressed(at), PointerOutcome::ButtonPressed(ChromeButton::Pin));
    let PointerOutcome::Action(button) = f.pointer_released(at) else {
        panic!("no action");
    };
    f.perform(button).await;
    assert_eq!(f.pin_mode(), PinMode::Screen);
    f.perform(ChromeButton::Pin).await;
    assert_eq!(f.pin_mode(), PinMode::Owner);
    f.perform(ChromeButton::Close).await;
    assert!(f.is_disposed());
}

#[tokio::test(start_paused = true)]
async fn minimize_then_restore() {
    let screen = RectPx::new(0, 0, 1000, 800);
    let t = TestShell::with_screen(Config::default(), screen).unwrap();
    let f = t.shell.frame("a").bounds(RectPx::new(100, 100, 300, 200)).build();
    f.show();
    let mut cursor = t.shell.subscribe();
    assert!(f.minimize_animation().await);
    assert!(f.is_iconified());
    assert_eq!(f.bounds(), RectPx::new(100, 800, 300, 200));
    assert_eq!(f.restore_point(), Point::new(100, 100));
    assert!(wait_event(&mut cursor, 100, |e| matches!(e, ChromeEvent::Iconified { .. }))
        .await
        .is_some());
    assert!(f.restore());
    assert_eq!(f.bounds(), RectPx::new(100, 100, 300, 200));
    assert!(!f.restore());
}

#[tokio::test(start_paused = true)]
async fn dance_stays_on_screen_and_stops_on_dispose() {
    let screen = RectPx::new(0, 0, 800, 600);
    let t = TestShell::with_screen(Config::default(), screen).unwrap();
    let f = t.shell.frame("a").bounds(RectPx::new(200, 200, 300, 200)).build();
    f.show();
    t.shell.dance_all();
    assert!(f.is_dancing());
    for _ in 0..50 {
        sleep(Duration::from_millis(20)).await;
        let b = f.bounds();
        assert!(b.x >= 0 && b.right() <= 800, "{b}");
        assert!(b.y >= 0 && b.bottom() <= 600, "{b}");
    }
    assert_ne!(f.bounds(), RectPx::new(200, 200, 300, 200));

    f.dispose(true).await;
    sleep(Duration::from_millis(200)).await;
    assert!(!f.is_dancing());
    assert!(t.surfaces.calls_after_release(f.id()).is_empty());
}

#[tokio::test(start_paused = true)]
async fn paint_reads_theme_and_preferences_each_time() {
    let t = TestShell::new(Config::default()).unwrap();
    let f = t.shell.frame("a").build();
    let radius = |ops: &[PaintOp]| match ops.first() {
        Some(PaintOp::FillRect { radius, .. }) => *radius,
        _ => -1,
    };
    let border = |ops: &[PaintOp]| {
        ops.iter().find_map(|op| match op {
            PaintOp::StrokeRect { color, .. } => Some(*color),
            _ => None,
        })
    };
    let before = f.paint();
    assert_eq!(radius(&before), 20);

    t.theme.set_accent("#ff0000");
    t.prefs.update(|p| p.rounded_window_corners = false);
    f.focus();
    let after = f.paint();
    assert_eq!(radius(&after), 0);
    assert_eq!(border(&after), Some(Rgb(255, 0, 0)));
}

#[tokio::test(start_paused = true)]
async fn shutdown_disposes_every_frame() {
    let t = TestShell::new(Config::default()).unwrap();
    for title in ["a", "b", "c"] {
        t.shell.frame(title).build().show();
    }
    t.shell.dance_all();
    t.shell.shutdown().await;
    assert!(t.shell.frames().is_empty());
    assert_eq!(t.owner.disposed().len(), 3);
    assert_eq!(t.shell.context().animator().active_count(), 0);
}
