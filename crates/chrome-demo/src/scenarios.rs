//! Scripted scenarios. Each prints engine events as JSON lines on stdout.

use chrome_engine::{ArrowSide, ChromeEvent, EventCursor, Exit, NotificationPhase, Shell};
use chrome_geom::{Point, RectPx};
use tokio::time::{Duration, Instant, sleep};
use tracing::{debug, info};

use crate::{
    cli::{DanceArgs, DragArgs, NotifyArgs},
    error::Result,
};

/// Longest wait for a single event before a scenario gives up.
const EVENT_TIMEOUT: Duration = Duration::from_secs(120);

/// Print one event as a JSON line.
fn print_event(event: &ChromeEvent) -> Result<()> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

/// Print every buffered event.
fn flush(cursor: &mut EventCursor) -> Result<()> {
    for event in cursor.drain() {
        print_event(&event)?;
    }
    Ok(())
}

/// Text of `n` words, prefixed with the notification number.
fn message(index: usize, n: usize) -> String {
    let body = ["lorem", "ipsum", "dolor", "sit", "amet"];
    let words: Vec<&str> = body.iter().copied().cycle().take(n).collect();
    format!("#{index} {}", words.join(" "))
}

/// Queue a burst of notifications and follow them until all are gone.
pub async fn notify(shell: &Shell, args: &NotifyArgs) -> Result<()> {
    let frame = shell
        .frame("console")
        .console()
        .bounds(RectPx::new(200, 150, 800, 600))
        .build();
    frame.show();
    let mut cursor = shell.subscribe();

    let exits = [Exit::N, Exit::E, Exit::S, Exit::W, Exit::NE];
    let arrows = [ArrowSide::Top, ArrowSide::Right, ArrowSide::Bottom, ArrowSide::Left];
    for i in 0..args.count {
        let id = frame.notify(
            message(i + 1, args.words),
            args.duration_ms,
            exits[i % exits.len()],
            arrows[i % arrows.len()],
            None,
        )?;
        debug!(%id, "queued");
    }

    if let Some(ms) = args.kill_after_ms {
        let target = frame.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(ms)).await;
            target.kill_notifications();
        });
    }

    let mut finished = 0;
    while finished < args.count {
        let Some(event) = cursor.next_until(Instant::now() + EVENT_TIMEOUT).await else {
            break;
        };
        if let ChromeEvent::Notification { phase, .. } = &event
            && matches!(
                phase,
                NotificationPhase::Removed(_) | NotificationPhase::Redirected
            )
        {
            finished += 1;
        }
        print_event(&event)?;
    }
    info!(shown = finished, backlog = frame.notification_backlog().len(), "notify_done");
    Ok(())
}

/// Dance frames for a while and report where they ended up.
pub async fn dance(shell: &Shell, args: &DanceArgs) -> Result<()> {
    let mut cursor = shell.subscribe();
    let frames: Vec<_> = (0..args.frames)
        .map(|i| {
            let offset = i32::try_from(i).unwrap_or(0) * 90;
            let f = shell
                .frame(format!("dancer {i}"))
                .bounds(RectPx::new(100 + offset, 100 + offset, 320, 240))
                .build();
            f.show();
            f
        })
        .collect();
    shell.dance_all();
    sleep(Duration::from_millis(args.millis)).await;
    shell.stop_dancing();

    let moves = cursor
        .drain()
        .iter()
        .filter(|e| matches!(e, ChromeEvent::BoundsChanged { .. }))
        .count();
    for f in &frames {
        println!("{}", f.describe());
    }
    info!(moves, "dance_done");
    Ok(())
}

/// Drag a console; overlapping owner-pinned frames follow it.
pub async fn drag(shell: &Shell, args: &DragArgs) -> Result<()> {
    let console = shell
        .frame("console")
        .console()
        .bounds(RectPx::new(100, 100, 500, 400))
        .build();
    let attached = shell
        .frame("attached")
        .bounds(RectPx::new(400, 300, 300, 200))
        .build();
    let detached = shell
        .frame("detached")
        .bounds(RectPx::new(1200, 700, 300, 200))
        .build();
    for f in [&console, &attached, &detached] {
        f.show();
    }
    attached.set_pinned_to_owner(true);
    detached.set_pinned_to_owner(true);

    let mut cursor = shell.subscribe();
    let start = Point::new(console.bounds().cx(), console.bounds().y + 10);
    console.pointer_pressed(start);
    let steps = args.steps.max(1);
    for i in 1..=steps {
        let p = start.offset(args.dx * i / steps, args.dy * i / steps);
        console.pointer_dragged(p);
        sleep(Duration::from_millis(16)).await;
    }
    console.pointer_released(start.offset(args.dx, args.dy));
    flush(&mut cursor)?;
    for f in [&console, &attached, &detached] {
        println!("{}", f.describe());
    }
    Ok(())
}

/// Close one frame with the slide-off animation and one without.
pub async fn close(shell: &Shell) -> Result<()> {
    let slow = shell
        .frame("animated")
        .bounds(RectPx::new(200, 200, 400, 300))
        .build();
    let fast = shell
        .frame("instant")
        .bounds(RectPx::new(700, 600, 400, 300))
        .build();
    slow.show();
    fast.show();
    let mut cursor = shell.subscribe();
    let slow_outcome = slow.dispose(false).await;
    let fast_outcome = fast.dispose(true).await;
    flush(&mut cursor)?;
    info!(?slow_outcome, ?fast_outcome, "close_done");
    Ok(())
}
