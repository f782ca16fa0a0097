//! Interrupt-driven event system.
//!
//! Events are produced by:
//! - The PIR GPIO ISR (motion edges)
//! - The main loop's cadence checks (control and refresh firings)
//!
//! Events are consumed by the main control loop, which processes them
//! one at a time in FIFO order.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ PIR ISR     │────▶│              │     │              │
//! │ Scheduler   │────▶│  Event Queue │────▶│  Main Loop   │
//! │             │     │  (lock-free) │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 16;

/// System event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    /// PIR output changed level (ISR context).
    MotionEdge  = 0,
    /// Control cadence fired (1 Hz): sample, decide, actuate, render.
    ControlTick = 10,
    /// Refresh cadence fired (every 30 s): one weather attempt.
    RefreshTick = 20,
}

// ── Lock-free MPSC ring buffer ────────────────────────────────
//
// Two producer contexts exist: the PIR ISR and the main loop's cadence
// checks, and the ISR can preempt the loop mid-push. Producers therefore
// claim a slot with a CAS on the head index before writing it. Head and
// tail count monotonically (slot = index % CAP) so a stale CAS cannot
// alias a lap-behind index. Each slot doubles as its own publish flag:
// `SLOT_EMPTY` means claimed-but-unwritten (or free), so the single
// consumer parks on an unpublished slot and picks it up on the next
// drain instead of reading a torn cell.

const SLOT_EMPTY: u8 = 0xFF;

static EVENT_HEAD: AtomicUsize = AtomicUsize::new(0);
static EVENT_TAIL: AtomicUsize = AtomicUsize::new(0);
static EVENT_SLOTS: [AtomicU8; EVENT_QUEUE_CAP] =
    [const { AtomicU8::new(SLOT_EMPTY) }; EVENT_QUEUE_CAP];

/// Push an event into the queue.
/// Safe to call from ISR context and concurrently with the main loop's
/// own pushes (lock-free, multi-producer).
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    let mut head = EVENT_HEAD.load(Ordering::Relaxed);
    loop {
        if head.wrapping_sub(EVENT_TAIL.load(Ordering::Acquire)) >= EVENT_QUEUE_CAP {
            return false; // Queue full — drop event.
        }

        // Claim the slot first; losing the race just retries at the new head.
        match EVENT_HEAD.compare_exchange_weak(
            head,
            head.wrapping_add(1),
            Ordering::AcqRel,
            Ordering::Relaxed,
        ) {
            Ok(_) => {
                EVENT_SLOTS[head % EVENT_QUEUE_CAP].store(event as u8, Ordering::Release);
                return true;
            }
            Err(current) => head = current,
        }
    }
}

/// Pop the next event from the queue.
/// Called from the main loop (single consumer).
/// Returns `None` if the queue is empty, or if the next slot is claimed
/// but not yet published by a preempting producer.
pub fn pop_event() -> Option<Event> {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    let raw = EVENT_SLOTS[tail % EVENT_QUEUE_CAP].swap(SLOT_EMPTY, Ordering::Acquire);
    if raw == SLOT_EMPTY {
        return None; // Claimed, not yet written; retry on the next drain.
    }
    EVENT_TAIL.store(tail.wrapping_add(1), Ordering::Release);

    event_from_u8(raw)
}

/// Drain all pending events into a callback, in FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

/// Check if the event queue is empty.
pub fn queue_is_empty() -> bool {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);
    tail == head
}

/// Number of pending events (claimed slots count even before publish).
pub fn queue_len() -> usize {
    let head = EVENT_HEAD.load(Ordering::Relaxed);
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    head.wrapping_sub(tail)
}

// ── Internal ──────────────────────────────────────────────────

fn event_from_u8(raw: u8) -> Option<Event> {
    match raw {
        0 => Some(Event::MotionEdge),
        10 => Some(Event::ControlTick),
        20 => Some(Event::RefreshTick),
        _ => None,
    }
}
