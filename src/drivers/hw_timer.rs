//! Instrument tick timer using ESP-IDF's esp_timer API.
//!
//! A periodic timer fires every [`TIMER_RESOLUTION_US`], bumps a lock-free
//! pending-tick counter and notifies the task that started it. That task
//! blocks in [`wait_for_tick`] between ticks, drains the counter and calls
//! [`FloppyDrives::tick`](crate::instrument::FloppyDrives::tick) once per
//! pending tick, so all drive state stays in the single main-loop context
//! and the idle task still gets to run. On simulation targets the timer is
//! not started and ticks are recorded by hand.
//!
//! [`TIMER_RESOLUTION_US`]: crate::config::TIMER_RESOLUTION_US

use core::sync::atomic::{AtomicU32, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use core::sync::atomic::AtomicPtr;

use crate::error::Error;

static PENDING_TICKS: AtomicU32 = AtomicU32::new(0);

/// Task woken on every tick; null until [`start_timer`] runs.
#[cfg(target_os = "espidf")]
static TICK_TASK: AtomicPtr<tskTaskControlBlock> = AtomicPtr::new(core::ptr::null_mut());

/// Record one elapsed timer period. Safe from the timer task.
pub fn record_tick() {
    PENDING_TICKS.fetch_add(1, Ordering::Relaxed);
}

/// Take every tick recorded since the last call.
pub fn take_pending_ticks() -> u32 {
    PENDING_TICKS.swap(0, Ordering::AcqRel)
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb(_arg: *mut core::ffi::c_void) {
    record_tick();
    let task = TICK_TASK.load(Ordering::Acquire);
    if !task.is_null() {
        // SAFETY: the handle belongs to the task that started the timer,
        // which lives for the lifetime of the firmware.
        unsafe {
            let _ = esp_idf_hal::task::notify(task, core::num::NonZeroU32::MIN);
        }
    }
}

/// Start the periodic instrument tick.
///
/// The calling task is the one woken by [`wait_for_tick`].
#[cfg(target_os = "espidf")]
pub fn start_timer() -> Result<(), Error> {
    use crate::config::TIMER_RESOLUTION_US;

    let task = esp_idf_hal::task::current().ok_or(Error::Init("tick timer needs a task context"))?;
    TICK_TASK.store(task, Ordering::Release);

    let args = esp_timer_create_args_t {
        callback: Some(tick_cb),
        arg: core::ptr::null_mut(),
        dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
        name: c"floppy_tick".as_ptr(),
        skip_unhandled_events: true,
    };
    let mut handle: esp_timer_handle_t = core::ptr::null_mut();

    // SAFETY: `args` outlives the call and `handle` is a valid out-pointer.
    // The callback only touches atomics and notifies a live task. The handle
    // is never deleted, so the timer runs for the lifetime of the firmware.
    unsafe {
        if esp_timer_create(&args, &mut handle) != ESP_OK as esp_err_t {
            return Err(Error::Init("tick timer create failed"));
        }
        if esp_timer_start_periodic(handle, TIMER_RESOLUTION_US) != ESP_OK as esp_err_t {
            return Err(Error::Init("tick timer start failed"));
        }
    }

    info!("hw_timer: tick every {} us", TIMER_RESOLUTION_US);
    Ok(())
}

/// Block the calling task until the tick timer fires.
#[cfg(target_os = "espidf")]
pub fn wait_for_tick() {
    let _ = esp_idf_hal::task::wait_notification(esp_idf_hal::delay::BLOCK);
}

#[cfg(not(target_os = "espidf"))]
pub fn start_timer() -> Result<(), Error> {
    log::info!("hw_timer(sim): timer not started, ticks are recorded manually");
    Ok(())
}
