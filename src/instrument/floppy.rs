//! Floppy-drive instrument.
//!
//! Each drive is an oscillator: stepping the head back and forth at a
//! note's frequency makes the stepper motor sing. The drive owns two GPIO
//! outputs (STEP and DIRECTION) through `embedded_hal::digital::OutputPin`,
//! so the same code runs against ESP-IDF pin drivers and test doubles.
//!
//! ## Timing
//!
//! [`FloppyDrives::tick`] is called once per [`TIMER_RESOLUTION_US`]. A
//! sounding drive toggles STEP every `period` ticks (the half-period from
//! [`crate::notes::NOTE_DOUBLE_TICKS`]). Every toggle moves the head one
//! position; at either end of travel DIRECTION flips so the head bounces.
//!
//! Reset homes the head without blocking: the drive steps backwards once
//! every [`HOMING_TICKS`] until it reaches position 0.
//!
//! ## Start-up chime
//!
//! With `play_startup_sound` set, each drive in turn plays one note of
//! [`STARTUP_NOTES`] for [`STARTUP_NOTE_TICKS`], driven by the same `tick`
//! path. The first message from the controller cuts the chime short.
//!
//! [`TIMER_RESOLUTION_US`]: crate::config::TIMER_RESOLUTION_US

use embedded_hal::digital::OutputPin;
use heapless::Vec;
use log::{debug, info, trace};

use crate::app::commands::{BEND_CENTRE, DeviceCommand, SystemCommand};
use crate::app::ports::MessageConsumer;
use crate::config::{ALL_DRIVES, DeviceConfig, MAX_DRIVES, MAX_POSITION};
use crate::error::{ConfigError, Error, Result};
use crate::notes;

/// Full-scale pitch bend, in octaves (two semitones).
pub const BEND_OCTAVES: f32 = 2.0 / 12.0;

/// Ticks between homing steps (5 ms at 40 µs per tick).
pub const HOMING_TICKS: u16 = 125;

/// C major scale, one note per drive, wrapping.
pub const STARTUP_NOTES: [u8; 8] = [60, 62, 64, 65, 67, 69, 71, 72];

/// Length of each chime note (100 ms at 40 µs per tick).
pub const STARTUP_NOTE_TICKS: u32 = 2_500;

#[derive(Debug, Clone, Copy)]
struct Chime {
    drive: usize,
    remaining: u32,
}

/// One drive: a stepper head and its two control pins.
pub struct FloppyDrive<P> {
    step: P,
    direction: P,
    step_high: bool,
    reverse: bool,
    position: u8,
    /// Half-period of the note as played, before bend.
    original_period: u16,
    /// Half-period currently used by `tick`; 0 = silent.
    current_period: u16,
    tick_count: u16,
    homing: bool,
    pin_faults: u32,
}

impl<P: OutputPin> FloppyDrive<P> {
    pub fn new(step: P, direction: P) -> Self {
        let mut drive = Self {
            step,
            direction,
            step_high: false,
            reverse: false,
            position: 0,
            original_period: 0,
            current_period: 0,
            tick_count: 0,
            homing: false,
            pin_faults: 0,
        };
        set_pin(&mut drive.step, false, &mut drive.pin_faults);
        set_pin(&mut drive.direction, false, &mut drive.pin_faults);
        drive
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    /// Current half-period in ticks (0 when silent).
    pub fn period(&self) -> u16 {
        self.current_period
    }

    pub fn is_playing(&self) -> bool {
        self.current_period > 0
    }

    pub fn is_homing(&self) -> bool {
        self.homing
    }

    pub fn is_reversed(&self) -> bool {
        self.reverse
    }

    /// Pin writes that returned an error since start-up.
    pub fn pin_faults(&self) -> u32 {
        self.pin_faults
    }

    fn play(&mut self, period: u16) {
        self.original_period = period;
        self.current_period = period;
        self.tick_count = 0;
        self.homing = false;
    }

    fn stop(&mut self) {
        self.original_period = 0;
        self.current_period = 0;
    }

    fn bend(&mut self, value: u16) {
        if self.original_period == 0 {
            return;
        }
        let deflection = (f32::from(value) - f32::from(BEND_CENTRE)) / f32::from(BEND_CENTRE);
        let period = f32::from(self.original_period) / 2f32.powf(BEND_OCTAVES * deflection);
        self.current_period = period.round().clamp(1.0, f32::from(u16::MAX)) as u16;
    }

    fn reset(&mut self) {
        self.stop();
        self.tick_count = 0;
        self.homing = self.position > 0;
        self.set_reverse(self.homing);
    }

    pub fn tick(&mut self) {
        if self.homing {
            self.tick_count += 1;
            if self.tick_count >= HOMING_TICKS {
                self.tick_count = 0;
                self.home_step();
            }
            return;
        }

        if self.current_period == 0 {
            return;
        }

        self.tick_count += 1;
        if self.tick_count >= self.current_period {
            self.tick_count = 0;
            self.toggle_step();
        }
    }

    fn toggle_step(&mut self) {
        if self.position >= MAX_POSITION {
            self.set_reverse(true);
        } else if self.position == 0 {
            self.set_reverse(false);
        }

        if self.reverse {
            self.position -= 1;
        } else {
            self.position += 1;
        }

        self.step_high = !self.step_high;
        set_pin(&mut self.step, self.step_high, &mut self.pin_faults);
    }

    fn home_step(&mut self) {
        if self.position == 0 {
            self.homing = false;
            self.set_reverse(false);
            return;
        }
        self.set_reverse(true);
        self.position -= 1;
        self.step_high = !self.step_high;
        set_pin(&mut self.step, self.step_high, &mut self.pin_faults);
    }

    fn set_reverse(&mut self, reverse: bool) {
        if self.reverse != reverse {
            self.reverse = reverse;
            set_pin(&mut self.direction, reverse, &mut self.pin_faults);
        }
    }
}

fn set_pin<P: OutputPin>(pin: &mut P, high: bool, faults: &mut u32) {
    let res = if high { pin.set_high() } else { pin.set_low() };
    if res.is_err() {
        *faults = faults.wrapping_add(1);
    }
}

/// All drives of this device, addressed by sub-address.
pub struct FloppyDrives<P> {
    drives: Vec<FloppyDrive<P>, MAX_DRIVES>,
    first_sub_address: u8,
    sequence_running: bool,
    chime: Option<Chime>,
}

impl<P: OutputPin> FloppyDrives<P> {
    /// Build one drive per `(step, direction)` pair, in sub-address order.
    ///
    /// Exactly `config.drive_count()` pairs must be supplied.
    pub fn new<I>(config: &DeviceConfig, pins: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, P)>,
    {
        config.validate()?;
        let expected = config.drive_count();

        let mut drives = Vec::new();
        let mut got = 0;
        for (step, direction) in pins {
            got += 1;
            if got <= expected {
                drives
                    .push(FloppyDrive::new(step, direction))
                    .map_err(|_| Error::Init("drive table full"))?;
            }
        }
        if got != expected {
            return Err(ConfigError::DriveCountMismatch { expected, got }.into());
        }

        let mut this = Self {
            drives,
            first_sub_address: config.min_sub_address,
            sequence_running: false,
            chime: None,
        };
        if config.play_startup_sound {
            info!("floppy: playing start-up chime on {} drives", expected);
            this.chime = this.chime_note(0);
        }
        Ok(this)
    }

    pub fn drive(&self, sub_address: u8) -> Option<&FloppyDrive<P>> {
        let idx = sub_address.checked_sub(self.first_sub_address)? as usize;
        self.drives.get(idx)
    }

    pub fn drives(&self) -> &[FloppyDrive<P>] {
        &self.drives
    }

    pub fn is_sequence_running(&self) -> bool {
        self.sequence_running
    }

    pub fn is_chiming(&self) -> bool {
        self.chime.is_some()
    }

    /// Pin writes that failed across all drives.
    pub fn pin_faults(&self) -> u32 {
        self.drives
            .iter()
            .fold(0, |acc, d| acc.wrapping_add(d.pin_faults()))
    }

    /// Advance every drive by one timer period.
    pub fn tick(&mut self) {
        for drive in &mut self.drives {
            drive.tick();
        }
        self.advance_chime();
    }

    fn advance_chime(&mut self) {
        let Some(mut chime) = self.chime else {
            return;
        };
        chime.remaining = chime.remaining.saturating_sub(1);
        if chime.remaining > 0 {
            self.chime = Some(chime);
            return;
        }
        if let Some(drive) = self.drives.get_mut(chime.drive) {
            drive.stop();
        }
        self.chime = self.chime_note(chime.drive + 1);
        if self.chime.is_none() {
            debug!("floppy: start-up chime done");
        }
    }

    /// Start the chime note for drive index `idx`; `None` past the last drive.
    fn chime_note(&mut self, idx: usize) -> Option<Chime> {
        let period = notes::double_ticks(STARTUP_NOTES[idx % STARTUP_NOTES.len()])?;
        self.drives.get_mut(idx)?.play(period);
        Some(Chime {
            drive: idx,
            remaining: STARTUP_NOTE_TICKS,
        })
    }

    fn cancel_chime(&mut self) {
        if let Some(chime) = self.chime.take() {
            debug!("floppy: start-up chime interrupted");
            if let Some(drive) = self.drives.get_mut(chime.drive) {
                drive.stop();
            }
        }
    }

    /// Silence every drive without moving heads.
    pub fn halt_all(&mut self) {
        for drive in &mut self.drives {
            drive.stop();
        }
    }

    /// Silence every drive and send its head home.
    pub fn reset_all(&mut self) {
        for drive in &mut self.drives {
            drive.reset();
        }
    }

    fn for_each_target(&mut self, sub_address: u8, mut f: impl FnMut(&mut FloppyDrive<P>)) {
        if sub_address == ALL_DRIVES {
            self.drives.iter_mut().for_each(f);
            return;
        }
        let Some(idx) = sub_address.checked_sub(self.first_sub_address) else {
            return;
        };
        if let Some(drive) = self.drives.get_mut(idx as usize) {
            f(drive);
        }
    }
}

impl<P: OutputPin> MessageConsumer for FloppyDrives<P> {
    fn handle_system_message(&mut self, command: u8, payload: &[u8]) {
        self.cancel_chime();
        match SystemCommand::parse(command, payload) {
            SystemCommand::SequenceStart => {
                info!("floppy: sequence start");
                self.sequence_running = true;
            }
            SystemCommand::SequenceStop => {
                info!("floppy: sequence stop");
                self.sequence_running = false;
                self.halt_all();
            }
            SystemCommand::Reset => {
                info!("floppy: reset all drives");
                self.sequence_running = false;
                self.reset_all();
            }
            SystemCommand::Other(op) => trace!("floppy: system opcode 0x{:02X} ignored", op),
        }
    }

    fn handle_device_message(&mut self, sub_address: u8, command: u8, payload: &[u8]) {
        self.cancel_chime();
        match DeviceCommand::parse(command, payload) {
            DeviceCommand::Reset => self.for_each_target(sub_address, FloppyDrive::reset),
            DeviceCommand::NoteOff => self.for_each_target(sub_address, FloppyDrive::stop),
            DeviceCommand::NoteOn { note } => match notes::double_ticks(note) {
                Some(period) => self.for_each_target(sub_address, |d| d.play(period)),
                None => debug!("floppy: note {} out of range", note),
            },
            DeviceCommand::BendPitch { value } => {
                self.for_each_target(sub_address, |d| d.bend(value));
            }
            DeviceCommand::Malformed(op) => {
                debug!("floppy: opcode 0x{:02X} with short payload ({} bytes)", op, payload.len());
            }
            DeviceCommand::Other(op) => trace!("floppy: device opcode 0x{:02X} ignored", op),
        }
    }
}
