//! Port implementations over `embedded-hal` 1.0 digital pins.
//!
//! The controller boards mix polarities: buttons are low-active behind
//! pull-ups, the door/lock sensors are high-active, the drive command
//! outputs are low-active, and the notification line is open-drain.
//! Polarity is normalised here so the core only ever sees positive
//! logic.
//!
//! Pin errors are swallowed (a failed read counts as deasserted, a
//! failed write is dropped): these paths run in interrupt context where
//! there is nothing useful to do with an I/O fault, and a stuck pin must
//! not take the physical controls down with it.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{ActuatorPort, DoorDrive, NotifyPort, SignalPort};
use crate::sampler::SignalId;

/// An input pin with its polarity.
pub struct Input<P> {
    pin: P,
    active_low: bool,
}

impl<P: InputPin> Input<P> {
    pub fn active_high(pin: P) -> Self {
        Self {
            pin,
            active_low: false,
        }
    }

    pub fn active_low(pin: P) -> Self {
        Self {
            pin,
            active_low: true,
        }
    }

    fn asserted(&mut self) -> bool {
        let high = self.pin.is_high().unwrap_or(self.active_low);
        high != self.active_low
    }
}

/// The four monitored inputs as one [`SignalPort`].
pub struct GpioSignals<G, R, D, L> {
    pub green: Input<G>,
    pub red: Input<R>,
    pub door_closed: Input<D>,
    pub lock_open: Input<L>,
}

impl<G, R, D, L> SignalPort for GpioSignals<G, R, D, L>
where
    G: InputPin,
    R: InputPin,
    D: InputPin,
    L: InputPin,
{
    fn read(&mut self, id: SignalId) -> bool {
        match id {
            SignalId::GreenButton => self.green.asserted(),
            SignalId::RedButton => self.red.asserted(),
            SignalId::DoorClosed => self.door_closed.asserted(),
            SignalId::LockOpen => self.lock_open.asserted(),
        }
    }
}

/// Drive commands and status LEDs as one [`ActuatorPort`].
///
/// The two command outputs are low-active; at most one is ever asserted.
pub struct GpioActuators<O, C, G, R> {
    pub cmd_open: O,
    pub cmd_close: C,
    pub led_green: G,
    pub led_red: R,
}

impl<O, C, G, R> ActuatorPort for GpioActuators<O, C, G, R>
where
    O: OutputPin,
    C: OutputPin,
    G: OutputPin,
    R: OutputPin,
{
    fn set_drive(&mut self, drive: DoorDrive) {
        match drive {
            DoorDrive::Neutral => {
                self.cmd_open.set_high().ok();
                self.cmd_close.set_high().ok();
            }
            DoorDrive::Open => {
                self.cmd_close.set_high().ok();
                self.cmd_open.set_low().ok();
            }
            DoorDrive::Close => {
                self.cmd_open.set_high().ok();
                self.cmd_close.set_low().ok();
            }
        }
    }

    fn set_indicators(&mut self, green: bool, red: bool) {
        if green {
            self.led_green.set_high().ok();
        } else {
            self.led_green.set_low().ok();
        }
        if red {
            self.led_red.set_high().ok();
        } else {
            self.led_red.set_low().ok();
        }
    }
}

/// The shared notification line over an open-drain output.
///
/// Driving low asserts the interrupt; driving high lets the pin float,
/// which is the listening (released) state of an open-drain output.
pub struct GpioNotify<P> {
    pub line: P,
}

impl<P: OutputPin> NotifyPort for GpioNotify<P> {
    fn assert(&mut self) {
        self.line.set_low().ok();
    }

    fn release(&mut self) {
        self.line.set_high().ok();
    }
}
