//! GPIO to PWM slice mapping
//!
//! On the RP2040 every GPIO is hard-wired to one half of one PWM slice:
//! slice `(pin / 2) % 8`, channel A for even pins and B for odd pins.
//! Two pins sharing a slice also share its counter, so they always run
//! with the same period.

/// Half of a PWM slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmHalf {
    A,
    B,
}

/// PWM slice and channel driven by a GPIO
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmSlot {
    pub slice: u8,
    pub half: PwmHalf,
}

/// Number of user GPIOs on the RP2040
pub const GPIO_COUNT: u8 = 30;

/// Look up the PWM slot for a GPIO number
pub fn pwm_slot(pin: u8) -> Option<PwmSlot> {
    if pin >= GPIO_COUNT {
        return None;
    }
    let half = if pin % 2 == 0 { PwmHalf::A } else { PwmHalf::B };
    Some(PwmSlot {
        slice: (pin / 2) % 8,
        half,
    })
}
