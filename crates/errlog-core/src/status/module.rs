//! Module identifiers for the 8-bit MODULE field.

use core::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Module(u8);

impl Module {
    #[inline]
    pub const fn new(id: u8) -> Self {
        Module(id)
    }

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    // ── Software layers ───────────────────────────────────────────

    pub const APPLICATION: Module = Module(0);
    pub const PLATFORM: Module = Module(1);
    pub const KERNEL: Module = Module(2);
    pub const NETWORK_STACK: Module = Module(3);
    pub const HAL: Module = Module(4);
    pub const MEMORY_SUBSYSTEM: Module = Module(5);
    pub const FILESYSTEM: Module = Module(6);
    pub const BLOCK_DEVICE: Module = Module(7);

    // ── Drivers ───────────────────────────────────────────────────

    pub const DRIVER: Module = Module(8);
    pub const DRIVER_SERIAL: Module = Module(9);
    pub const DRIVER_RTC: Module = Module(10);
    pub const DRIVER_I2C: Module = Module(11);
    pub const DRIVER_SPI: Module = Module(12);
    pub const DRIVER_GPIO: Module = Module(13);
    pub const DRIVER_ANALOG: Module = Module(14);
    pub const DRIVER_DIGITAL: Module = Module(15);
    pub const DRIVER_CAN: Module = Module(16);
    pub const DRIVER_ETHERNET: Module = Module(17);
    pub const DRIVER_CRC: Module = Module(18);
    pub const DRIVER_PWM: Module = Module(19);
    pub const DRIVER_QSPI: Module = Module(20);
    pub const DRIVER_USB: Module = Module(21);
    pub const DRIVER_WATCHDOG: Module = Module(22);

    // ── Other ─────────────────────────────────────────────────────

    pub const TARGET_SDK: Module = Module(23);
    pub const BLE: Module = Module(24);
    pub const NETWORK_STATS: Module = Module(25);

    /// Catch-all; used by the predefined statuses.
    pub const UNKNOWN: Module = Module(255);

    pub const fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::APPLICATION => "APPLICATION",
            Self::PLATFORM => "PLATFORM",
            Self::KERNEL => "KERNEL",
            Self::NETWORK_STACK => "NETWORK_STACK",
            Self::HAL => "HAL",
            Self::MEMORY_SUBSYSTEM => "MEMORY_SUBSYSTEM",
            Self::FILESYSTEM => "FILESYSTEM",
            Self::BLOCK_DEVICE => "BLOCK_DEVICE",
            Self::DRIVER => "DRIVER",
            Self::DRIVER_SERIAL => "DRIVER_SERIAL",
            Self::DRIVER_RTC => "DRIVER_RTC",
            Self::DRIVER_I2C => "DRIVER_I2C",
            Self::DRIVER_SPI => "DRIVER_SPI",
            Self::DRIVER_GPIO => "DRIVER_GPIO",
            Self::DRIVER_ANALOG => "DRIVER_ANALOG",
            Self::DRIVER_DIGITAL => "DRIVER_DIGITAL",
            Self::DRIVER_CAN => "DRIVER_CAN",
            Self::DRIVER_ETHERNET => "DRIVER_ETHERNET",
            Self::DRIVER_CRC => "DRIVER_CRC",
            Self::DRIVER_PWM => "DRIVER_PWM",
            Self::DRIVER_QSPI => "DRIVER_QSPI",
            Self::DRIVER_USB => "DRIVER_USB",
            Self::DRIVER_WATCHDOG => "DRIVER_WATCHDOG",
            Self::TARGET_SDK => "TARGET_SDK",
            Self::BLE => "BLE",
            Self::NETWORK_STATS => "NETWORK_STATS",
            Self::UNKNOWN => "UNKNOWN",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}({})", name, self.0),
            None => write!(f, "Module({})", self.0),
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_stable() {
        assert_eq!(Module::APPLICATION.as_u8(), 0);
        assert_eq!(Module::PLATFORM.as_u8(), 1);
        assert_eq!(Module::DRIVER_I2C.as_u8(), 11);
        assert_eq!(Module::UNKNOWN.as_u8(), 255);
    }

    #[test]
    fn test_display_and_debug() {
        assert_eq!(format!("{}", Module::FILESYSTEM), "FILESYSTEM");
        assert_eq!(format!("{:?}", Module::PLATFORM), "PLATFORM(1)");
        assert_eq!(format!("{}", Module::new(200)), "200");
    }
}
