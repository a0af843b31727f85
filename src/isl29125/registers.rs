//! Register addresses and bit layouts.  Every control register is treated as a set of named
//! [`Field`]s so a single setting can be changed without disturbing its neighbours.

pub const REG_DEVICE_ID: u8 = 0x00;
pub const REG_CONFIG1: u8 = 0x01;
pub const REG_CONFIG2: u8 = 0x02;
pub const REG_CONFIG3: u8 = 0x03;
pub const REG_LOW_THRESHOLD: u8 = 0x04;
pub const REG_HIGH_THRESHOLD: u8 = 0x06;
pub const REG_STATUS: u8 = 0x08;
pub const REG_GREEN: u8 = 0x09;
pub const REG_RED: u8 = 0x0B;
pub const REG_BLUE: u8 = 0x0D;

/// Written to [`REG_DEVICE_ID`] to reset every register to its power-on value.
pub const RESET_COMMAND: u8 = 0x46;

/// A contiguous run of bits inside a one byte register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    shift: u8,
    width: u8,
}

impl Field {
    pub const fn new(shift: u8, width: u8) -> Self {
        Self { shift, width }
    }

    pub const fn mask(self) -> u8 {
        (((1u16 << self.width) - 1) as u8) << self.shift
    }

    pub const fn get(self, register: u8) -> u8 {
        (register & self.mask()) >> self.shift
    }

    /// Replaces only the bits owned by this field.  Bits of `value` wider than the field are
    /// discarded.
    pub const fn set(self, register: u8, value: u8) -> u8 {
        (register & !self.mask()) | ((value << self.shift) & self.mask())
    }

    pub const fn is_set(self, register: u8) -> bool {
        self.get(register) != 0
    }
}

// CONFIG1
pub const OPERATING_MODE: Field = Field::new(0, 3);
pub const RANGE: Field = Field::new(3, 1);
pub const RESOLUTION: Field = Field::new(4, 1);
pub const SYNC: Field = Field::new(5, 1);

// CONFIG2, bit 6 is reserved
pub const IR_ADJUST: Field = Field::new(0, 6);
pub const IR_OFFSET: Field = Field::new(7, 1);

// CONFIG3
pub const IRQ_COLOR: Field = Field::new(0, 2);
pub const PERSISTENCE: Field = Field::new(2, 2);
pub const IRQ_ON_CONVERSION: Field = Field::new(4, 1);

// STATUS
pub const STATUS_IRQ: Field = Field::new(0, 1);
pub const STATUS_CONVERSION_DONE: Field = Field::new(1, 1);
pub const STATUS_BROWNOUT: Field = Field::new(2, 1);
pub const STATUS_ACTIVE_CHANNEL: Field = Field::new(4, 2);
