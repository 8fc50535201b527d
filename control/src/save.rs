use crc::{Crc, CRC_16_USB};

/// Persisted parameters of the controller.
///
/// The live input is measured, not persisted, hence it is missing here.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Save {
    pub setpoint: f32,
    pub output: f32,
    pub mode: u8,
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    pub direction: u8,
}

impl Default for Save {
    fn default() -> Self {
        Self {
            setpoint: 25.0,
            output: 0.0,
            mode: 0,
            kp: 2.0,
            ki: 0.5,
            kd: 2.0,
            direction: 0,
        }
    }
}

impl Save {
    const SIZE: usize = 5 * 4 + 2;

    fn from_bytes(bytes: [u8; Self::SIZE]) -> Self {
        let mut reader = Reader::new(&bytes);
        Self {
            setpoint: reader.f32(),
            output: reader.f32(),
            kp: reader.f32(),
            ki: reader.f32(),
            kd: reader.f32(),
            mode: reader.u8(),
            direction: reader.u8(),
        }
    }

    fn to_bytes(self) -> [u8; Self::SIZE] {
        let mut bytes = [0; Self::SIZE];
        let mut writer = Writer::new(&mut bytes);
        writer.put(&self.setpoint.to_le_bytes());
        writer.put(&self.output.to_le_bytes());
        writer.put(&self.kp.to_le_bytes());
        writer.put(&self.ki.to_le_bytes());
        writer.put(&self.kd.to_le_bytes());
        writer.put(&[self.mode, self.direction]);
        bytes
    }
}

// This constant is used to invalidate data when needed
const TOKEN: u16 = 1;
const CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_USB);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidData;

/// Save wrapped with its version and checksum, as laid out in EEPROM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Store {
    version: u32,
    token: u16,
    save_raw: [u8; Save::SIZE],
    crc: u16,
}

impl Store {
    pub const SIZE: usize = 4 + 2 + Save::SIZE + 2;

    #[must_use]
    pub fn new(save: Save, version: u32) -> Self {
        let save_raw = save.to_bytes();
        let crc = CRC.checksum(&save_raw);
        Self {
            version,
            save_raw,
            crc,
            token: TOKEN,
        }
    }

    /// # Errors
    ///
    /// This fails with `InvalidData` when recovered save does not pass CRC
    /// check.
    pub fn from_bytes(bytes: [u8; Self::SIZE]) -> Result<Self, InvalidData> {
        let mut reader = Reader::new(&bytes);
        let version = reader.u32();
        let token = reader.u16();
        let mut save_raw = [0; Save::SIZE];
        save_raw.copy_from_slice(reader.take(Save::SIZE));
        let crc = reader.u16();

        if token != TOKEN {
            return Err(InvalidData);
        }

        if CRC.checksum(&save_raw) == crc {
            Ok(Self {
                version,
                token,
                save_raw,
                crc,
            })
        } else {
            Err(InvalidData)
        }
    }

    #[must_use]
    pub fn to_bytes(self) -> [u8; Self::SIZE] {
        let mut bytes = [0; Self::SIZE];
        let mut writer = Writer::new(&mut bytes);
        writer.put(&self.version.to_le_bytes());
        writer.put(&self.token.to_le_bytes());
        writer.put(&self.save_raw);
        writer.put(&self.crc.to_le_bytes());
        bytes
    }

    #[must_use]
    pub fn save(&self) -> Save {
        Save::from_bytes(self.save_raw)
    }

    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }
}

/// Cursor over a buffer whose length is known upfront.
struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn take(&mut self, len: usize) -> &'a [u8] {
        let (head, tail) = self.bytes.split_at(len.min(self.bytes.len()));
        self.bytes = tail;
        head
    }

    fn array<const N: usize>(&mut self) -> [u8; N] {
        let mut array = [0; N];
        let head = self.take(N);
        array[..head.len()].copy_from_slice(head);
        array
    }

    fn u8(&mut self) -> u8 {
        self.array::<1>()[0]
    }

    fn u16(&mut self) -> u16 {
        u16::from_le_bytes(self.array())
    }

    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.array())
    }

    fn f32(&mut self) -> f32 {
        f32::from_le_bytes(self.array())
    }
}

struct Writer<'a> {
    bytes: &'a mut [u8],
    position: usize,
}

impl<'a> Writer<'a> {
    fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    fn put(&mut self, data: &[u8]) {
        let end = (self.position + data.len()).min(self.bytes.len());
        let len = end - self.position;
        self.bytes[self.position..end].copy_from_slice(&data[..len]);
        self.position = end;
    }
}
