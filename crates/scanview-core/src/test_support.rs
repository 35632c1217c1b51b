//! Hand-built TIFF fixtures for unit tests.

/// One uncompressed 8-bit grayscale page.
pub(crate) struct TiffPage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TiffPage {
    pub fn solid(width: u32, height: u32, value: u8) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; (width * height) as usize],
        }
    }
}

const ENTRY_COUNT: u16 = 9;
const IFD_SIZE: u32 = 2 + ENTRY_COUNT as u32 * 12 + 4;

struct Writer {
    out: Vec<u8>,
    little_endian: bool,
}

impl Writer {
    fn u16(&mut self, v: u16) {
        if self.little_endian {
            self.out.extend_from_slice(&v.to_le_bytes());
        } else {
            self.out.extend_from_slice(&v.to_be_bytes());
        }
    }

    fn u32(&mut self, v: u32) {
        if self.little_endian {
            self.out.extend_from_slice(&v.to_le_bytes());
        } else {
            self.out.extend_from_slice(&v.to_be_bytes());
        }
    }

    fn short_entry(&mut self, tag: u16, value: u16) {
        self.u16(tag);
        self.u16(3);
        self.u32(1);
        self.u16(value);
        self.u16(0);
    }

    fn long_entry(&mut self, tag: u16, value: u32) {
        self.u16(tag);
        self.u16(4);
        self.u32(1);
        self.u32(value);
    }
}

/// Build a (possibly multi-page) grayscale TIFF. Each page is laid out as
/// its IFD followed directly by its single strip.
pub(crate) fn gray_tiff(pages: &[TiffPage], little_endian: bool) -> Vec<u8> {
    let mut w = Writer {
        out: Vec::new(),
        little_endian,
    };

    if little_endian {
        w.out.extend_from_slice(b"II");
    } else {
        w.out.extend_from_slice(b"MM");
    }
    w.u16(42);
    w.u32(if pages.is_empty() { 0 } else { 8 });

    let mut offset = 8u32;
    for (i, page) in pages.iter().enumerate() {
        let data_offset = offset + IFD_SIZE;
        let data_len = page.pixels.len() as u32;
        let next = if i + 1 < pages.len() {
            data_offset + data_len
        } else {
            0
        };

        w.u16(ENTRY_COUNT);
        w.long_entry(256, page.width);
        w.long_entry(257, page.height);
        w.short_entry(258, 8);
        w.short_entry(259, 1);
        w.short_entry(262, 1);
        w.long_entry(273, data_offset);
        w.short_entry(277, 1);
        w.long_entry(278, page.height);
        w.long_entry(279, data_len);
        w.u32(next);
        w.out.extend_from_slice(&page.pixels);

        offset = data_offset + data_len;
    }

    w.out
}
