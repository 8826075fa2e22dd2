//! Binary buffer writer with auto-growing capacity.

/// Appends big-endian primitives to a buffer that grows as needed.
///
/// # Example
///
/// ```
/// use typed_pack_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0x01);
/// writer.u16(0x0203);
/// let data = writer.flush();
/// assert_eq!(data, [0x01, 0x02, 0x03]);
/// ```
#[derive(Debug, Clone)]
pub struct Writer {
    /// The underlying byte buffer.
    pub uint8: Vec<u8>,
    /// Position where last flush happened.
    pub x0: usize,
    /// Current cursor position.
    pub x: usize,
    alloc_size: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a new writer with the default allocation size (4 KiB).
    pub fn new() -> Self {
        Self::with_alloc_size(4 * 1024)
    }

    /// Creates a new writer with a custom allocation size.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        Self {
            uint8: vec![0u8; alloc_size],
            x0: 0,
            x: 0,
            alloc_size,
        }
    }

    /// Ensures at least `capacity` bytes are available after the cursor.
    ///
    /// Growing drops everything before the last flush point.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let remaining = self.uint8.len() - self.x;
        if remaining < capacity {
            let total = self.uint8.len() - self.x0;
            let total_required = total + (capacity - remaining);
            let new_size = if total_required <= self.alloc_size {
                self.alloc_size
            } else {
                total_required * 2
            };
            self.grow(new_size);
        }
    }

    fn grow(&mut self, new_size: usize) {
        let pending = self.x - self.x0;
        let mut new_buf = vec![0u8; new_size];
        new_buf[..pending].copy_from_slice(&self.uint8[self.x0..self.x]);
        self.uint8 = new_buf;
        self.x = pending;
        self.x0 = 0;
    }

    /// Discards anything written since the last flush.
    pub fn reset(&mut self) {
        self.x = self.x0;
    }

    /// Number of bytes written since the last flush.
    pub fn pending(&self) -> usize {
        self.x - self.x0
    }

    /// Returns the bytes written since the last flush and advances the flush
    /// position.
    pub fn flush(&mut self) -> Vec<u8> {
        let result = self.uint8[self.x0..self.x].to_vec();
        self.x0 = self.x;
        result
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.ensure_capacity(1);
        self.uint8[self.x] = val;
        self.x += 1;
    }

    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.ensure_capacity(2);
        self.uint8[self.x..self.x + 2].copy_from_slice(&val.to_be_bytes());
        self.x += 2;
    }

    /// Writes a marker byte followed by a big-endian `u16`.
    pub fn u8u16(&mut self, marker: u8, val: u16) {
        self.ensure_capacity(3);
        self.uint8[self.x] = marker;
        self.uint8[self.x + 1..self.x + 3].copy_from_slice(&val.to_be_bytes());
        self.x += 3;
    }

    /// Writes a marker byte followed by a big-endian `u32`.
    pub fn u8u32(&mut self, marker: u8, val: u32) {
        self.ensure_capacity(5);
        self.uint8[self.x] = marker;
        self.uint8[self.x + 1..self.x + 5].copy_from_slice(&val.to_be_bytes());
        self.x += 5;
    }

    /// Writes a marker byte followed by a big-endian `u64`.
    pub fn u8u64(&mut self, marker: u8, val: u64) {
        self.ensure_capacity(9);
        self.uint8[self.x] = marker;
        self.uint8[self.x + 1..self.x + 9].copy_from_slice(&val.to_be_bytes());
        self.x += 9;
    }

    /// Writes a marker byte followed by a big-endian `f32`.
    pub fn u8f32(&mut self, marker: u8, val: f32) {
        self.ensure_capacity(5);
        self.uint8[self.x] = marker;
        self.uint8[self.x + 1..self.x + 5].copy_from_slice(&val.to_be_bytes());
        self.x += 5;
    }

    /// Writes a marker byte followed by a big-endian `f64`.
    pub fn u8f64(&mut self, marker: u8, val: f64) {
        self.ensure_capacity(9);
        self.uint8[self.x] = marker;
        self.uint8[self.x + 1..self.x + 9].copy_from_slice(&val.to_be_bytes());
        self.x += 9;
    }

    /// Writes a byte slice.
    pub fn buf(&mut self, buf: &[u8]) {
        let length = buf.len();
        self.ensure_capacity(length);
        self.uint8[self.x..self.x + length].copy_from_slice(buf);
        self.x += length;
    }

    /// Writes a UTF-8 string. Returns the number of bytes written.
    pub fn utf8(&mut self, s: &str) -> usize {
        self.buf(s.as_bytes());
        s.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8_u16() {
        let mut writer = Writer::new();
        writer.u8(0x01);
        writer.u16(0x0203);
        assert_eq!(writer.flush(), [0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_marker_pairs() {
        let mut writer = Writer::new();
        writer.u8u16(0xcd, 0x0100);
        writer.u8u32(0xce, 0x0001_0000);
        writer.u8u64(0xcf, 1);
        assert_eq!(
            writer.flush(),
            [
                0xcd, 0x01, 0x00, 0xce, 0x00, 0x01, 0x00, 0x00, 0xcf, 0, 0, 0, 0, 0, 0, 0, 1
            ]
        );
    }

    #[test]
    fn test_marker_floats() {
        let mut writer = Writer::new();
        writer.u8f32(0xca, 1.0);
        writer.u8f64(0xcb, 1.0);
        assert_eq!(
            writer.flush(),
            [0xca, 0x3f, 0x80, 0x00, 0x00, 0xcb, 0x3f, 0xf0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_flush_multiple() {
        let mut writer = Writer::new();
        writer.u8(0x01);
        assert_eq!(writer.flush(), [0x01]);
        writer.u8(0x02);
        assert_eq!(writer.flush(), [0x02]);
    }

    #[test]
    fn test_reset_discards_pending() {
        let mut writer = Writer::new();
        writer.u8(0x01);
        writer.flush();
        writer.utf8("abc");
        assert_eq!(writer.pending(), 3);
        writer.reset();
        assert_eq!(writer.pending(), 0);
        assert!(writer.flush().is_empty());
    }

    #[test]
    fn test_grows_past_alloc_size() {
        let mut writer = Writer::with_alloc_size(4);
        let payload: Vec<u8> = (0..=255).collect();
        writer.u8(0xc5);
        writer.buf(&payload);
        let data = writer.flush();
        assert_eq!(data.len(), 257);
        assert_eq!(data[0], 0xc5);
        assert_eq!(&data[1..], &payload[..]);
    }

    #[test]
    fn test_utf8_returns_byte_len() {
        let mut writer = Writer::new();
        let n = writer.utf8("café");
        let data = writer.flush();
        assert_eq!(n, 5);
        assert_eq!(std::str::from_utf8(&data).unwrap(), "café");
    }
}
