use bytes::{BufMut, Bytes, BytesMut};
use lodestone_common::BlockPos;
use std::io;

/// Packet trait. Contains the packet ID and the function to write the packet.
pub trait Packet {
    /// Packet ID
    fn packet_id() -> i32
    where
        Self: Sized;

    /// Writes the packet, including its ID, to the buffer.
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> io::Result<()>;
}

/// Encodes a packet and prefixes it with its VarInt length, ready for the transport.
pub fn frame_packet<T: Packet>(packet: &T) -> io::Result<Bytes> {
    let mut body = PacketBuffer::new();
    packet.write_to_buffer(&mut body)?;

    let mut framed = PacketBuffer::new();
    framed.write_varint(body.len() as i32);
    framed.buffer.put_slice(&body.buffer);
    Ok(framed.freeze())
}

/// Growable outbound buffer.
#[derive(Debug, Default)]
pub struct PacketBuffer {
    buffer: BytesMut,
}

impl PacketBuffer {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn freeze(self) -> Bytes {
        self.buffer.freeze()
    }

    /// Writes a VarInt: 7 bits per byte, least significant group first, with
    /// the high bit set on every byte except the last.
    pub fn write_varint(&mut self, value: i32) {
        let mut value = value as u32;
        while value & !0x7F != 0 {
            self.buffer.put_u8((value & 0x7F) as u8 | 0x80);
            value >>= 7;
        }
        self.buffer.put_u8(value as u8);
    }

    /// Writes a VarInt length followed by the UTF-8 bytes.
    pub fn write_string(&mut self, value: &str) {
        self.write_varint(value.len() as i32);
        self.buffer.put_slice(value.as_bytes());
    }

    /// Writes a block position packed into one long: 26 bits x, 12 bits y, 26 bits z.
    pub fn write_position(&mut self, pos: BlockPos) {
        self.buffer.put_i64(pack_position(pos));
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buffer.put_i64(value);
    }
}

pub fn pack_position(pos: BlockPos) -> i64 {
    ((pos.x as i64 & 0x3FF_FFFF) << 38) | ((pos.y as i64 & 0xFFF) << 26) | (pos.z as i64 & 0x3FF_FFFF)
}

pub fn unpack_position(packed: i64) -> BlockPos {
    let x = packed >> 38;
    let y = (packed << 26) >> 52;
    let z = (packed << 38) >> 38;
    BlockPos::new(x as i32, y as i32, z as i32)
}
