use crate::packet::{Packet, PacketBuffer};
use lodestone_common::BlockPos;
use std::io;

/// Clientbound sign contents. Each line is a raw chat component, possibly empty or `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSign {
    pub location: BlockPos,
    pub lines: [String; 4],
}

/// Serverbound request to write a sign. Built only from validated lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSignRequest {
    pub location: BlockPos,
    pub lines: [String; 4],
}

impl Packet for UpdateSignRequest {
    fn packet_id() -> i32 {
        0x12
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> io::Result<()> {
        buffer.write_varint(Self::packet_id());
        buffer.write_position(self.location);
        for line in &self.lines {
            buffer.write_string(line);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::pack_position;

    #[test]
    fn test_write_update_sign_request() {
        let request = UpdateSignRequest {
            location: BlockPos::new(1, 2, 3),
            lines: ["a".into(), "".into(), "bc".into(), "".into()],
        };
        let mut buffer = PacketBuffer::new();
        request.write_to_buffer(&mut buffer).unwrap();

        let bytes = buffer.as_slice();
        assert_eq!(bytes[0], 0x12);
        assert_eq!(
            &bytes[1..9],
            &pack_position(BlockPos::new(1, 2, 3)).to_be_bytes()
        );
        assert_eq!(&bytes[9..], &[1, b'a', 0, 2, b'b', b'c', 0]);
    }
}
