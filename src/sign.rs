use lodestone_common::{BlockPos, LodestoneError, Result};
use lodestone_protocol::UpdateSignRequest;

pub const MAX_SIGN_LINES: usize = 4;
pub const MAX_LINE_LENGTH: usize = 15;

/// Checks `lines` against the sign limits and builds the outbound request,
/// padding missing lines with empty strings.
pub fn sign_write_request<S: AsRef<str>>(
    location: BlockPos,
    lines: &[S],
) -> Result<UpdateSignRequest> {
    if lines.len() > MAX_SIGN_LINES {
        return Err(LodestoneError::InvalidSignText(format!(
            "a sign holds at most {} lines, got {}",
            MAX_SIGN_LINES,
            lines.len()
        )));
    }

    let mut padded: [String; MAX_SIGN_LINES] = Default::default();
    for (index, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let length = line.chars().count();
        if length > MAX_LINE_LENGTH {
            return Err(LodestoneError::InvalidSignText(format!(
                "line {} is {} characters long, the limit is {}",
                index + 1,
                length,
                MAX_LINE_LENGTH
            )));
        }
        padded[index] = line.to_string();
    }

    Ok(UpdateSignRequest {
        location,
        lines: padded,
    })
}
