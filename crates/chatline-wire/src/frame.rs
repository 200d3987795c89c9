use crate::error::WireError;

/// Literal prefix that marks a line as carrying a JSON record.
///
/// Only the exact six bytes `data: ` count. `data:` without the space, or
/// any leading whitespace, makes the line an ignored non-data line.
pub const DATA_PREFIX: &str = "data: ";

/// Return the payload of a `data: ` line, or `None` for any other line.
///
/// Blank keep-alive lines, `event:` / `id:` fields and `:` comments all
/// return `None`.
#[must_use]
pub fn data_payload(line: &str) -> Option<&str> {
    line.strip_prefix(DATA_PREFIX)
}

/// Append one `data: <payload>\n` line to `buf`.
///
/// # Errors
///
/// Returns [`WireError::EmbeddedNewline`] if `payload` contains `\n`;
/// nothing is written in that case.
pub fn write_data_line(buf: &mut String, payload: &str) -> Result<(), WireError> {
    if let Some(offset) = payload.find('\n') {
        return Err(WireError::EmbeddedNewline { offset });
    }
    buf.push_str(DATA_PREFIX);
    buf.push_str(payload);
    buf.push('\n');
    Ok(())
}
