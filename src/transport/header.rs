use crate::endpoint::EndpointError;

/// Size of a `ResponseHeader: fixed16` header.
pub const HEADER_LEN: usize = 16;

pub const STATUS_OK: u16 = 200;

/// Parsed fixed16 header: a three digit status, padding, the body length in
/// bytes and a newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeader {
    pub status: u16,
    pub length: usize,
}

impl ResponseHeader {
    pub fn parse(bytes: &[u8]) -> Result<Self, EndpointError> {
        let invalid = || EndpointError::InvalidHeader(String::from_utf8_lossy(bytes).into_owned());

        if bytes.len() != HEADER_LEN || bytes[HEADER_LEN - 1] != b'\n' {
            return Err(invalid());
        }
        let text = std::str::from_utf8(bytes).map_err(|_| invalid())?;

        let mut parts = text.split_whitespace();
        let status = parts
            .next()
            .filter(|s| s.len() == 3 && s.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|s| s.parse::<u16>().ok())
            .ok_or_else(invalid)?;
        let length = parts
            .next()
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self { status, length })
    }

    /// Renders a header the way a monitor would send it.
    pub fn render(&self) -> String {
        format!("{:03} {:<11}\n", self.status, self.length)
    }
}
