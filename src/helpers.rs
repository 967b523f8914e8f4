use tokio::io::{AsyncRead, AsyncReadExt};

pub fn pad_message(message: &[u8], length: usize) -> Vec<u8> {
    let mut padded_message = Vec::with_capacity(length);
    padded_message.extend_from_slice(message);
    while padded_message.len() < length {
        padded_message.push(b' '); // Pad with spaces up to the desired length
    }
    padded_message
}

/// Reads until `buffer` is full or the reader hits EOF.
///
/// Returns the number of bytes placed in `buffer`; anything short of
/// `buffer.len()` means EOF was reached.
pub async fn read_full<R>(reader: &mut R, buffer: &mut [u8]) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buffer.len() {
        let n = reader.read(&mut buffer[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Splits a control message into whitespace-separated byte tokens.
///
/// The message ends at its first NUL, the terminator C clients send. Tokens
/// are left as raw bytes so file names that are not UTF-8 survive intact.
pub fn tokenize(message: &[u8]) -> Vec<&[u8]> {
    let end = message.iter().position(|&b| b == 0).unwrap_or(message.len());
    message[..end]
        .split(|&b| is_space(b))
        .filter(|token| !token.is_empty())
        .collect()
}

fn is_space(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == 0x0b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_message() {
        assert_eq!(pad_message(b"10", 4), b"10  ".to_vec());
        assert_eq!(pad_message(b"4092", 4), b"4092".to_vec());
        assert_eq!(pad_message(b"", 2), b"  ".to_vec());
    }

    #[test]
    fn test_tokenize_strips_terminators() {
        assert_eq!(tokenize(b"ready\0"), vec![&b"ready"[..]]);
        assert_eq!(
            tokenize(b"g 30000 hello.txt\n"),
            vec![&b"g"[..], &b"30000"[..], &b"hello.txt"[..]]
        );
        assert!(tokenize(b"\0\0  \n").is_empty());
        assert_eq!(tokenize(b"ready\0junk after terminator"), vec![&b"ready"[..]]);
    }

    #[test]
    fn test_tokenize_keeps_raw_bytes() {
        assert_eq!(
            tokenize(b"g 30000 caf\xe9.txt"),
            vec![&b"g"[..], &b"30000"[..], &b"caf\xe9.txt"[..]]
        );
        assert_eq!(tokenize(b"l\t30001\x0b"), vec![&b"l"[..], &b"30001"[..]]);
    }

    #[tokio::test]
    async fn test_read_full_stops_at_eof() {
        let data = vec![7u8; 10];
        let mut reader = &data[..];
        let mut buffer = [0u8; 16];
        let n = read_full(&mut reader, &mut buffer).await.unwrap();
        assert_eq!(n, 10);

        let mut reader = &data[..];
        let mut small = [0u8; 4];
        assert_eq!(read_full(&mut reader, &mut small).await.unwrap(), 4);
        assert_eq!(read_full(&mut reader, &mut small).await.unwrap(), 4);
        assert_eq!(read_full(&mut reader, &mut small).await.unwrap(), 2);
        assert_eq!(read_full(&mut reader, &mut small).await.unwrap(), 0);
    }
}
