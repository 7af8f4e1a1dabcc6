//! Line-oriented console on the virtual-com UART.
//!
//! Prompts are written as plain text and answers read with `read_until_idle`,
//! so a terminal in line mode as well as raw character entry both work.

use embassy_stm32::mode::Async;
use embassy_stm32::usart::{Uart, UartRx, UartTx};

pub struct Console {
    tx: UartTx<'static, Async>,
    rx: UartRx<'static, Async>,
}

impl Console {
    pub fn new(uart: Uart<'static, Async>) -> Self {
        let (tx, rx) = uart.split();
        Self { tx, rx }
    }

    /// Write a string, no line ending added
    pub async fn print(&mut self, s: &str) {
        self.tx.write(s.as_bytes()).await.ok();
    }

    /// Write a string followed by CRLF
    pub async fn print_line(&mut self, s: &str) {
        self.print(s).await;
        self.print("\r\n").await;
    }

    /// Read one burst of input and echo it back. Returns the bytes received.
    pub async fn read_line(&mut self, buffer: &mut [u8]) -> usize {
        let len = self.rx.read_until_idle(buffer).await.unwrap_or(0);
        self.tx.write(&buffer[..len]).await.ok();
        if len > 0 {
            self.print("\r\n").await;
        }
        len
    }

    /// Prompt for a number, repeating the prompt until at least one digit comes in
    pub async fn prompt_u32(&mut self, prompt: &str) -> u32 {
        let mut buffer = [0u8; 32];
        loop {
            self.print(prompt).await;
            let len = self.read_line(&mut buffer).await;
            if let Some(value) = parse_num(&buffer[..len]) {
                return value;
            }
        }
    }
}

/// Parse a decimal number, `_` separators allowed, anything else ends the scan.
/// None when no digit was seen.
pub fn parse_num(buffer: &[u8]) -> Option<u32> {
    let mut v = 0u32;
    let mut seen = false;
    for c in buffer {
        match c {
            b'0'..=b'9' => {
                v = v.saturating_mul(10).saturating_add((c - b'0') as u32);
                seen = true;
            }
            b'_' => {}
            _ => break,
        }
    }
    seen.then_some(v)
}

#[cfg(test)]
mod tests {
    use super::parse_num;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(parse_num(b"42"), Some(42));
        assert_eq!(parse_num(b"250_000"), Some(250_000));
        assert_eq!(parse_num(b"10\r\n"), Some(10));
        assert_eq!(parse_num(b"0"), Some(0));
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(parse_num(b""), None);
        assert_eq!(parse_num(b"\r\n"), None);
        assert_eq!(parse_num(b"x12"), None);
    }

    #[test]
    fn stops_at_first_non_digit() {
        assert_eq!(parse_num(b"12x34"), Some(12));
    }
}
