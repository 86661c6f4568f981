use rowgate_api::PluginError;

/// Newline framing входного потока хоста: одна запись = одна строка.
///
/// Завершающий `\r` отрезается. `max_length` ограничивает длину строки
/// без разделителей (0 = без ограничения).
pub struct LinesFraming {
    max_length: usize,
}

impl LinesFraming {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Сколько байт занимает первая полная строка вместе с `\n`.
    pub fn line_end(buf: &[u8]) -> Option<usize> {
        buf.iter().position(|&b| b == b'\n').map(|pos| pos + 1)
    }

    /// Первая строка буфера и число поглощённых байт.
    ///
    /// `Ok(None)`: строка ещё не завершена. Незавершённая строка, уже
    /// превысившая лимит, сразу даёт ошибку, не дожидаясь `\n`.
    pub fn decode(&self, buf: &[u8]) -> Result<Option<(Vec<u8>, usize)>, PluginError> {
        match Self::line_end(buf) {
            Some(end) => Ok(Some((self.frame(&buf[..end - 1])?, end))),
            None => {
                self.check_length(strip_cr(buf))?;
                Ok(None)
            }
        }
    }

    /// Остаток буфера на EOF: последняя строка без завершающего `\n`.
    pub fn decode_eof(&self, buf: &[u8]) -> Result<Option<Vec<u8>>, PluginError> {
        if strip_cr(buf).is_empty() {
            return Ok(None);
        }
        self.frame(buf).map(Some)
    }

    /// Добавить строку в выходной буфер.
    pub fn encode(&self, data: &[u8], buf: &mut Vec<u8>) {
        buf.extend_from_slice(data);
        buf.push(b'\n');
    }

    fn frame(&self, raw: &[u8]) -> Result<Vec<u8>, PluginError> {
        let line = strip_cr(raw);
        self.check_length(line)?;
        Ok(line.to_vec())
    }

    fn check_length(&self, line: &[u8]) -> Result<(), PluginError> {
        if self.max_length > 0 && line.len() > self.max_length {
            return Err(PluginError::decode(format!(
                "record exceeds max line length: {} > {} bytes",
                line.len(),
                self.max_length
            )));
        }
        Ok(())
    }
}

fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}
