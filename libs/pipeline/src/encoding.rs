use std::sync::Arc;

use codec_json::JsonDecoder;
use rowgate_api::{Decoder, PluginError};

/// Кодировка по умолчанию для ресурсов.
pub const DEFAULT_ENCODING: &str = codec_json::ENCODING;

/// Выбрать decoder по имени кодировки. Вызывается один раз при setup'е:
/// неизвестная кодировка: config ошибка, а не ошибка записи.
pub fn decoder_for(encoding: &str) -> Result<Arc<dyn Decoder>, PluginError> {
    if encoding.eq_ignore_ascii_case(codec_json::ENCODING) {
        return Ok(Arc::new(JsonDecoder));
    }
    Err(PluginError::config(format!(
        "unsupported encoding '{encoding}', supported: {}",
        codec_json::ENCODING
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowgate_api::ErrorKind;

    #[test]
    fn json_is_known() {
        assert_eq!(decoder_for("JSON").unwrap().encoding(), "JSON");
        assert_eq!(decoder_for("json").unwrap().encoding(), "JSON");
    }

    #[test]
    fn unknown_encoding_is_config_error() {
        let err = decoder_for("XML").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.message().contains("unsupported encoding 'XML'"), "{err}");
    }
}
