use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransportCryptoError>;

#[derive(Debug, Error)]
pub enum TransportCryptoError {
    #[error("Неверная длина ключа шифрования: ожидалось {expected} байт, получено {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("Ошибка аутентификации пакета: тег не совпадает")]
    AuthenticationFailed,

    #[error("Криптографический бэкенд не поддерживает алгоритм '{0}'")]
    BackendUnavailable(String),

    #[error("Неизвестный алгоритм шифрования '{0}'")]
    UnknownCipher(String),

    #[error("Ошибка генерации ключа: {0}")]
    KeyGenerationFailed(String),

    #[error("Ошибка обмена ключами: {0}")]
    KeyExchangeFailed(String),

    #[error("Счётчик пакетов исчерпан - требуется повторный обмен ключами")]
    SequenceOverflow,
}
