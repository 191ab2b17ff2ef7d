use thiserror::Error;

/// The platform's random source was unavailable or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Could not gather random bytes: {0}")]
pub struct RandomBufferError(getrandom::Error);

impl From<getrandom::Error> for RandomBufferError {
    fn from(error: getrandom::Error) -> Self {
        Self(error)
    }
}

/// Length used by [`generate_random_buffer`] when none is given.
pub const DEFAULT_RANDOM_BUFFER_LEN: usize = 32;

/// Fill a fresh buffer from the operating system's (or, in a browser,
/// `crypto.getRandomValues`') random source.
///
/// `None` yields [`DEFAULT_RANDOM_BUFFER_LEN`] bytes.
pub fn generate_random_buffer(len: Option<usize>) -> Result<Vec<u8>, RandomBufferError> {
    let mut buffer = vec![0u8; len.unwrap_or(DEFAULT_RANDOM_BUFFER_LEN)];
    getrandom::getrandom(&mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn it_defaults_to_32_bytes() -> Result<()> {
        assert_eq!(generate_random_buffer(None)?.len(), 32);
        Ok(())
    }

    #[test]
    fn it_honors_the_requested_length() -> Result<()> {
        assert_eq!(generate_random_buffer(Some(16))?.len(), 16);
        assert!(generate_random_buffer(Some(0))?.is_empty());
        Ok(())
    }

    #[test]
    fn it_reports_an_unavailable_source() {
        let error = RandomBufferError::from(getrandom::Error::UNSUPPORTED);
        assert!(
            error
                .to_string()
                .starts_with("Could not gather random bytes: ")
        );

        let boxed: Box<dyn std::error::Error> = Box::new(error);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn it_does_not_repeat_itself() -> Result<()> {
        assert_ne!(generate_random_buffer(None)?, generate_random_buffer(None)?);
        Ok(())
    }
}
