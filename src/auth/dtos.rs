use serde::Deserialize;
use utoipa::IntoParams;

/// Query string Google appends when redirecting back to us.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

impl CallbackQuery {
    /// `(code, state)` when both are present and non-empty.
    pub fn params(&self) -> Option<(&str, &str)> {
        let code = self.code.as_deref().filter(|c| !c.is_empty())?;
        let state = self.state.as_deref().filter(|s| !s.is_empty())?;
        Some((code, state))
    }
}

/// Error codes handed to the frontend as `?err=`.
pub mod callback_err {
    pub const INVALID_CALLBACK_PARAM: &str = "invalid_callback_param";
    pub const EXCHANGE_CODE_FAILED: &str = "exchange_code_failed";
    pub const SERVER_ERR: &str = "server_err";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_require_both_values() {
        let query = CallbackQuery {
            code: Some("abc".into()),
            state: Some("xyz".into()),
        };
        assert_eq!(query.params(), Some(("abc", "xyz")));

        let query = CallbackQuery {
            code: Some("abc".into()),
            state: None,
        };
        assert_eq!(query.params(), None);

        let query = CallbackQuery {
            code: Some(String::new()),
            state: Some("xyz".into()),
        };
        assert_eq!(query.params(), None);
    }
}
